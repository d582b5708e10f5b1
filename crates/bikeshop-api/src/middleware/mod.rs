//! Axum middleware stack.

pub mod auth;
pub mod logging;
pub mod rbac;
pub mod security;
