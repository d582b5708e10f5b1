//! # bikeshop-api
//!
//! HTTP layer for the bike shop built on Axum.
//!
//! Provides the server-rendered pages, a few JSON endpoints, middleware
//! (auth gate, role gate, security headers, logging), extractors, form
//! DTOs, the HTML renderer and error mapping.

pub mod app;
pub mod dto;
pub mod error;
pub mod extractors;
pub mod handlers;
pub mod middleware;
pub mod render;
pub mod router;
pub mod state;

pub use app::{build_app, build_state};
pub use state::AppState;
