//! Route handlers organized by area.

pub mod admin;
pub mod api;
pub mod auth;
pub mod customer;
pub mod health;
pub mod public;
pub mod tracking;
pub mod workshop;
