//! Account services: sign-in, registration, profile, and back-office
//! user management.

pub mod admin;
pub mod service;

pub use admin::{AdminUserService, UserForm};
pub use service::{RegisterRequest, UserService};
