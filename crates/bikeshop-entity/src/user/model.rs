//! User entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::role::Role;

/// A registered user: customer, technician or admin.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct User {
    pub id: i64,
    /// Unique login email.
    pub email: String,
    /// Argon2 password hash.
    #[serde(skip_serializing)]
    pub password_hash: String,
    pub name: String,
    pub phone: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Check if this user has admin privileges.
    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }
}

/// Data required to create a new user.
#[derive(Debug, Clone)]
pub struct CreateUser {
    pub email: String,
    /// Pre-hashed password.
    pub password_hash: String,
    pub name: String,
    pub phone: String,
    pub role: Role,
}

/// Data for an admin edit of an existing user.
#[derive(Debug, Clone)]
pub struct UpdateUser {
    pub id: i64,
    pub email: String,
    pub name: String,
    pub phone: String,
    pub role: Role,
}
