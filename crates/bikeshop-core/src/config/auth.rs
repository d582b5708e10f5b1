//! Authentication configuration.

use serde::{Deserialize, Serialize};

/// Placeholder secret shipped in the default configuration.
///
/// Startup refuses to run with this value unless debug mode is on.
pub const PLACEHOLDER_JWT_SECRET: &str = "CHANGE_THIS_SECRET_IN_PRODUCTION";

/// Session token configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthConfig {
    /// Secret key for JWT signing (HMAC-SHA256).
    #[serde(default = "default_jwt_secret")]
    pub jwt_secret: String,
    /// Token lifetime in hours.
    #[serde(default = "default_expiration_hours")]
    pub jwt_expiration_hours: i64,
    /// Minimum password length accepted at registration.
    #[serde(default = "default_password_min")]
    pub password_min_length: usize,
}

impl AuthConfig {
    /// Token lifetime in seconds, also used as the cookie max-age.
    pub fn expiration_seconds(&self) -> i64 {
        self.jwt_expiration_hours * 3600
    }
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: default_jwt_secret(),
            jwt_expiration_hours: default_expiration_hours(),
            password_min_length: default_password_min(),
        }
    }
}

fn default_jwt_secret() -> String {
    PLACEHOLDER_JWT_SECRET.to_string()
}

pub(crate) fn default_expiration_hours() -> i64 {
    24
}

fn default_password_min() -> usize {
    6
}
