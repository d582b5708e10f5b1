//! Session token issuance.

use chrono::{DateTime, Duration, Utc};
use jsonwebtoken::{EncodingKey, Header, encode};

use bikeshop_core::config::AppConfig;
use bikeshop_core::error::AppError;
use bikeshop_entity::user::Role;

use super::claims::Claims;

/// Creates signed HS256 session tokens.
#[derive(Clone)]
pub struct JwtEncoder {
    encoding_key: EncodingKey,
    issuer: String,
    ttl: Duration,
}

impl std::fmt::Debug for JwtEncoder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtEncoder")
            .field("issuer", &self.issuer)
            .field("ttl", &self.ttl)
            .finish()
    }
}

/// A freshly minted token and when it stops being accepted.
#[derive(Debug, Clone)]
pub struct IssuedToken {
    pub token: String,
    pub expires_at: DateTime<Utc>,
    /// Lifetime in seconds, used as the cookie max-age.
    pub max_age_seconds: i64,
}

impl JwtEncoder {
    /// Creates a new encoder from the application configuration.
    pub fn new(config: &AppConfig) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(config.auth.jwt_secret.as_bytes()),
            issuer: config.business.name.clone(),
            ttl: Duration::seconds(config.auth.expiration_seconds()),
        }
    }

    /// Issues a token for the user valid from now.
    pub fn issue(&self, user_id: i64, email: &str, role: Role) -> Result<IssuedToken, AppError> {
        self.issue_at(user_id, email, role, Utc::now())
    }

    /// Issues a token as if minted at `issued_at`.
    pub fn issue_at(
        &self,
        user_id: i64,
        email: &str,
        role: Role,
        issued_at: DateTime<Utc>,
    ) -> Result<IssuedToken, AppError> {
        let expires_at = issued_at + self.ttl;
        let claims = Claims {
            user_id,
            email: email.to_string(),
            role,
            iat: issued_at.timestamp(),
            exp: expires_at.timestamp(),
            iss: self.issuer.clone(),
        };

        let token = encode(&Header::default(), &claims, &self.encoding_key)
            .map_err(|e| AppError::internal(format!("Failed to encode session token: {e}")))?;

        Ok(IssuedToken {
            token,
            expires_at,
            max_age_seconds: self.ttl.num_seconds(),
        })
    }
}
