//! Request context carrying the authenticated user.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use bikeshop_auth::Claims;
use bikeshop_entity::user::Role;

/// Who is acting on the current request.
///
/// Built from validated token claims by the auth middleware and passed
/// into service methods.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RequestContext {
    pub user_id: i64,
    pub email: String,
    /// Role at the time the token was issued.
    pub role: Role,
    pub request_time: DateTime<Utc>,
}

impl RequestContext {
    pub fn new(user_id: i64, email: impl Into<String>, role: Role) -> Self {
        Self {
            user_id,
            email: email.into(),
            role,
            request_time: Utc::now(),
        }
    }

    pub fn from_claims(claims: &Claims) -> Self {
        Self::new(claims.user_id, claims.email.clone(), claims.role)
    }

    pub fn is_admin(&self) -> bool {
        self.role.is_admin()
    }

    pub fn is_staff(&self) -> bool {
        self.role.is_staff()
    }
}
