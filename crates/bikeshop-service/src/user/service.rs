//! Sign-in, self-registration and profile editing.

use std::sync::Arc;

use serde::Deserialize;
use tracing::info;

use bikeshop_auth::{IssuedToken, JwtEncoder, PasswordHasher, PasswordPolicy};
use bikeshop_core::error::AppError;
use bikeshop_core::result::AppResult;
use bikeshop_database::repositories::UserRepository;
use bikeshop_entity::user::{CreateUser, Role, User};

use crate::context::RequestContext;

/// Message shown for both unknown emails and wrong passwords.
const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// Fields of the public registration form.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    #[serde(default)]
    pub phone: String,
    pub password: String,
    pub confirm_password: String,
}

#[derive(Debug, Clone)]
pub struct UserService {
    users: Arc<UserRepository>,
    hasher: Arc<PasswordHasher>,
    policy: Arc<PasswordPolicy>,
    encoder: Arc<JwtEncoder>,
}

impl UserService {
    pub fn new(
        users: Arc<UserRepository>,
        hasher: Arc<PasswordHasher>,
        policy: Arc<PasswordPolicy>,
        encoder: Arc<JwtEncoder>,
    ) -> Self {
        Self {
            users,
            hasher,
            policy,
            encoder,
        }
    }

    /// Check credentials and issue a session token.
    pub async fn login(&self, email: &str, password: &str) -> AppResult<(User, IssuedToken)> {
        let user = self
            .users
            .find_by_email(email.trim())
            .await?
            .ok_or_else(|| AppError::authentication(INVALID_CREDENTIALS))?;

        if !self.hasher.verify(password, &user.password_hash) {
            info!(user_id = user.id, "Login rejected");
            return Err(AppError::authentication(INVALID_CREDENTIALS));
        }

        let token = self.encoder.issue(user.id, &user.email, user.role)?;
        info!(user_id = user.id, role = %user.role, "User logged in");
        Ok((user, token))
    }

    /// Create a customer account.
    pub async fn register(&self, request: RegisterRequest) -> AppResult<User> {
        let email = request.email.trim();
        let name = request.name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Name is required"));
        }
        if !email.contains('@') {
            return Err(AppError::validation("A valid email is required"));
        }
        self.policy
            .validate(&request.password, &request.confirm_password)?;

        if self.users.find_by_email(email).await?.is_some() {
            return Err(AppError::conflict("Email is already registered"));
        }

        let password_hash = self.hasher.hash(&request.password)?;
        let user = self
            .users
            .create(&CreateUser {
                email: email.to_string(),
                password_hash,
                name: name.to_string(),
                phone: request.phone.trim().to_string(),
                role: Role::Customer,
            })
            .await?;

        info!(user_id = user.id, "Customer registered");
        Ok(user)
    }

    pub async fn profile(&self, ctx: &RequestContext) -> AppResult<User> {
        self.users
            .find_by_id(ctx.user_id)
            .await?
            .ok_or_else(|| AppError::not_found("User not found"))
    }

    /// Update the caller's name and phone. Email and role are not
    /// self-editable.
    pub async fn update_profile(
        &self,
        ctx: &RequestContext,
        name: &str,
        phone: &str,
    ) -> AppResult<User> {
        let name = name.trim();
        if name.is_empty() {
            return Err(AppError::validation("Name cannot be empty"));
        }
        self.users
            .update_profile(ctx.user_id, name, phone.trim())
            .await?;
        self.profile(ctx).await
    }
}
