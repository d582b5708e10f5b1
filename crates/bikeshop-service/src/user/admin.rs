//! Back-office user management and the bootstrap admin account.

use std::sync::Arc;

use tracing::{info, warn};

use bikeshop_auth::PasswordHasher;
use bikeshop_core::error::AppError;
use bikeshop_core::result::AppResult;
use bikeshop_database::repositories::UserRepository;
use bikeshop_entity::user::{CreateUser, Role, UpdateUser, User};

use crate::context::RequestContext;

pub const DEFAULT_ADMIN_EMAIL: &str = "admin@bicicletapp.com";
pub const DEFAULT_ADMIN_PASSWORD: &str = "admin123";
const DEFAULT_ADMIN_NAME: &str = "Administrador";

/// Fields of the admin user form. An empty password on update keeps the
/// current one.
#[derive(Debug, Clone)]
pub struct UserForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: Role,
    pub password: String,
}

#[derive(Debug, Clone)]
pub struct AdminUserService {
    users: Arc<UserRepository>,
    hasher: Arc<PasswordHasher>,
}

impl AdminUserService {
    pub fn new(users: Arc<UserRepository>, hasher: Arc<PasswordHasher>) -> Self {
        Self { users, hasher }
    }

    /// All users, or only those holding `role`.
    pub async fn list(&self, role: Option<Role>) -> AppResult<Vec<User>> {
        match role {
            Some(role) => self.users.list_by_role(role).await,
            None => self.users.list().await,
        }
    }

    pub async fn technicians(&self) -> AppResult<Vec<User>> {
        self.users.list_by_role(Role::Technician).await
    }

    pub async fn get(&self, id: i64) -> AppResult<User> {
        self.users
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {id} not found")))
    }

    /// Count of all users and of each role.
    pub async fn counts(&self) -> AppResult<(i64, Vec<(Role, i64)>)> {
        let total = self.users.count().await?;
        let mut per_role = Vec::with_capacity(Role::ALL.len());
        for role in Role::ALL {
            per_role.push((role, self.users.count_by_role(role).await?));
        }
        Ok((total, per_role))
    }

    pub async fn create(&self, ctx: &RequestContext, form: UserForm) -> AppResult<User> {
        require_admin(ctx)?;
        let email = validate_identity(&form)?;
        if form.password.is_empty() {
            return Err(AppError::validation("A password is required"));
        }
        if self.users.find_by_email(&email).await?.is_some() {
            return Err(AppError::conflict("Email is already registered"));
        }

        let password_hash = self.hasher.hash(&form.password)?;
        let user = self
            .users
            .create(&CreateUser {
                email,
                password_hash,
                name: form.name.trim().to_string(),
                phone: form.phone.trim().to_string(),
                role: form.role,
            })
            .await?;

        info!(user_id = user.id, role = %user.role, by = ctx.user_id, "User created");
        Ok(user)
    }

    pub async fn update(&self, ctx: &RequestContext, id: i64, form: UserForm) -> AppResult<User> {
        require_admin(ctx)?;
        let current = self.get(id).await?;
        let email = validate_identity(&form)?;

        if !email.eq_ignore_ascii_case(&current.email)
            && self.users.find_by_email(&email).await?.is_some()
        {
            return Err(AppError::conflict("Email is already registered"));
        }

        let user = self
            .users
            .update(&UpdateUser {
                id,
                email,
                name: form.name.trim().to_string(),
                phone: form.phone.trim().to_string(),
                role: form.role,
            })
            .await?;

        if !form.password.is_empty() {
            let hash = self.hasher.hash(&form.password)?;
            self.users.update_password(id, &hash).await?;
        }

        if current.role != user.role {
            info!(user_id = id, from = %current.role, to = %user.role, "User role changed");
        }
        Ok(user)
    }

    pub async fn delete(&self, ctx: &RequestContext, id: i64) -> AppResult<()> {
        require_admin(ctx)?;
        if id == ctx.user_id {
            return Err(AppError::validation("You cannot delete your own account"));
        }
        if !self.users.delete(id).await? {
            return Err(AppError::not_found(format!("User {id} not found")));
        }
        info!(user_id = id, by = ctx.user_id, "User deleted");
        Ok(())
    }

    /// Create the bootstrap admin when the users table is empty.
    ///
    /// Returns the created account, or `None` if users already exist.
    pub async fn seed_default_admin(&self) -> AppResult<Option<User>> {
        if self.users.count().await? > 0 {
            return Ok(None);
        }

        let password_hash = self.hasher.hash(DEFAULT_ADMIN_PASSWORD)?;
        let admin = self
            .users
            .create(&CreateUser {
                email: DEFAULT_ADMIN_EMAIL.to_string(),
                password_hash,
                name: DEFAULT_ADMIN_NAME.to_string(),
                phone: String::new(),
                role: Role::Admin,
            })
            .await?;

        warn!(
            email = DEFAULT_ADMIN_EMAIL,
            "Default admin created with the documented password; change it before going live"
        );
        Ok(Some(admin))
    }
}

fn require_admin(ctx: &RequestContext) -> AppResult<()> {
    if ctx.is_admin() {
        Ok(())
    } else {
        Err(AppError::authorization("Administrator access required"))
    }
}

fn validate_identity(form: &UserForm) -> AppResult<String> {
    if form.name.trim().is_empty() {
        return Err(AppError::validation("Name is required"));
    }
    let email = form.email.trim();
    if !email.contains('@') {
        return Err(AppError::validation("A valid email is required"));
    }
    Ok(email.to_string())
}
