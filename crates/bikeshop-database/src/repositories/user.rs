//! User repository implementation.

use chrono::Utc;
use sqlx::SqlitePool;

use bikeshop_core::result::AppResult;
use bikeshop_entity::user::{CreateUser, Role, UpdateUser, User};

use super::{db_error, db_error_or_conflict};

/// Repository for user CRUD and query operations.
#[derive(Debug, Clone)]
pub struct UserRepository {
    pool: SqlitePool,
}

impl UserRepository {
    /// Create a new user repository.
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Find a user by primary key.
    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find user by id"))
    }

    /// Find a user by email (case-insensitive).
    pub async fn find_by_email(&self, email: &str) -> AppResult<Option<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE LOWER(email) = LOWER(?)")
            .bind(email.trim())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find user by email"))
    }

    /// List every user, newest first.
    pub async fn list(&self) -> AppResult<Vec<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users ORDER BY created_at DESC, id DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list users"))
    }

    /// List users holding one role, by name.
    pub async fn list_by_role(&self, role: Role) -> AppResult<Vec<User>> {
        sqlx::query_as::<_, User>("SELECT * FROM users WHERE role = ? ORDER BY name")
            .bind(role)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list users by role"))
    }

    /// Count all users.
    pub async fn count(&self) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to count users"))
    }

    /// Count users holding one role.
    pub async fn count_by_role(&self, role: Role) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM users WHERE role = ?")
            .bind(role)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to count users by role"))
    }

    /// Insert a user. A duplicate email is reported as a conflict.
    pub async fn create(&self, data: &CreateUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "INSERT INTO users (email, password_hash, name, phone, role, created_at)
             VALUES (?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(data.email.trim())
        .bind(&data.password_hash)
        .bind(&data.name)
        .bind(&data.phone)
        .bind(data.role)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(db_error_or_conflict(
            "Failed to create user",
            "Email is already registered",
        ))
    }

    /// Admin edit of identity and role.
    pub async fn update(&self, data: &UpdateUser) -> AppResult<User> {
        sqlx::query_as::<_, User>(
            "UPDATE users SET email = ?, name = ?, phone = ?, role = ? WHERE id = ? RETURNING *",
        )
        .bind(data.email.trim())
        .bind(&data.name)
        .bind(&data.phone)
        .bind(data.role)
        .bind(data.id)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error_or_conflict(
            "Failed to update user",
            "Email is already registered",
        ))
    }

    /// Self-service profile edit; never touches the role.
    pub async fn update_profile(&self, id: i64, name: &str, phone: &str) -> AppResult<()> {
        sqlx::query("UPDATE users SET name = ?, phone = ? WHERE id = ?")
            .bind(name)
            .bind(phone)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to update profile"))?;
        Ok(())
    }

    /// Replace the stored password hash.
    pub async fn update_password(&self, id: i64, password_hash: &str) -> AppResult<()> {
        sqlx::query("UPDATE users SET password_hash = ? WHERE id = ?")
            .bind(password_hash)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to update password"))?;
        Ok(())
    }

    /// Hard-delete a user. Returns whether a row was removed.
    pub async fn delete(&self, id: i64) -> AppResult<bool> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete user"))?;
        Ok(result.rows_affected() > 0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::repositories::test_support::memory_pool;
    use bikeshop_core::ErrorKind;

    fn new_user(email: &str, role: Role) -> CreateUser {
        CreateUser {
            email: email.to_string(),
            password_hash: "hash".to_string(),
            name: "Ana".to_string(),
            phone: String::new(),
            role,
        }
    }

    #[tokio::test]
    async fn test_missing_user_is_none() {
        let repo = UserRepository::new(memory_pool().await);
        assert!(repo.find_by_id(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_duplicate_email_is_conflict() {
        let repo = UserRepository::new(memory_pool().await);
        repo.create(&new_user("ana@example.com", Role::Customer))
            .await
            .unwrap();
        let err = repo
            .create(&new_user("ana@example.com", Role::Customer))
            .await
            .unwrap_err();
        assert_eq!(err.kind, ErrorKind::Conflict);
    }

    #[tokio::test]
    async fn test_find_by_email_ignores_case() {
        let repo = UserRepository::new(memory_pool().await);
        let created = repo
            .create(&new_user("tech@example.com", Role::Technician))
            .await
            .unwrap();
        let found = repo.find_by_email("TECH@example.com").await.unwrap().unwrap();
        assert_eq!(found.id, created.id);
        assert_eq!(found.role, Role::Technician);
        assert_eq!(repo.count_by_role(Role::Technician).await.unwrap(), 1);
    }
}
