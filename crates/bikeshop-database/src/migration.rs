//! Embedded schema migrations.

use sqlx::SqlitePool;
use sqlx::migrate::Migrator;
use tracing::info;

use bikeshop_core::error::{AppError, ErrorKind};

static MIGRATOR: Migrator = sqlx::migrate!("../../migrations");

/// Bring the schema up to date. Already applied migrations are skipped.
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), AppError> {
    MIGRATOR.run(pool).await.map_err(|e| {
        AppError::with_source(
            ErrorKind::Database,
            format!("Failed to run migrations: {e}"),
            e,
        )
    })?;

    info!(migrations = MIGRATOR.iter().count(), "Schema up to date");
    Ok(())
}

#[cfg(test)]
mod tests {
    use bikeshop_core::config::database::DatabaseConfig;

    use super::*;
    use crate::DatabasePool;

    #[tokio::test]
    async fn test_migrations_create_schema_and_are_idempotent() {
        let config = DatabaseConfig {
            path: ":memory:".to_string(),
            ..DatabaseConfig::default()
        };
        let db = DatabasePool::connect(&config).await.unwrap();
        run_migrations(db.pool()).await.unwrap();
        run_migrations(db.pool()).await.unwrap();

        let tables: Vec<String> = sqlx::query_scalar(
            "SELECT name FROM sqlite_master WHERE type = 'table' AND name NOT LIKE '\\_%' ESCAPE '\\' ORDER BY name",
        )
        .fetch_all(db.pool())
        .await
        .unwrap();
        for table in ["tickets", "ticket_status_history", "users", "bookings", "surveys"] {
            assert!(tables.iter().any(|t| t == table), "missing {table}");
        }
    }
}
