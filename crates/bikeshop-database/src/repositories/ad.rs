//! Ad banner repository implementation.

use chrono::Utc;
use sqlx::SqlitePool;

use bikeshop_core::result::AppResult;
use bikeshop_entity::ad::{Ad, AdInput};

use super::db_error;

#[derive(Debug, Clone)]
pub struct AdRepository {
    pool: SqlitePool,
}

impl AdRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> AppResult<Vec<Ad>> {
        sqlx::query_as::<_, Ad>("SELECT * FROM ads ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list ads"))
    }

    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<Ad>> {
        sqlx::query_as::<_, Ad>("SELECT * FROM ads WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find ad"))
    }

    /// One active ad chosen at random, if any.
    pub async fn random_active(&self) -> AppResult<Option<Ad>> {
        sqlx::query_as::<_, Ad>("SELECT * FROM ads WHERE active = 1 ORDER BY RANDOM() LIMIT 1")
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to pick an active ad"))
    }

    pub async fn create(&self, input: &AdInput) -> AppResult<Ad> {
        let now = Utc::now();
        sqlx::query_as::<_, Ad>(
            "INSERT INTO ads (title, media_url, media_type, link_url, active, impressions, clicks, created_at, updated_at)
             VALUES (?, ?, ?, ?, ?, 0, 0, ?, ?)
             RETURNING *",
        )
        .bind(&input.title)
        .bind(&input.media_url)
        .bind(input.media_type)
        .bind(&input.link_url)
        .bind(input.active)
        .bind(now)
        .bind(now)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to create ad"))
    }

    pub async fn update(&self, id: i64, input: &AdInput) -> AppResult<()> {
        sqlx::query(
            "UPDATE ads SET title = ?, media_url = ?, media_type = ?, link_url = ?, active = ?, updated_at = ?
             WHERE id = ?",
        )
        .bind(&input.title)
        .bind(&input.media_url)
        .bind(input.media_type)
        .bind(&input.link_url)
        .bind(input.active)
        .bind(Utc::now())
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to update ad"))?;
        Ok(())
    }

    pub async fn set_active(&self, id: i64, active: bool) -> AppResult<()> {
        sqlx::query("UPDATE ads SET active = ?, updated_at = ? WHERE id = ?")
            .bind(active)
            .bind(Utc::now())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to toggle ad"))?;
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        sqlx::query("DELETE FROM ads WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete ad"))?;
        Ok(())
    }

    pub async fn increment_impressions(&self, id: i64) -> AppResult<()> {
        sqlx::query("UPDATE ads SET impressions = impressions + 1 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to count ad impression"))?;
        Ok(())
    }

    pub async fn increment_clicks(&self, id: i64) -> AppResult<()> {
        sqlx::query("UPDATE ads SET clicks = clicks + 1 WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to count ad click"))?;
        Ok(())
    }
}
