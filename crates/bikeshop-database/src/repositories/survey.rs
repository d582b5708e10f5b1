//! Survey repository implementation.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use bikeshop_core::result::AppResult;
use bikeshop_entity::survey::{Rating, Survey};

use super::{db_error, db_error_or_conflict};

#[derive(Debug, Clone)]
pub struct SurveyRepository {
    pool: SqlitePool,
}

impl SurveyRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a survey. A second survey for the same ticket is a conflict.
    pub async fn create(&self, ticket_id: i64, rating: Rating, feedback: &str) -> AppResult<Survey> {
        sqlx::query_as::<_, Survey>(
            "INSERT INTO surveys (ticket_id, rating, feedback, created_at)
             VALUES (?, ?, ?, ?) RETURNING *",
        )
        .bind(ticket_id)
        .bind(rating.value())
        .bind(feedback)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(db_error_or_conflict(
            "Failed to create survey",
            "A survey was already submitted for this ticket",
        ))
    }

    pub async fn find_by_ticket(&self, ticket_id: i64) -> AppResult<Option<Survey>> {
        sqlx::query_as::<_, Survey>("SELECT * FROM surveys WHERE ticket_id = ?")
            .bind(ticket_id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find survey"))
    }

    pub async fn list(&self) -> AppResult<Vec<Survey>> {
        sqlx::query_as::<_, Survey>("SELECT * FROM surveys ORDER BY created_at DESC")
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list surveys"))
    }

    /// Average rating of surveys created since `since`, if any exist.
    pub async fn average_rating_since(&self, since: DateTime<Utc>) -> AppResult<Option<f64>> {
        sqlx::query_scalar("SELECT AVG(rating) FROM surveys WHERE created_at >= ?")
            .bind(since)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to average survey ratings"))
    }

    /// `(rating, count)` pairs for ratings that occur.
    pub async fn rating_counts(&self) -> AppResult<Vec<(i64, i64)>> {
        sqlx::query_as("SELECT rating, COUNT(*) FROM surveys GROUP BY rating ORDER BY rating")
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to count survey ratings"))
    }
}
