//! Bicycle repository implementation.

use chrono::Utc;
use sqlx::SqlitePool;

use bikeshop_core::result::AppResult;
use bikeshop_entity::catalog::{Bicycle, BicycleDetails, CreateBicycle};

use super::db_error;

const DETAILS_SELECT: &str = "SELECT bc.id, bc.user_id, b.name AS brand_name, m.name AS model_name,
        bc.color, bc.serial_number, bc.notes
 FROM bicycles bc
 LEFT JOIN brands b ON b.id = bc.brand_id
 LEFT JOIN models m ON m.id = bc.model_id";

#[derive(Debug, Clone)]
pub struct BicycleRepository {
    pool: SqlitePool,
}

impl BicycleRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, data: &CreateBicycle) -> AppResult<Bicycle> {
        sqlx::query_as::<_, Bicycle>(
            "INSERT INTO bicycles (user_id, brand_id, model_id, color, serial_number, notes, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(data.user_id)
        .bind(data.brand_id)
        .bind(data.model_id)
        .bind(&data.color)
        .bind(&data.serial_number)
        .bind(&data.notes)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to create bicycle"))
    }

    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<Bicycle>> {
        sqlx::query_as::<_, Bicycle>("SELECT * FROM bicycles WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find bicycle"))
    }

    /// A bicycle with brand and model names resolved.
    pub async fn find_details(&self, id: i64) -> AppResult<Option<BicycleDetails>> {
        sqlx::query_as::<_, BicycleDetails>(&format!("{DETAILS_SELECT} WHERE bc.id = ?"))
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to load bicycle details"))
    }

    pub async fn list_by_user(&self, user_id: i64) -> AppResult<Vec<BicycleDetails>> {
        sqlx::query_as::<_, BicycleDetails>(&format!(
            "{DETAILS_SELECT} WHERE bc.user_id = ? ORDER BY bc.created_at DESC"
        ))
        .bind(user_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list bicycles"))
    }

    /// Workshop edit of the descriptive fields.
    pub async fn update(
        &self,
        id: i64,
        color: &str,
        serial_number: &str,
        notes: &str,
    ) -> AppResult<bool> {
        let result =
            sqlx::query("UPDATE bicycles SET color = ?, serial_number = ?, notes = ? WHERE id = ?")
                .bind(color)
                .bind(serial_number)
                .bind(notes)
                .bind(id)
                .execute(&self.pool)
                .await
                .map_err(db_error("Failed to update bicycle"))?;
        Ok(result.rows_affected() > 0)
    }
}
