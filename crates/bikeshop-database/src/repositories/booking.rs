//! Booking repository implementation.

use chrono::{DateTime, Utc};
use sqlx::SqlitePool;

use bikeshop_core::result::AppResult;
use bikeshop_entity::booking::{Booking, BookingStatus, CreateBooking};

use super::db_error;

/// A booking joined with customer and service names for listings.
#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct BookingSummary {
    pub id: i64,
    pub customer_id: i64,
    pub customer_name: String,
    pub service_name: Option<String>,
    pub scheduled_at: DateTime<Utc>,
    pub status: BookingStatus,
    pub notes: String,
}

const SUMMARY_SELECT: &str = "SELECT bk.id, bk.customer_id, u.name AS customer_name,
        s.name AS service_name, bk.scheduled_at, bk.status, bk.notes
 FROM bookings bk
 JOIN users u ON u.id = bk.customer_id
 LEFT JOIN services s ON s.id = bk.service_id";

#[derive(Debug, Clone)]
pub struct BookingRepository {
    pool: SqlitePool,
}

impl BookingRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn create(&self, data: &CreateBooking) -> AppResult<Booking> {
        sqlx::query_as::<_, Booking>(
            "INSERT INTO bookings (customer_id, service_id, bicycle_id, scheduled_at, status, notes, created_at)
             VALUES (?, ?, ?, ?, ?, ?, ?)
             RETURNING *",
        )
        .bind(data.customer_id)
        .bind(data.service_id)
        .bind(data.bicycle_id)
        .bind(data.scheduled_at)
        .bind(data.status)
        .bind(&data.notes)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to create booking"))
    }

    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<Booking>> {
        sqlx::query_as::<_, Booking>("SELECT * FROM bookings WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find booking"))
    }

    pub async fn list_by_customer(&self, customer_id: i64) -> AppResult<Vec<BookingSummary>> {
        sqlx::query_as::<_, BookingSummary>(&format!(
            "{SUMMARY_SELECT} WHERE bk.customer_id = ? ORDER BY bk.scheduled_at DESC"
        ))
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list customer bookings"))
    }

    /// Bookings in one status, soonest first.
    pub async fn list_by_status(
        &self,
        status: BookingStatus,
        limit: i64,
    ) -> AppResult<Vec<BookingSummary>> {
        sqlx::query_as::<_, BookingSummary>(&format!(
            "{SUMMARY_SELECT} WHERE bk.status = ? ORDER BY bk.scheduled_at ASC LIMIT ?"
        ))
        .bind(status)
        .bind(limit)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list bookings by status"))
    }

    /// Bookings scheduled in `[from, to)`, in schedule order.
    pub async fn list_scheduled_between(
        &self,
        from: DateTime<Utc>,
        to: DateTime<Utc>,
    ) -> AppResult<Vec<BookingSummary>> {
        sqlx::query_as::<_, BookingSummary>(&format!(
            "{SUMMARY_SELECT} WHERE bk.scheduled_at >= ? AND bk.scheduled_at < ?
             ORDER BY bk.scheduled_at ASC"
        ))
        .bind(from)
        .bind(to)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list bookings in range"))
    }

    /// Bookings created since `since`, newest first.
    pub async fn list_created_since(&self, since: DateTime<Utc>) -> AppResult<Vec<BookingSummary>> {
        sqlx::query_as::<_, BookingSummary>(&format!(
            "{SUMMARY_SELECT} WHERE bk.created_at >= ? ORDER BY bk.created_at DESC"
        ))
        .bind(since)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list recent bookings"))
    }

    pub async fn update_status(&self, id: i64, status: BookingStatus) -> AppResult<()> {
        sqlx::query("UPDATE bookings SET status = ? WHERE id = ?")
            .bind(status)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to update booking status"))?;
        Ok(())
    }

    pub async fn set_bicycle(&self, id: i64, bicycle_id: i64) -> AppResult<()> {
        sqlx::query("UPDATE bookings SET bicycle_id = ? WHERE id = ?")
            .bind(bicycle_id)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to attach bicycle to booking"))?;
        Ok(())
    }

    pub async fn count(&self) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM bookings")
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to count bookings"))
    }

    pub async fn count_by_status(&self, status: BookingStatus) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE status = ?")
            .bind(status)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to count bookings by status"))
    }

    pub async fn count_created_since(&self, since: DateTime<Utc>) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM bookings WHERE created_at >= ?")
            .bind(since)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to count recent bookings"))
    }
}
