//! Quote repository implementation.

use chrono::Utc;
use sqlx::SqlitePool;
use sqlx::types::Json;

use bikeshop_core::result::AppResult;
use bikeshop_entity::quote::{CreateQuote, Quote, QuoteStatus};

use super::db_error;

#[derive(Debug, Clone)]
pub struct QuoteRepository {
    pool: SqlitePool,
}

impl QuoteRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a pending quote; the total is computed from the items.
    pub async fn create(&self, data: &CreateQuote) -> AppResult<Quote> {
        sqlx::query_as::<_, Quote>(
            "INSERT INTO quotes (booking_id, items, total, status, rejection_reason, valid_until, created_at)
             VALUES (?, ?, ?, ?, '', ?, ?)
             RETURNING *",
        )
        .bind(data.booking_id)
        .bind(Json(&data.items))
        .bind(Quote::sum(&data.items))
        .bind(QuoteStatus::Pending)
        .bind(data.valid_until)
        .bind(Utc::now())
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to create quote"))
    }

    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<Quote>> {
        sqlx::query_as::<_, Quote>("SELECT * FROM quotes WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find quote"))
    }

    /// The most recent quote for a booking.
    pub async fn find_latest_by_booking(&self, booking_id: i64) -> AppResult<Option<Quote>> {
        sqlx::query_as::<_, Quote>(
            "SELECT * FROM quotes WHERE booking_id = ? ORDER BY created_at DESC, id DESC LIMIT 1",
        )
        .bind(booking_id)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to find quote by booking"))
    }

    /// Quotes on any booking owned by the customer.
    pub async fn list_by_customer(&self, customer_id: i64) -> AppResult<Vec<Quote>> {
        sqlx::query_as::<_, Quote>(
            "SELECT q.* FROM quotes q
             JOIN bookings b ON b.id = q.booking_id
             WHERE b.customer_id = ?
             ORDER BY q.created_at DESC",
        )
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list customer quotes"))
    }

    pub async fn update_status(
        &self,
        id: i64,
        status: QuoteStatus,
        rejection_reason: &str,
    ) -> AppResult<()> {
        sqlx::query("UPDATE quotes SET status = ?, rejection_reason = ? WHERE id = ?")
            .bind(status)
            .bind(rejection_reason)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to update quote status"))?;
        Ok(())
    }

    /// Sum of approved quote totals.
    pub async fn approved_revenue(&self) -> AppResult<f64> {
        let total: Option<f64> =
            sqlx::query_scalar("SELECT SUM(total) FROM quotes WHERE status = ?")
                .bind(QuoteStatus::Approved)
                .fetch_one(&self.pool)
                .await
                .map_err(db_error("Failed to sum approved quotes"))?;
        Ok(total.unwrap_or(0.0))
    }

    /// Approved quotes, newest first.
    pub async fn list_approved(&self) -> AppResult<Vec<Quote>> {
        sqlx::query_as::<_, Quote>(
            "SELECT * FROM quotes WHERE status = ? ORDER BY created_at DESC",
        )
        .bind(QuoteStatus::Approved)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list approved quotes"))
    }
}
