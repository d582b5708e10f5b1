//! Booking entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::status::BookingStatus;

/// A customer appointment for a workshop service.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Booking {
    pub id: i64,
    pub customer_id: i64,
    pub service_id: Option<i64>,
    pub bicycle_id: Option<i64>,
    pub scheduled_at: DateTime<Utc>,
    pub status: BookingStatus,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

impl Booking {
    /// Slot label (`HH:MM`) used by the availability API.
    pub fn slot(&self) -> String {
        self.scheduled_at.format("%H:%M").to_string()
    }
}

/// Data required to create a booking.
#[derive(Debug, Clone)]
pub struct CreateBooking {
    pub customer_id: i64,
    pub service_id: Option<i64>,
    pub bicycle_id: Option<i64>,
    pub scheduled_at: DateTime<Utc>,
    pub status: BookingStatus,
    pub notes: String,
}
