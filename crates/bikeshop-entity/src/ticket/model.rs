//! Ticket entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::status::TicketStatus;

/// A work order tracking one bicycle through the workshop.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Ticket {
    pub id: i64,
    pub booking_id: i64,
    /// Assigned technician, `None` for unassigned walk-ins.
    pub technician_id: Option<i64>,
    /// Short public code for unauthenticated lookup.
    pub tracking_code: String,
    /// PNG bytes of the tracking QR code.
    #[serde(skip)]
    pub qr_code: Option<Vec<u8>>,
    pub status: TicketStatus,
    pub notes: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Ticket {
    /// Whether the given user is the assigned technician.
    pub fn is_assigned_to(&self, user_id: i64) -> bool {
        self.technician_id == Some(user_id)
    }
}

/// Data required to open a ticket.
#[derive(Debug, Clone)]
pub struct CreateTicket {
    pub booking_id: i64,
    pub technician_id: Option<i64>,
    pub tracking_code: String,
    pub qr_code: Option<Vec<u8>>,
    pub notes: String,
}
