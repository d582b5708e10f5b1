//! Append-only ticket status history.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

use super::status::TicketStatus;

/// One status event on a ticket. Rows are never updated after insertion.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TicketStatusHistory {
    pub id: i64,
    pub ticket_id: i64,
    pub status: TicketStatus,
    /// Acting user, `None` for system-created events.
    pub changed_by: Option<i64>,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

/// A history row about to be appended.
#[derive(Debug, Clone)]
pub struct NewHistoryEntry {
    pub ticket_id: i64,
    pub status: TicketStatus,
    pub changed_by: Option<i64>,
    pub notes: String,
}
