//! Parts checklist attached to a ticket.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum PartStatus {
    Pending,
    Done,
}

impl PartStatus {
    /// The other state of the checkbox.
    pub fn toggled(self) -> Self {
        match self {
            Self::Pending => Self::Done,
            Self::Done => Self::Pending,
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Done => "done",
        }
    }
}

/// A part needed for a repair.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct TicketPart {
    pub id: i64,
    pub ticket_id: i64,
    pub name: String,
    pub status: PartStatus,
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_toggle_flips() {
        assert_eq!(PartStatus::Pending.toggled(), PartStatus::Done);
        assert_eq!(PartStatus::Done.toggled(), PartStatus::Pending);
    }
}
