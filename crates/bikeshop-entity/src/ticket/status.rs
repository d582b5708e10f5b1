//! Ticket status enumeration and the transition table.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::user::Role;

/// Workflow state of a repair ticket.
///
/// Serialized as the lowercase snake_case tokens used on the wire and in
/// the `tickets.status` column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "snake_case")]
#[serde(rename_all = "snake_case")]
pub enum TicketStatus {
    Received,
    Diagnosing,
    InProgress,
    WaitingParts,
    Ready,
    Delivered,
}

/// Allowed next states for a technician, keyed by the current state.
const TECHNICIAN_TRANSITIONS: &[(TicketStatus, &[TicketStatus])] = &[
    (TicketStatus::Received, &[TicketStatus::Diagnosing]),
    (
        TicketStatus::Diagnosing,
        &[
            TicketStatus::InProgress,
            TicketStatus::WaitingParts,
            TicketStatus::Ready,
        ],
    ),
    (
        TicketStatus::InProgress,
        &[TicketStatus::WaitingParts, TicketStatus::Ready],
    ),
    (
        TicketStatus::WaitingParts,
        &[TicketStatus::InProgress, TicketStatus::Ready],
    ),
    (TicketStatus::Ready, &[TicketStatus::Delivered]),
    (TicketStatus::Delivered, &[]),
];

impl TicketStatus {
    /// Every status in workflow order.
    pub const ALL: [TicketStatus; 6] = [
        TicketStatus::Received,
        TicketStatus::Diagnosing,
        TicketStatus::InProgress,
        TicketStatus::WaitingParts,
        TicketStatus::Ready,
        TicketStatus::Delivered,
    ];

    /// Statuses a technician may move to from `self`.
    pub fn allowed_next(self) -> &'static [TicketStatus] {
        TECHNICIAN_TRANSITIONS
            .iter()
            .find(|(from, _)| *from == self)
            .map(|(_, next)| *next)
            .unwrap_or(&[])
    }

    /// Whether a technician may move a ticket from `self` to `next`.
    ///
    /// Keeping the same status is always allowed; it records a note.
    pub fn technician_can_move_to(self, next: TicketStatus) -> bool {
        self == next || self.allowed_next().contains(&next)
    }

    /// Whether `actor` may move a ticket from `self` to `next`.
    ///
    /// Admins bypass the table entirely. Customers never change status.
    pub fn permits(self, actor: Role, next: TicketStatus) -> bool {
        match actor {
            Role::Admin => true,
            Role::Technician => self.technician_can_move_to(next),
            Role::Customer => false,
        }
    }

    /// Surveys open once the bike is ready for pickup.
    pub fn accepts_survey(self) -> bool {
        matches!(self, Self::Ready | Self::Delivered)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Received => "received",
            Self::Diagnosing => "diagnosing",
            Self::InProgress => "in_progress",
            Self::WaitingParts => "waiting_parts",
            Self::Ready => "ready",
            Self::Delivered => "delivered",
        }
    }

    /// Human-readable label for pages and the status API.
    pub fn label(&self) -> &'static str {
        match self {
            Self::Received => "Received",
            Self::Diagnosing => "Diagnosing",
            Self::InProgress => "In progress",
            Self::WaitingParts => "Waiting for parts",
            Self::Ready => "Ready for pickup",
            Self::Delivered => "Delivered",
        }
    }
}

impl fmt::Display for TicketStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl FromStr for TicketStatus {
    type Err = bikeshop_core::AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|status| status.as_str() == s.trim())
            .ok_or_else(|| {
                bikeshop_core::AppError::validation(format!("Invalid ticket status: '{s}'"))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use TicketStatus::*;

    #[test]
    fn test_technician_table() {
        let expected: &[(TicketStatus, &[TicketStatus])] = &[
            (Received, &[Diagnosing]),
            (Diagnosing, &[InProgress, WaitingParts, Ready]),
            (InProgress, &[WaitingParts, Ready]),
            (WaitingParts, &[InProgress, Ready]),
            (Ready, &[Delivered]),
            (Delivered, &[]),
        ];
        for (from, allowed) in expected {
            for to in TicketStatus::ALL {
                let want = from == &to || allowed.contains(&to);
                assert_eq!(
                    from.permits(Role::Technician, to),
                    want,
                    "technician {from} -> {to}"
                );
            }
        }
    }

    #[test]
    fn test_admin_may_move_anywhere() {
        for from in TicketStatus::ALL {
            for to in TicketStatus::ALL {
                assert!(from.permits(Role::Admin, to));
            }
        }
    }

    #[test]
    fn test_customer_never_moves() {
        assert!(!Received.permits(Role::Customer, Diagnosing));
        assert!(!Ready.permits(Role::Customer, Ready));
    }

    #[test]
    fn test_wire_tokens_round_trip() {
        for status in TicketStatus::ALL {
            assert_eq!(status.as_str().parse::<TicketStatus>().unwrap(), status);
        }
        assert_eq!(
            serde_json::to_string(&WaitingParts).unwrap(),
            "\"waiting_parts\""
        );
        assert!("shipped".parse::<TicketStatus>().is_err());
    }
}
