//! Repair tickets, their audit trail and parts checklist.

pub mod history;
pub mod model;
pub mod part;
pub mod status;

pub use history::{NewHistoryEntry, TicketStatusHistory};
pub use model::{CreateTicket, Ticket};
pub use part::{PartStatus, TicketPart};
pub use status::TicketStatus;
