//! Ticket workflow: creation, status changes, notes, parts and reassignment.

pub mod service;
pub mod tracking;

pub use service::{StatusChange, TicketDetail, TicketService, WalkInRequest};
pub use tracking::{generate_tracking_code, render_qr_png};
