//! End-to-end tests driving the full router over in-memory SQLite.

mod helpers;

mod auth_test;
mod booking_test;
mod quote_test;
mod role_gate_test;
mod ticket_test;
mod tracking_test;
