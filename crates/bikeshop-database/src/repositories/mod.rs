//! Repository implementations for all bike shop entities.

pub mod ad;
pub mod bicycle;
pub mod booking;
pub mod catalog;
pub mod quote;
pub mod setting;
pub mod survey;
pub mod ticket;
pub mod user;

pub use ad::AdRepository;
pub use bicycle::BicycleRepository;
pub use booking::BookingRepository;
pub use catalog::{BrandRepository, ServiceRepository};
pub use quote::QuoteRepository;
pub use setting::SettingRepository;
pub use survey::SurveyRepository;
pub use ticket::TicketRepository;
pub use user::UserRepository;

use bikeshop_core::error::{AppError, ErrorKind};

/// Map a sqlx error into a database `AppError` with context.
pub(crate) fn db_error(message: &'static str) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| AppError::with_source(ErrorKind::Database, message, e)
}

/// Like [`db_error`], but unique-constraint violations become conflicts.
pub(crate) fn db_error_or_conflict(
    message: &'static str,
    conflict: &'static str,
) -> impl FnOnce(sqlx::Error) -> AppError {
    move |e| {
        let unique = e
            .as_database_error()
            .is_some_and(|db| db.is_unique_violation());
        if unique {
            AppError::with_source(ErrorKind::Conflict, conflict, e)
        } else {
            AppError::with_source(ErrorKind::Database, message, e)
        }
    }
}
