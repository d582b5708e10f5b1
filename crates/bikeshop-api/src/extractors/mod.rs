//! Custom Axum extractors.

pub mod auth;
pub mod notice;
pub mod pagination;

pub use auth::{AuthUser, CurrentUser};
pub use notice::NoticeParams;
pub use pagination::PaginationParams;
