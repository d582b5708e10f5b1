//! Application state shared across all handlers and middleware.

use std::sync::Arc;

use sqlx::SqlitePool;

use bikeshop_auth::jwt::JwtDecoder;
use bikeshop_core::config::AppConfig;
use bikeshop_service::{
    AdService, AdminUserService, BookingService, CatalogService, QuoteService, ReportService,
    SettingService, SurveyService, TicketService, UserService,
};

use bikeshop_service::RequestContext;

use crate::render::Layout;

/// Application state containing all shared dependencies.
///
/// Passed to every Axum handler via `State<AppState>`.
/// All fields are `Arc`-wrapped for cheap cloning across tasks.
#[derive(Debug, Clone)]
pub struct AppState {
    // ── Configuration ────────────────────────────────────────
    pub config: Arc<AppConfig>,

    // ── Infrastructure ───────────────────────────────────────
    /// SQLite connection pool
    pub db_pool: SqlitePool,
    /// Session token decoder, used by the auth middleware
    pub jwt_decoder: Arc<JwtDecoder>,

    // ── Services ─────────────────────────────────────────────
    pub user_service: Arc<UserService>,
    pub admin_user_service: Arc<AdminUserService>,
    pub catalog_service: Arc<CatalogService>,
    pub booking_service: Arc<BookingService>,
    pub ticket_service: Arc<TicketService>,
    pub quote_service: Arc<QuoteService>,
    pub survey_service: Arc<SurveyService>,
    pub ad_service: Arc<AdService>,
    pub report_service: Arc<ReportService>,
    pub setting_service: Arc<SettingService>,
}

impl AppState {
    /// Page chrome for `title`, branded from the business config.
    pub fn layout(&self, title: impl Into<String>, user: Option<RequestContext>) -> Layout {
        Layout::new(&self.config.business, title, user)
    }
}
