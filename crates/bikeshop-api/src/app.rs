//! Application builder: wires repositories, services, router and middleware.

use std::sync::Arc;
use std::time::Duration;

use axum::Router;
use axum::http::StatusCode;
use axum::middleware as axum_middleware;
use sqlx::SqlitePool;
use tower::ServiceBuilder;
use tower_http::compression::CompressionLayer;
use tower_http::services::ServeDir;
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;

use bikeshop_auth::{JwtDecoder, JwtEncoder, PasswordHasher, PasswordPolicy};
use bikeshop_core::config::AppConfig;
use bikeshop_database::repositories::{
    AdRepository, BicycleRepository, BookingRepository, BrandRepository, QuoteRepository,
    ServiceRepository, SettingRepository, SurveyRepository, TicketRepository, UserRepository,
};
use bikeshop_service::{
    AdService, AdminUserService, BookingService, CatalogService, MockPaymentProvider, Notifier,
    PaymentProvider, QuoteService, ReportService, SettingService, SurveyService, TicketService,
    UserService,
};

use crate::middleware::logging::request_logging;
use crate::middleware::security::{security_headers, static_cache_layer};
use crate::router::build_router;
use crate::state::AppState;

/// Construct every repository and service over `db_pool`.
pub fn build_state(config: AppConfig, db_pool: SqlitePool) -> AppState {
    // ── Repositories ─────────────────────────────────────────
    let user_repo = Arc::new(UserRepository::new(db_pool.clone()));
    let brand_repo = Arc::new(BrandRepository::new(db_pool.clone()));
    let service_repo = Arc::new(ServiceRepository::new(db_pool.clone()));
    let bicycle_repo = Arc::new(BicycleRepository::new(db_pool.clone()));
    let booking_repo = Arc::new(BookingRepository::new(db_pool.clone()));
    let quote_repo = Arc::new(QuoteRepository::new(db_pool.clone()));
    let ticket_repo = Arc::new(TicketRepository::new(db_pool.clone()));
    let survey_repo = Arc::new(SurveyRepository::new(db_pool.clone()));
    let ad_repo = Arc::new(AdRepository::new(db_pool.clone()));
    let setting_repo = Arc::new(SettingRepository::new(db_pool.clone()));

    // ── Auth ─────────────────────────────────────────────────
    let password_hasher = Arc::new(PasswordHasher::new());
    let password_policy = Arc::new(PasswordPolicy::new(&config.auth));
    let jwt_encoder = Arc::new(JwtEncoder::new(&config));
    let jwt_decoder = Arc::new(JwtDecoder::new(&config));

    // ── Collaborators ────────────────────────────────────────
    let notifier = Arc::new(Notifier::mock(&config.features));
    let payments: Option<Arc<dyn PaymentProvider>> = if config.features.payments {
        Some(Arc::new(MockPaymentProvider))
    } else {
        None
    };

    // ── Services ─────────────────────────────────────────────
    let user_service = Arc::new(UserService::new(
        Arc::clone(&user_repo),
        Arc::clone(&password_hasher),
        password_policy,
        jwt_encoder,
    ));
    let admin_user_service = Arc::new(AdminUserService::new(
        Arc::clone(&user_repo),
        Arc::clone(&password_hasher),
    ));
    let catalog_service = Arc::new(CatalogService::new(
        Arc::clone(&brand_repo),
        Arc::clone(&service_repo),
    ));
    let booking_service = Arc::new(BookingService::new(
        Arc::clone(&booking_repo),
        Arc::clone(&bicycle_repo),
        Arc::clone(&service_repo),
        Arc::clone(&quote_repo),
        Arc::clone(&ticket_repo),
    ));
    let ticket_service = Arc::new(TicketService::new(
        Arc::clone(&ticket_repo),
        Arc::clone(&booking_repo),
        Arc::clone(&user_repo),
        Arc::clone(&bicycle_repo),
        Arc::clone(&brand_repo),
        Arc::clone(&quote_repo),
        Arc::clone(&survey_repo),
        Arc::clone(&password_hasher),
        notifier,
        config.server.public_url.clone(),
    ));
    let quote_service = Arc::new(QuoteService::new(
        Arc::clone(&quote_repo),
        Arc::clone(&booking_repo),
        Arc::clone(&ticket_repo),
        payments,
    ));
    let survey_service = Arc::new(SurveyService::new(
        Arc::clone(&survey_repo),
        Arc::clone(&ticket_repo),
        Arc::clone(&booking_repo),
        config.features.surveys,
    ));
    let ad_service = Arc::new(AdService::new(ad_repo));
    let report_service = Arc::new(ReportService::new(
        user_repo,
        booking_repo,
        ticket_repo,
        quote_repo,
        survey_repo,
    ));
    let setting_service = Arc::new(SettingService::new(setting_repo));

    AppState {
        config: Arc::new(config),
        db_pool,
        jwt_decoder,
        user_service,
        admin_user_service,
        catalog_service,
        booking_service,
        ticket_service,
        quote_service,
        survey_service,
        ad_service,
        report_service,
        setting_service,
    }
}

/// Builds the complete Axum application with all routes and middleware.
pub fn build_app(state: AppState) -> Router {
    let debug = state.config.debug;
    let timeout = Duration::from_secs(state.config.server.request_timeout_seconds);
    let static_files = ServiceBuilder::new()
        .layer(static_cache_layer(debug))
        .service(ServeDir::new(&state.config.server.static_dir));

    build_router(state)
        .nest_service("/static", static_files)
        .layer(axum_middleware::from_fn(security_headers))
        .layer(axum_middleware::from_fn(request_logging))
        .layer(TimeoutLayer::with_status_code(
            StatusCode::REQUEST_TIMEOUT,
            timeout,
        ))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
}
