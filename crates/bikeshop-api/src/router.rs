//! Route definitions for the bike shop web application.
//!
//! Routes are grouped by who may reach them. Public pages need nothing,
//! the customer area and JSON endpoints need a session, the workshop sits
//! behind the staff gate and the back office behind the admin gate. The
//! auth gate always runs before a role gate.

use axum::{
    Router,
    middleware as axum_middleware,
    routing::{get, post},
};

use bikeshop_auth::RoleGate;
use bikeshop_core::error::AppError;

use crate::error::HttpError;
use crate::handlers;
use crate::middleware::auth::require_auth;
use crate::middleware::rbac::require_role;
use crate::state::AppState;

/// Build the application router with every route group mounted.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .merge(public_routes())
        .merge(customer_routes(&state))
        .merge(api_routes(&state))
        .merge(workshop_routes(&state))
        .merge(admin_routes(&state))
        .fallback(not_found)
        .with_state(state)
}

async fn not_found() -> HttpError {
    AppError::not_found("Page not found").into()
}

/// Home, sign in, registration and the tracking lookup.
fn public_routes() -> Router<AppState> {
    Router::new()
        .route("/", get(handlers::public::home))
        .route("/services", get(handlers::public::services))
        .route("/health", get(handlers::health::health))
        .route("/health/detailed", get(handlers::health::health_detailed))
        .route(
            "/login",
            get(handlers::auth::login_page).post(handlers::auth::login),
        )
        .route(
            "/register",
            get(handlers::auth::register_page).post(handlers::auth::register),
        )
        .route(
            "/logout",
            get(handlers::auth::logout).post(handlers::auth::logout),
        )
        .route("/tracking", get(handlers::tracking::tracking_page))
        .route("/tracking/{code}", get(handlers::tracking::tracking_result))
        .route(
            "/tracking/{code}/survey",
            post(handlers::tracking::submit_survey),
        )
        .route(
            "/tracking/quote/{id}/approve",
            post(handlers::tracking::approve_quote),
        )
        .route("/ads/{id}/click", get(handlers::public::ad_click))
}

/// Pages for any signed-in user; data is scoped to the caller.
fn customer_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/dashboard", get(handlers::customer::dashboard))
        .route(
            "/bookings",
            get(handlers::customer::bookings).post(handlers::customer::create_booking),
        )
        .route("/bookings/new", get(handlers::customer::booking_new))
        .route("/bookings/{id}", get(handlers::customer::booking_detail))
        .route(
            "/bookings/{id}/cancel",
            post(handlers::customer::cancel_booking),
        )
        .route("/quotes", get(handlers::customer::quotes))
        .route("/quotes/{id}", get(handlers::customer::quote_detail))
        .route(
            "/quotes/{id}/approve",
            post(handlers::customer::approve_quote),
        )
        .route("/quotes/{id}/reject", post(handlers::customer::reject_quote))
        .route(
            "/profile",
            get(handlers::customer::profile).post(handlers::customer::update_profile),
        )
        .route(
            "/survey/{id}",
            get(handlers::customer::survey_page).post(handlers::customer::submit_survey),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ))
}

/// JSON helpers used by page scripts.
fn api_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route(
            "/api/brands/{id}/models",
            get(handlers::api::models_by_brand),
        )
        .route("/api/slots", get(handlers::api::slots))
        .route(
            "/api/tickets/{id}/status",
            get(handlers::api::ticket_status),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ))
}

/// Technician work area. Admins pass the staff gate too.
fn workshop_routes(state: &AppState) -> Router<AppState> {
    Router::new()
        .route("/workshop", get(handlers::workshop::dashboard))
        .route("/tickets", get(handlers::workshop::tickets))
        .route("/tickets/new", get(handlers::workshop::ticket_new))
        .route(
            "/tickets/create_direct",
            post(handlers::workshop::create_walk_in),
        )
        .route("/tickets/{id}", get(handlers::workshop::ticket_detail))
        .route(
            "/tickets/{id}/status",
            post(handlers::workshop::update_status),
        )
        .route("/tickets/{id}/notes", post(handlers::workshop::update_notes))
        .route("/tickets/{id}/parts", post(handlers::workshop::add_part))
        .route(
            "/tickets/{id}/parts/{part_id}/toggle",
            post(handlers::workshop::toggle_part),
        )
        .route(
            "/tickets/{id}/parts/{part_id}/delete",
            post(handlers::workshop::delete_part),
        )
        .route("/tickets/{id}/label", get(handlers::workshop::ticket_label))
        .route("/tickets/{id}/quote", get(handlers::workshop::ticket_quote))
        .route(
            "/bookings/{id}/ticket",
            post(handlers::workshop::create_from_booking),
        )
        .route(
            "/bookings/{id}/bicycle",
            post(handlers::workshop::attach_bicycle),
        )
        .route(
            "/bicycles/{id}/update",
            post(handlers::workshop::update_bicycle),
        )
        .route(
            "/quotes/new/{booking_id}",
            get(handlers::workshop::quote_new).post(handlers::workshop::create_quote),
        )
        .route_layer(axum_middleware::from_fn_with_state(
            RoleGate::STAFF,
            require_role,
        ))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ))
}

/// Back office.
fn admin_routes(state: &AppState) -> Router<AppState> {
    use handlers::admin::{ads, catalog, reports, settings, tickets, users};

    Router::new()
        .route("/admin", get(handlers::admin::dashboard))
        // Users
        .route("/admin/users", get(users::list_users))
        .route(
            "/admin/users/new",
            get(users::new_user).post(users::create_user),
        )
        .route(
            "/admin/users/{id}",
            get(users::edit_user).post(users::update_user),
        )
        .route("/admin/users/{id}/delete", post(users::delete_user))
        // Catalog
        .route("/admin/brands", get(catalog::brands))
        .route(
            "/admin/brands/new",
            get(catalog::new_brand).post(catalog::create_brand),
        )
        .route(
            "/admin/brands/{id}",
            get(catalog::edit_brand).post(catalog::update_brand),
        )
        .route("/admin/brands/{id}/delete", post(catalog::delete_brand))
        .route("/admin/models", get(catalog::models))
        .route(
            "/admin/models/new",
            get(catalog::new_model).post(catalog::create_model),
        )
        .route(
            "/admin/models/{id}",
            get(catalog::edit_model).post(catalog::update_model),
        )
        .route("/admin/models/{id}/delete", post(catalog::delete_model))
        .route("/admin/services", get(catalog::services))
        .route(
            "/admin/services/new",
            get(catalog::new_service).post(catalog::create_service),
        )
        .route(
            "/admin/services/{id}",
            get(catalog::edit_service).post(catalog::update_service),
        )
        .route("/admin/services/{id}/delete", post(catalog::delete_service))
        // Reports
        .route("/admin/reports", get(reports::overview))
        .route("/admin/reports/bookings", get(reports::bookings))
        .route("/admin/reports/revenue", get(reports::revenue))
        .route("/admin/reports/surveys", get(reports::surveys))
        // Tickets
        .route("/admin/tickets", get(tickets::list_tickets))
        .route("/admin/tickets/{id}/technician", post(tickets::reassign))
        // Settings and ads
        .route(
            "/admin/settings",
            get(settings::settings_page).post(settings::save_settings),
        )
        .route("/admin/ads", get(ads::list_ads).post(ads::create_ad))
        .route("/admin/ads/{id}/update", post(ads::update_ad))
        .route("/admin/ads/{id}/delete", post(ads::delete_ad))
        .route_layer(axum_middleware::from_fn_with_state(
            RoleGate::ADMIN,
            require_role,
        ))
        .route_layer(axum_middleware::from_fn_with_state(
            state.clone(),
            require_auth,
        ))
}
