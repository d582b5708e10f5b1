//! Admin-only handlers. Every route here sits behind the admin role gate.

pub mod ads;
pub mod catalog;
pub mod reports;
pub mod settings;
pub mod tickets;
pub mod users;

use axum::extract::{Query, State};
use axum::response::Html;

use crate::error::HttpResult;
use crate::extractors::{AuthUser, NoticeParams};
use crate::render::pages::admin::AdminDashboardPage;
use crate::render::render;
use crate::state::AppState;

/// GET /admin
pub async fn dashboard(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(notice): Query<NoticeParams>,
) -> HttpResult<Html<String>> {
    let stats = state.report_service.dashboard().await?;
    render(&AdminDashboardPage {
        layout: state
            .layout("Administration", Some(auth.0))
            .with_flash(notice.into_flash()),
        stats,
    })
}
