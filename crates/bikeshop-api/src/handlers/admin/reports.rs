//! Report pages.

use axum::extract::{Query, State};
use axum::response::Html;

use crate::dto::request::ReportRangeQuery;
use crate::error::HttpResult;
use crate::extractors::AuthUser;
use crate::render::pages::admin::{
    BookingsReportPage, ReportsPage, RevenueReportPage, SurveysReportPage,
};
use crate::render::render;
use crate::state::AppState;

/// GET /admin/reports
pub async fn overview(State(state): State<AppState>, auth: AuthUser) -> HttpResult<Html<String>> {
    let overview = state.report_service.overview().await?;
    render(&ReportsPage {
        layout: state.layout("Reports", Some(auth.0)),
        overview,
    })
}

/// GET /admin/reports/bookings
pub async fn bookings(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<ReportRangeQuery>,
) -> HttpResult<Html<String>> {
    let (from, to) = query.range()?;
    let report = state.report_service.bookings(from, to).await?;
    render(&BookingsReportPage {
        layout: state.layout("Bookings report", Some(auth.0)),
        report,
    })
}

/// GET /admin/reports/revenue
pub async fn revenue(State(state): State<AppState>, auth: AuthUser) -> HttpResult<Html<String>> {
    let report = state.report_service.revenue().await?;
    render(&RevenueReportPage {
        layout: state.layout("Revenue", Some(auth.0)),
        report,
    })
}

/// GET /admin/reports/surveys
pub async fn surveys(State(state): State<AppState>, auth: AuthUser) -> HttpResult<Html<String>> {
    let report = state.report_service.surveys().await?;
    render(&SurveysReportPage {
        layout: state.layout("Satisfaction", Some(auth.0)),
        report,
    })
}
