//! Public repair tracking by code.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::Form;

use crate::dto::request::{SurveyForm, TrackingApproveForm, TrackingQuery};
use crate::error::HttpResult;
use crate::extractors::{CurrentUser, NoticeParams};
use crate::render::pages::public::{TrackingPage, TrackingResultPage};
use crate::render::render;
use crate::state::AppState;

fn normalize(code: &str) -> String {
    code.trim().to_lowercase()
}

/// GET /tracking, optionally with `?code=`.
pub async fn tracking_page(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(query): Query<TrackingQuery>,
) -> HttpResult<Response> {
    let code = query.code.as_deref().map(normalize).unwrap_or_default();
    if !code.is_empty() {
        return Ok(Redirect::to(&format!("/tracking/{code}")).into_response());
    }
    let page = TrackingPage {
        layout: state.layout("Track your repair", user),
        code: String::new(),
        not_found: false,
    };
    Ok(render(&page)?.into_response())
}

/// GET /tracking/{code}
pub async fn tracking_result(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Path(code): Path<String>,
    Query(notice): Query<NoticeParams>,
) -> HttpResult<Response> {
    let code = normalize(&code);
    let Some(ticket) = state.ticket_service.find_by_tracking_code(&code).await? else {
        let page = TrackingPage {
            layout: state.layout("Track your repair", user),
            code,
            not_found: true,
        };
        return Ok((StatusCode::NOT_FOUND, render(&page)?).into_response());
    };

    let detail = state.ticket_service.detail(ticket.id).await?;
    let can_survey = state.survey_service.enabled()
        && detail.survey.is_none()
        && ticket.status.accepts_survey();
    let ad = state.ad_service.pick_for_display().await;

    let page = TrackingResultPage {
        layout: state
            .layout(format!("Repair {code}"), user)
            .with_flash(notice.into_flash()),
        ticket: detail.ticket,
        history: detail.history,
        bicycle: detail.bicycle,
        quote: detail.quote,
        survey: detail.survey,
        can_survey,
        ad,
    };
    Ok(render(&page)?.into_response())
}

/// POST /tracking/quote/{id}/approve
pub async fn approve_quote(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<TrackingApproveForm>,
) -> HttpResult<Redirect> {
    let code = normalize(&form.tracking_code);
    state
        .quote_service
        .approve_with_tracking_code(id, &code)
        .await?;
    Ok(Redirect::to(&format!("/tracking/{code}?quote_approved=1")))
}

/// POST /tracking/{code}/survey
///
/// A second answer for the same ticket is dropped without complaint.
pub async fn submit_survey(
    State(state): State<AppState>,
    Path(code): Path<String>,
    Form(form): Form<SurveyForm>,
) -> HttpResult<Redirect> {
    let code = normalize(&code);
    let recorded = state
        .survey_service
        .submit_by_tracking_code(&code, form.rating, &form.feedback)
        .await?;
    let target = match recorded {
        Some(_) => format!("/tracking/{code}?survey=1"),
        None => format!("/tracking/{code}"),
    };
    Ok(Redirect::to(&target))
}
