//! Customer area: dashboard, bookings, quotes, profile and surveys.

use axum::extract::{Path, Query, State};
use axum::response::{Html, Redirect};
use axum_extra::extract::Form;
use chrono::Utc;

use bikeshop_core::error::AppError;
use bikeshop_entity::booking::BookingStatus;

use crate::dto::request::{BookingForm, ProfileForm, RejectForm, SurveyForm, validate_form};
use crate::error::HttpResult;
use crate::extractors::{AuthUser, NoticeParams};
use crate::render::pages::customer::{
    BookingDetailPage, BookingNewPage, BookingsPage, DashboardPage, ProfilePage,
    QuoteDetailPage, QuotesPage, SurveyCompletedPage, SurveyPage,
};
use crate::render::render;
use crate::state::AppState;

/// Bookings shown on the dashboard.
const RECENT_BOOKINGS: usize = 5;

/// GET /dashboard
pub async fn dashboard(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(notice): Query<NoticeParams>,
) -> HttpResult<Html<String>> {
    let bookings = state
        .booking_service
        .recent_for(&auth, RECENT_BOOKINGS)
        .await?;
    let tickets = state
        .ticket_service
        .list_for_customer(auth.user_id)
        .await?;
    let pending_quotes = state
        .quote_service
        .list_for(&auth)
        .await?
        .iter()
        .filter(|q| q.is_pending())
        .count();

    render(&DashboardPage {
        layout: state
            .layout("Dashboard", Some(auth.0))
            .with_flash(notice.into_flash()),
        bookings,
        tickets,
        pending_quotes,
    })
}

/// GET /bookings
pub async fn bookings(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(notice): Query<NoticeParams>,
) -> HttpResult<Html<String>> {
    let bookings = state.booking_service.list_for(&auth).await?;
    render(&BookingsPage {
        layout: state
            .layout("My bookings", Some(auth.0))
            .with_flash(notice.into_flash()),
        bookings,
    })
}

/// GET /bookings/new
pub async fn booking_new(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(notice): Query<NoticeParams>,
) -> HttpResult<Html<String>> {
    let min_date = Utc::now().date_naive().format("%Y-%m-%d").to_string();
    let services = state.catalog_service.services().await?;
    let bicycles = state.booking_service.bicycles_for(&auth).await?;
    let brands = state.catalog_service.brands().await?;
    let slots = state.booking_service.available_slots(&min_date).await?;

    let layout = state
        .layout("Book a service", Some(auth.0))
        .with_flash(notice.into_flash());
    render(&BookingNewPage::new(
        layout, &services, &bicycles, &brands, &slots, min_date,
    ))
}

/// POST /bookings
pub async fn create_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Form(form): Form<BookingForm>,
) -> HttpResult<Redirect> {
    let booking = state
        .booking_service
        .create(&auth, form.into_request())
        .await?;
    Ok(Redirect::to(&format!("/bookings/{}?created=1", booking.id)))
}

/// GET /bookings/{id}
pub async fn booking_detail(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Query(notice): Query<NoticeParams>,
) -> HttpResult<Html<String>> {
    let detail = state.booking_service.detail(&auth, id).await?;
    let can_cancel = detail.booking.status == BookingStatus::Pending && detail.ticket.is_none();
    render(&BookingDetailPage {
        layout: state
            .layout(format!("Booking #{id}"), Some(auth.0))
            .with_flash(notice.into_flash()),
        detail,
        can_cancel,
    })
}

/// POST /bookings/{id}/cancel
pub async fn cancel_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> HttpResult<Redirect> {
    state.booking_service.cancel(&auth, id).await?;
    Ok(Redirect::to("/bookings?cancelled=1"))
}

/// GET /quotes
pub async fn quotes(
    State(state): State<AppState>,
    auth: AuthUser,
) -> HttpResult<Html<String>> {
    let quotes = state.quote_service.list_for(&auth).await?;
    render(&QuotesPage {
        layout: state.layout("My quotes", Some(auth.0)),
        quotes,
    })
}

/// GET /quotes/{id}
pub async fn quote_detail(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Query(notice): Query<NoticeParams>,
) -> HttpResult<Html<String>> {
    let (quote, booking) = state.quote_service.visible(&auth, id).await?;
    render(&QuoteDetailPage {
        layout: state
            .layout(format!("Quote #{id}"), Some(auth.0))
            .with_flash(notice.into_flash()),
        quote,
        booking,
    })
}

/// POST /quotes/{id}/approve
pub async fn approve_quote(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> HttpResult<Redirect> {
    state.quote_service.approve(&auth, id).await?;
    Ok(Redirect::to(&format!("/quotes/{id}?quote_approved=1")))
}

/// POST /quotes/{id}/reject
pub async fn reject_quote(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Form(form): Form<RejectForm>,
) -> HttpResult<Redirect> {
    state.quote_service.reject(&auth, id, &form.reason).await?;
    Ok(Redirect::to(&format!("/quotes/{id}?saved=1")))
}

/// GET /profile
pub async fn profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(notice): Query<NoticeParams>,
) -> HttpResult<Html<String>> {
    let profile = state.user_service.profile(&auth).await?;
    render(&ProfilePage {
        layout: state
            .layout("My profile", Some(auth.0))
            .with_flash(notice.into_flash()),
        profile,
    })
}

/// POST /profile
pub async fn update_profile(
    State(state): State<AppState>,
    auth: AuthUser,
    Form(form): Form<ProfileForm>,
) -> HttpResult<Redirect> {
    validate_form(&form)?;
    state
        .user_service
        .update_profile(&auth, &form.name, &form.phone)
        .await?;
    Ok(Redirect::to("/profile?saved=1"))
}

/// GET /survey/{id}
pub async fn survey_page(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Query(notice): Query<NoticeParams>,
) -> HttpResult<Html<String>> {
    let (ticket, existing) = state.survey_service.form(&auth, id).await?;
    let flash = notice.into_flash();
    if let Some(survey) = existing {
        return render(&SurveyCompletedPage {
            layout: state.layout("Thank you", Some(auth.0)).with_flash(flash),
            ticket,
            survey,
        });
    }
    if !state.survey_service.enabled() || !ticket.status.accepts_survey() {
        return Err(AppError::validation("This repair cannot be rated yet").into());
    }
    render(&SurveyPage {
        layout: state.layout("Rate your repair", Some(auth.0)).with_flash(flash),
        ticket,
    })
}

/// POST /survey/{id}
pub async fn submit_survey(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Form(form): Form<SurveyForm>,
) -> HttpResult<Redirect> {
    state
        .survey_service
        .submit(&auth, id, form.rating, &form.feedback)
        .await?;
    Ok(Redirect::to(&format!("/survey/{id}?survey=1")))
}
