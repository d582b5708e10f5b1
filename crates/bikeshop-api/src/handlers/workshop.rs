//! Workshop handlers for technicians and admins.

use axum::extract::{Path, Query, State};
use axum::http::{HeaderMap, StatusCode};
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::Form;
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use serde::Deserialize;

use bikeshop_core::error::{AppError, ErrorKind};
use bikeshop_core::types::PageRequest;
use bikeshop_database::repositories::ticket::TicketFilter;
use bikeshop_entity::ticket::TicketStatus;
use bikeshop_service::context::RequestContext;
use bikeshop_service::ticket::render_qr_png;

use crate::dto::request::{
    BicycleForm, NotesForm, PartForm, QuoteForm, StatusForm, StatusQuery, WalkInForm,
    validate_form,
};
use crate::error::HttpResult;
use crate::extractors::{AuthUser, NoticeParams, PaginationParams};
use crate::render::pages::workshop::{
    QuoteNewPage, TicketDetailPage, TicketLabelPage, TicketNewPage, TicketQuotePage,
    TicketsPage, WorkshopPage,
};
use crate::render::pages::{Pager, status_chips, status_options, technician_options};
use crate::render::render;
use crate::state::AppState;

/// Rows in the dashboard lists.
const DASHBOARD_ROWS: u32 = 10;

/// GET /workshop
pub async fn dashboard(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(notice): Query<NoticeParams>,
) -> HttpResult<Html<String>> {
    let counts = state.ticket_service.status_counts().await?;
    let pending = state.booking_service.pending(DASHBOARD_ROWS.into()).await?;
    let mine = state
        .ticket_service
        .list(
            TicketFilter {
                status: None,
                technician_id: Some(auth.user_id),
            },
            PageRequest::new(1, DASHBOARD_ROWS),
        )
        .await?;

    render(&WorkshopPage {
        layout: state
            .layout("Workshop", Some(auth.0))
            .with_flash(notice.into_flash()),
        status_counts: counts,
        pending_bookings: pending,
        my_tickets: mine.items,
    })
}

/// The `?status=` filter; blank means every status.
pub(crate) fn parse_status_filter(query: &StatusQuery) -> HttpResult<Option<TicketStatus>> {
    match query.status.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(status) => Ok(Some(status.parse()?)),
    }
}

/// GET /tickets
pub async fn tickets(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<StatusQuery>,
    Query(pagination): Query<PaginationParams>,
) -> HttpResult<Html<String>> {
    let status = parse_status_filter(&query)?;
    let page = state
        .ticket_service
        .list(
            TicketFilter {
                status,
                technician_id: None,
            },
            pagination.into_page_request(),
        )
        .await?;

    let pager = Pager::new(&page, "/tickets", status);
    render(&TicketsPage {
        layout: state.layout("Tickets", Some(auth.0)),
        chips: status_chips("/tickets", status),
        tickets: page.items,
        pager,
    })
}

/// Statuses offered in the status form: everything for admins, otherwise
/// the current status followed by the permitted moves. A final status
/// still offers itself so notes can be recorded.
fn next_statuses(ctx: &RequestContext, current: TicketStatus) -> Vec<TicketStatus> {
    if ctx.is_admin() {
        return TicketStatus::ALL.to_vec();
    }
    std::iter::once(current)
        .chain(current.allowed_next().iter().copied())
        .collect()
}

/// GET /tickets/{id}
pub async fn ticket_detail(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Query(notice): Query<NoticeParams>,
) -> HttpResult<Html<String>> {
    let detail = state.ticket_service.detail(id).await?;
    let technicians = if auth.is_admin() {
        state.admin_user_service.technicians().await?
    } else {
        Vec::new()
    };
    let tracking_url = state
        .ticket_service
        .tracking_url(&detail.ticket.tracking_code);
    let statuses = status_options(
        next_statuses(&auth, detail.ticket.status),
        detail.ticket.status,
    );
    let technicians = technician_options(&technicians, detail.ticket.technician_id);

    render(&TicketDetailPage {
        layout: state
            .layout(format!("Ticket #{id}"), Some(auth.0))
            .with_flash(notice.into_flash()),
        detail,
        statuses,
        technicians,
        tracking_url,
    })
}

/// POST /tickets/{id}/status
///
/// Disallowed moves and storage failures come back as a redirect with an
/// `error` code; a ticket assigned to someone else is a 403.
pub async fn update_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Form(form): Form<StatusForm>,
) -> HttpResult<Redirect> {
    let back = format!("/tickets/{id}");
    let Ok(next) = form.status.parse::<TicketStatus>() else {
        return Ok(Redirect::to(&format!("{back}?error=invalid_transition")));
    };

    match state
        .ticket_service
        .update_status(&auth, id, next, &form.notes)
        .await
    {
        Ok(_) => Ok(Redirect::to(&format!("{back}?saved=1"))),
        Err(e) if e.is(ErrorKind::InvalidTransition) => {
            Ok(Redirect::to(&format!("{back}?error=invalid_transition")))
        }
        Err(e) if e.is(ErrorKind::Authorization) || e.is(ErrorKind::NotFound) => Err(e.into()),
        Err(e) => {
            tracing::error!(ticket_id = id, error = %e, "Status update failed");
            Ok(Redirect::to(&format!("{back}?error=update_failed")))
        }
    }
}

/// POST /tickets/{id}/notes
pub async fn update_notes(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Form(form): Form<NotesForm>,
) -> HttpResult<Redirect> {
    state
        .ticket_service
        .update_notes(&auth, id, &form.notes)
        .await?;
    Ok(Redirect::to(&format!("/tickets/{id}?saved=1")))
}

/// POST /tickets/{id}/parts
pub async fn add_part(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Form(form): Form<PartForm>,
) -> HttpResult<Redirect> {
    state.ticket_service.add_part(&auth, id, &form.name).await?;
    Ok(Redirect::to(&format!("/tickets/{id}")))
}

fn is_htmx(headers: &HeaderMap) -> bool {
    headers.contains_key("hx-request")
}

/// POST /tickets/{id}/parts/{part_id}/toggle
///
/// Answers in-page requests (`HX-Request`) with the new status, browsers
/// with a redirect.
pub async fn toggle_part(
    State(state): State<AppState>,
    auth: AuthUser,
    headers: HeaderMap,
    Path((id, part_id)): Path<(i64, i64)>,
) -> HttpResult<Response> {
    let status = state
        .ticket_service
        .toggle_part(&auth, id, part_id)
        .await?;
    if is_htmx(&headers) {
        return Ok((StatusCode::OK, status.as_str()).into_response());
    }
    Ok(Redirect::to(&format!("/tickets/{id}")).into_response())
}

/// POST /tickets/{id}/parts/{part_id}/delete
pub async fn delete_part(
    State(state): State<AppState>,
    auth: AuthUser,
    headers: HeaderMap,
    Path((id, part_id)): Path<(i64, i64)>,
) -> HttpResult<Response> {
    state
        .ticket_service
        .delete_part(&auth, id, part_id)
        .await?;
    if is_htmx(&headers) {
        return Ok(StatusCode::OK.into_response());
    }
    Ok(Redirect::to(&format!("/tickets/{id}")).into_response())
}

/// GET /tickets/new
pub async fn ticket_new(
    State(state): State<AppState>,
    auth: AuthUser,
) -> HttpResult<Html<String>> {
    let services = state.catalog_service.services().await?;
    render(&TicketNewPage::new(
        state.layout("Walk-in ticket", Some(auth.0)),
        &services,
    ))
}

/// POST /tickets/create_direct
pub async fn create_walk_in(
    State(state): State<AppState>,
    Form(form): Form<WalkInForm>,
) -> HttpResult<Redirect> {
    validate_form(&form)?;
    let ticket = state
        .ticket_service
        .create_walk_in(form.into_request())
        .await?;
    Ok(Redirect::to(&format!("/tickets/{}?created=1", ticket.id)))
}

/// POST /bookings/{id}/ticket
pub async fn create_from_booking(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(booking_id): Path<i64>,
) -> HttpResult<Redirect> {
    let ticket = state
        .ticket_service
        .create_from_booking(&auth, booking_id)
        .await?;
    Ok(Redirect::to(&format!("/tickets/{}?created=1", ticket.id)))
}

/// POST /bicycles/{id}/update
pub async fn update_bicycle(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<BicycleForm>,
) -> HttpResult<Redirect> {
    state
        .booking_service
        .update_bicycle(id, &form.color, &form.serial_number, &form.notes)
        .await?;
    Ok(Redirect::to(&form.redirect_or("/workshop")))
}

/// POST /bookings/{id}/bicycle
pub async fn attach_bicycle(
    State(state): State<AppState>,
    Path(booking_id): Path<i64>,
    Form(form): Form<BicycleForm>,
) -> HttpResult<Redirect> {
    state
        .booking_service
        .attach_new_bicycle(booking_id, &form.color, &form.serial_number, &form.notes)
        .await?;
    Ok(Redirect::to(&form.redirect_or("/workshop")))
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct QuoteNewQuery {
    pub ticket_id: Option<i64>,
}

/// GET /quotes/new/{booking_id}
pub async fn quote_new(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(booking_id): Path<i64>,
    Query(query): Query<QuoteNewQuery>,
    Query(notice): Query<NoticeParams>,
) -> HttpResult<Html<String>> {
    let booking = state.booking_service.get(booking_id).await?;
    let service = match booking.service_id {
        Some(service_id) => state.catalog_service.service(service_id).await.ok(),
        None => None,
    };
    let customer_name = state
        .admin_user_service
        .get(booking.customer_id)
        .await
        .map(|u| u.name)
        .unwrap_or_default();

    let layout = state
        .layout(format!("Quote for booking #{booking_id}"), Some(auth.0))
        .with_flash(notice.into_flash());
    render(&QuoteNewPage::new(
        layout,
        booking,
        query.ticket_id,
        service,
        customer_name,
    ))
}

/// POST /quotes/new/{booking_id}
pub async fn create_quote(
    State(state): State<AppState>,
    Path(booking_id): Path<i64>,
    Form(form): Form<QuoteForm>,
) -> HttpResult<Redirect> {
    let items = form.items()?;
    let ticket_suffix = form
        .ticket_id()
        .map(|id| format!("&ticket_id={id}"))
        .unwrap_or_default();
    if items.is_empty() {
        return Ok(Redirect::to(&format!(
            "/quotes/new/{booking_id}?error=invalid_quote{ticket_suffix}"
        )));
    }
    state.quote_service.create(booking_id, items).await?;
    let target = match form.ticket_id() {
        Some(ticket_id) => format!("/tickets/{ticket_id}?quote_created=1"),
        None => "/workshop?quote_created=1".to_string(),
    };
    Ok(Redirect::to(&target))
}

/// GET /tickets/{id}/label
pub async fn ticket_label(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> HttpResult<Html<String>> {
    let detail = state.ticket_service.detail(id).await?;
    let tracking_url = state
        .ticket_service
        .tracking_url(&detail.ticket.tracking_code);
    let png = match &detail.ticket.qr_code {
        Some(png) if !png.is_empty() => png.clone(),
        _ => render_qr_png(&tracking_url)?,
    };

    render(&TicketLabelPage {
        layout: state.layout(format!("Label {}", detail.ticket.tracking_code), Some(auth.0)),
        ticket: detail.ticket,
        qr_base64: STANDARD.encode(png),
        tracking_url,
        customer: detail.customer,
        bicycle: detail.bicycle,
    })
}

/// GET /tickets/{id}/quote
pub async fn ticket_quote(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> HttpResult<Html<String>> {
    let detail = state.ticket_service.detail(id).await?;
    let quote = detail
        .quote
        .ok_or_else(|| AppError::not_found(format!("Ticket {id} has no quote")))?;

    render(&TicketQuotePage {
        layout: state.layout(format!("Quote #{}", quote.id), Some(auth.0)),
        ticket: detail.ticket,
        quote,
        customer: detail.customer,
        bicycle: detail.bicycle,
    })
}
