//! Ticket overview across all technicians.

use axum::extract::{Path, Query, State};
use axum::response::{Html, Redirect};
use axum_extra::extract::Form;

use bikeshop_database::repositories::ticket::TicketFilter;

use crate::dto::request::{StatusQuery, TechnicianForm};
use crate::error::HttpResult;
use crate::extractors::{AuthUser, NoticeParams, PaginationParams};
use crate::handlers::workshop::parse_status_filter;
use crate::render::pages::admin::{AdminTicketsPage, TicketRow};
use crate::render::pages::{Pager, status_chips, technician_options};
use crate::render::render;
use crate::state::AppState;

/// GET /admin/tickets
pub async fn list_tickets(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<StatusQuery>,
    Query(pagination): Query<PaginationParams>,
    Query(notice): Query<NoticeParams>,
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
    let technicians = state.admin_user_service.technicians().await?;

    let pager = Pager::new(&page, "/admin/tickets", status);
    let rows = page
        .items
        .into_iter()
        .map(|ticket| TicketRow {
            technicians: technician_options(&technicians, ticket.technician_id),
            ticket,
        })
        .collect();

    render(&AdminTicketsPage {
        layout: state
            .layout("All tickets", Some(auth.0))
            .with_flash(notice.into_flash()),
        chips: status_chips("/admin/tickets", status),
        rows,
        pager,
    })
}

/// POST /admin/tickets/{id}/technician
pub async fn reassign(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Form(form): Form<TechnicianForm>,
) -> HttpResult<Redirect> {
    state
        .ticket_service
        .reassign(&auth, id, form.technician_id)
        .await?;
    Ok(Redirect::to(&format!("/tickets/{id}?saved=1")))
}
