//! JSON endpoints used by page scripts.

use axum::Json;
use axum::extract::{Path, Query, State};
use serde_json::{Value, json};

use bikeshop_core::error::AppError;

use crate::dto::request::SlotsQuery;
use crate::dto::response::TicketStatusResponse;
use crate::error::ApiResult;
use crate::extractors::AuthUser;
use crate::state::AppState;

/// GET /api/brands/{id}/models
pub async fn models_by_brand(
    State(state): State<AppState>,
    Path(brand_id): Path<i64>,
) -> ApiResult<Json<Value>> {
    let models = state.catalog_service.models_by_brand(brand_id).await?;
    Ok(Json(json!(models)))
}

/// GET /api/slots?date=YYYY-MM-DD
pub async fn slots(
    State(state): State<AppState>,
    Query(query): Query<SlotsQuery>,
) -> ApiResult<Json<Value>> {
    let slots = state.booking_service.available_slots(&query.date).await?;
    Ok(Json(json!({ "date": query.date, "slots": slots })))
}

/// GET /api/tickets/{id}/status
///
/// Customers only see tickets for their own bookings.
pub async fn ticket_status(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> ApiResult<Json<TicketStatusResponse>> {
    let ticket = state.ticket_service.get(id).await?;
    if !auth.is_staff() {
        let booking = state.booking_service.get(ticket.booking_id).await?;
        if booking.customer_id != auth.user_id {
            return Err(AppError::authorization("Not your ticket").into());
        }
    }
    Ok(Json(TicketStatusResponse::from(&ticket)))
}
