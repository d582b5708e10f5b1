//! Role gate middleware for route groups.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;

use bikeshop_auth::RoleGate;
use bikeshop_core::error::AppError;
use bikeshop_service::context::RequestContext;

use crate::error::HttpError;

/// Lets the request through when the authenticated role passes `gate`.
///
/// Must run after [`require_auth`](super::auth::require_auth); a request
/// without a context is treated as unauthenticated.
pub async fn require_role(
    State(gate): State<RoleGate>,
    request: Request,
    next: Next,
) -> Result<Response, HttpError> {
    let role = request
        .extensions()
        .get::<RequestContext>()
        .map(|ctx| ctx.role)
        .ok_or_else(|| AppError::authentication("Not signed in"))?;

    if let Err(e) = gate.authorize(role) {
        tracing::debug!(role = %role, path = %request.uri().path(), "Role gate denied request");
        return Err(e.into());
    }
    Ok(next.run(request).await)
}
