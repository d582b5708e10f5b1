//! Session authentication middleware.

use axum::extract::{Request, State};
use axum::middleware::Next;
use axum::response::Response;
use axum_extra::extract::cookie::CookieJar;

use bikeshop_core::error::AppError;
use bikeshop_service::context::RequestContext;

use crate::error::HttpError;
use crate::extractors::auth::session_token;
use crate::state::AppState;

/// Rejects requests without a valid session token.
///
/// On success the caller's [`RequestContext`] is placed in the request
/// extensions for the role gate and the `AuthUser` extractor. A missing,
/// malformed or expired token turns into a redirect to `/login` that also
/// clears the cookie.
pub async fn require_auth(
    State(state): State<AppState>,
    jar: CookieJar,
    mut request: Request,
    next: Next,
) -> Result<Response, HttpError> {
    let token = session_token(&jar, request.headers())
        .ok_or_else(|| AppError::authentication("Not signed in"))?;

    let claims = state.jwt_decoder.decode(&token).map_err(|e| {
        tracing::debug!(error = %e, "Rejected session token");
        AppError::authentication("Session expired or invalid")
    })?;

    let ctx = RequestContext::from_claims(&claims);
    request.extensions_mut().insert(ctx.clone());
    let mut response = next.run(request).await;
    // Read back by the access log.
    response.extensions_mut().insert(ctx);
    Ok(response)
}
