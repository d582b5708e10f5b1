//! Access log.

use std::time::Instant;

use axum::extract::Request;
use axum::middleware::Next;
use axum::response::Response;

use bikeshop_service::context::RequestContext;

/// Path prefixes logged at `debug` only.
const QUIET_PREFIXES: &[&str] = &["/static/", "/health"];

/// One line per request: method, path, status, elapsed time and, once the
/// auth gate has run, the user. Server errors log at `warn`.
pub async fn request_logging(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_string();
    let start = Instant::now();

    let response = next.run(request).await;

    let elapsed_ms = start.elapsed().as_millis() as u64;
    let status = response.status().as_u16();
    let user_id = response
        .extensions()
        .get::<RequestContext>()
        .map(|ctx| ctx.user_id);

    if response.status().is_server_error() {
        tracing::warn!(%method, %path, status, elapsed_ms, ?user_id, "Request failed");
    } else if QUIET_PREFIXES.iter().any(|p| path.starts_with(p)) {
        tracing::debug!(%method, %path, status, elapsed_ms, "Request");
    } else {
        tracing::info!(%method, %path, status, elapsed_ms, ?user_id, "Request");
    }

    response
}
