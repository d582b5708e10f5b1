//! Security response headers and static asset caching.

use axum::extract::Request;
use axum::http::header::{self, HeaderName, HeaderValue};
use axum::middleware::Next;
use axum::response::Response;
use tower_http::set_header::SetResponseHeaderLayer;

const CONTENT_SECURITY_POLICY: &str = "default-src 'self'; style-src 'self' 'unsafe-inline'; \
     script-src 'self' 'unsafe-inline'; img-src * data:; media-src *; font-src 'self'";

const SECURITY_HEADERS: &[(&str, &str)] = &[
    ("x-content-type-options", "nosniff"),
    ("x-frame-options", "DENY"),
    ("x-xss-protection", "1; mode=block"),
    ("referrer-policy", "strict-origin-when-cross-origin"),
    ("content-security-policy", CONTENT_SECURITY_POLICY),
    ("permissions-policy", "geolocation=(), microphone=(), camera=()"),
];

/// Adds the fixed security headers to every response.
pub async fn security_headers(request: Request, next: Next) -> Response {
    let mut response = next.run(request).await;
    let headers = response.headers_mut();
    for (name, value) in SECURITY_HEADERS {
        headers.insert(
            HeaderName::from_static(name),
            HeaderValue::from_static(value),
        );
    }
    response
}

/// `Cache-Control` for `/static`: one week in production, revalidate in
/// debug so edited assets show up immediately.
pub fn static_cache_layer(debug: bool) -> SetResponseHeaderLayer<HeaderValue> {
    let value = if debug {
        HeaderValue::from_static("no-cache")
    } else {
        HeaderValue::from_static("public, max-age=604800")
    };
    SetResponseHeaderLayer::overriding(header::CACHE_CONTROL, value)
}
