//! Session cookie helpers and the `AuthUser` / `CurrentUser` extractors.

use axum::extract::FromRequestParts;
use axum::http::HeaderMap;
use axum::http::header::AUTHORIZATION;
use axum::http::request::Parts;
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use bikeshop_auth::IssuedToken;
use bikeshop_core::error::AppError;
use bikeshop_service::context::RequestContext;

use crate::error::HttpError;
use crate::state::AppState;

/// Name of the cookie carrying the session token.
pub const AUTH_COOKIE: &str = "auth_token";

/// Session cookie for a freshly issued token. `Secure` is dropped in debug
/// mode so the cookie works over plain HTTP.
pub fn session_cookie(issued: &IssuedToken, debug: bool) -> Cookie<'static> {
    Cookie::build((AUTH_COOKIE, issued.token.clone()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .secure(!debug)
        .max_age(time::Duration::seconds(issued.max_age_seconds))
        .build()
}

/// An already expired session cookie. Added to a jar, it clears the
/// browser's copy whether or not the request carried one.
pub fn removal_cookie() -> Cookie<'static> {
    let mut cookie = Cookie::build((AUTH_COOKIE, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Strict)
        .build();
    cookie.make_removal();
    cookie
}

/// The session token, from the cookie or else an `Authorization: Bearer`
/// header.
pub fn session_token(jar: &CookieJar, headers: &HeaderMap) -> Option<String> {
    if let Some(cookie) = jar.get(AUTH_COOKIE).filter(|c| !c.value().is_empty()) {
        return Some(cookie.value().to_string());
    }
    headers
        .get(AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
}

/// Authenticated user placed in the request extensions by the auth
/// middleware.
#[derive(Debug, Clone)]
pub struct AuthUser(pub RequestContext);

impl AuthUser {
    /// Returns the inner `RequestContext`.
    pub fn context(&self) -> &RequestContext {
        &self.0
    }
}

impl std::ops::Deref for AuthUser {
    type Target = RequestContext;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl<S: Send + Sync> FromRequestParts<S> for AuthUser {
    type Rejection = HttpError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        parts
            .extensions
            .get::<RequestContext>()
            .cloned()
            .map(AuthUser)
            .ok_or_else(|| HttpError(AppError::authentication("Not signed in")))
    }
}

/// The signed-in user on public pages, if any. Never rejects.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub Option<RequestContext>);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = std::convert::Infallible;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        if let Some(ctx) = parts.extensions.get::<RequestContext>() {
            return Ok(CurrentUser(Some(ctx.clone())));
        }
        let jar = CookieJar::from_headers(&parts.headers);
        let ctx = session_token(&jar, &parts.headers)
            .and_then(|token| state.jwt_decoder.decode(&token).ok())
            .map(|claims| RequestContext::from_claims(&claims));
        Ok(CurrentUser(ctx))
    }
}

#[cfg(test)]
mod tests {
    use axum::http::HeaderValue;
    use axum::http::header::COOKIE;
    use chrono::Utc;

    use super::*;

    #[test]
    fn test_cookie_wins_over_bearer() {
        let mut headers = HeaderMap::new();
        headers.insert(COOKIE, HeaderValue::from_static("auth_token=from-cookie"));
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer from-header"));
        let jar = CookieJar::from_headers(&headers);
        assert_eq!(session_token(&jar, &headers).as_deref(), Some("from-cookie"));
    }

    #[test]
    fn test_bearer_fallback() {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_static("Bearer abc.def"));
        let jar = CookieJar::from_headers(&headers);
        assert_eq!(session_token(&jar, &headers).as_deref(), Some("abc.def"));

        let empty = HeaderMap::new();
        assert!(session_token(&CookieJar::from_headers(&empty), &empty).is_none());
    }

    #[test]
    fn test_session_cookie_attributes() {
        let issued = IssuedToken {
            token: "t".to_string(),
            expires_at: Utc::now(),
            max_age_seconds: 86400,
        };
        let cookie = session_cookie(&issued, false).to_string();
        assert!(cookie.contains("HttpOnly"));
        assert!(cookie.contains("SameSite=Strict"));
        assert!(cookie.contains("Secure"));
        assert!(cookie.contains("Path=/"));
        assert!(cookie.contains("Max-Age=86400"));

        let debug_cookie = session_cookie(&issued, true).to_string();
        assert!(!debug_cookie.contains("Secure"));
    }

    #[test]
    fn test_removal_cookie_expires_immediately() {
        let cookie = removal_cookie().to_string();
        assert!(cookie.starts_with("auth_token=;"));
        assert!(cookie.contains("Max-Age=0"));
        assert!(cookie.contains("Path=/"));
    }
}
