//! Maps domain `AppError` to HTTP responses.
//!
//! Page routes answer with [`HttpError`] (an HTML error page, or a trip back
//! to the login form when the session is gone). JSON routes answer with
//! [`ApiError`].

use axum::Json;
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::cookie::CookieJar;
use serde::{Deserialize, Serialize};

use bikeshop_core::error::{AppError, ErrorKind};

use crate::extractors::auth::removal_cookie;
use crate::render::error_document;

/// Standard API error response body.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ApiErrorResponse {
    /// Machine-readable error code.
    pub error: String,
    /// Human-readable message.
    pub message: String,
    /// Optional details.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<serde_json::Value>,
}

/// Error returned by page handlers.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct HttpError(#[from] pub AppError);

/// Error returned by the JSON endpoints.
#[derive(Debug, thiserror::Error)]
#[error(transparent)]
pub struct ApiError(#[from] pub AppError);

pub type HttpResult<T> = Result<T, HttpError>;
pub type ApiResult<T> = Result<T, ApiError>;

/// Status code and machine-readable code for an error kind.
///
/// Anything that is not the caller's fault is logged and reported as 500.
fn classify(err: &AppError) -> (StatusCode, &'static str) {
    match err.kind {
        ErrorKind::NotFound => (StatusCode::NOT_FOUND, "NOT_FOUND"),
        ErrorKind::Authentication => (StatusCode::UNAUTHORIZED, "UNAUTHORIZED"),
        ErrorKind::Authorization => (StatusCode::FORBIDDEN, "FORBIDDEN"),
        ErrorKind::Validation => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR"),
        ErrorKind::InvalidTransition => (StatusCode::BAD_REQUEST, "INVALID_TRANSITION"),
        ErrorKind::Conflict => (StatusCode::CONFLICT, "CONFLICT"),
        ErrorKind::Database
        | ErrorKind::Rendering
        | ErrorKind::Configuration
        | ErrorKind::Internal => {
            tracing::error!(kind = %err.kind, error = %err.message, "Request failed");
            (StatusCode::INTERNAL_SERVER_ERROR, "INTERNAL_ERROR")
        }
    }
}

/// Message safe to show to the caller.
fn public_message(status: StatusCode, err: &AppError) -> String {
    if status.is_server_error() {
        "Something went wrong. Please try again later.".to_string()
    } else {
        err.message.clone()
    }
}

impl IntoResponse for HttpError {
    fn into_response(self) -> Response {
        if self.0.is(ErrorKind::Authentication) {
            let jar = CookieJar::new().add(removal_cookie());
            return (jar, Redirect::to("/login")).into_response();
        }
        let (status, _) = classify(&self.0);
        let message = public_message(status, &self.0);
        (status, Html(error_document(status, &message))).into_response()
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, code) = classify(&self.0);
        let body = ApiErrorResponse {
            error: code.to_string(),
            message: public_message(status, &self.0),
            details: None,
        };
        (status, Json(body)).into_response()
    }
}

#[cfg(test)]
mod tests {
    use axum::http::header;

    use super::*;

    #[test]
    fn test_page_errors_map_to_status_codes() {
        let cases = [
            (AppError::not_found("x"), StatusCode::NOT_FOUND),
            (AppError::authorization("x"), StatusCode::FORBIDDEN),
            (AppError::validation("x"), StatusCode::BAD_REQUEST),
            (AppError::invalid_transition("x"), StatusCode::BAD_REQUEST),
            (AppError::conflict("x"), StatusCode::CONFLICT),
            (AppError::database("x"), StatusCode::INTERNAL_SERVER_ERROR),
        ];
        for (err, status) in cases {
            assert_eq!(HttpError(err).into_response().status(), status);
        }
    }

    #[test]
    fn test_authentication_redirects_and_clears_cookie() {
        let response = HttpError(AppError::authentication("expired")).into_response();
        assert_eq!(response.status(), StatusCode::SEE_OTHER);
        assert_eq!(response.headers()[header::LOCATION], "/login");
        let cookie = response.headers()[header::SET_COOKIE].to_str().unwrap();
        assert!(cookie.starts_with("auth_token="));
    }

    #[test]
    fn test_api_error_hides_internal_messages() {
        let response = ApiError(AppError::database("disk I/O error at page 7")).into_response();
        assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }
}
