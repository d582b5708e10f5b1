//! Shared test helpers for integration tests.

use axum::Router;
use axum::body::Body;
use axum::http::{HeaderMap, Request, StatusCode, header};
use serde_json::Value;
use tower::ServiceExt;

use bikeshop_api::{AppState, build_app, build_state};
use bikeshop_auth::JwtEncoder;
use bikeshop_core::config::AppConfig;
use bikeshop_database::DatabasePool;
use bikeshop_database::migration::run_migrations;
use bikeshop_entity::booking::Booking;
use bikeshop_entity::ticket::Ticket;
use bikeshop_entity::user::{Role, User};
use bikeshop_service::{BookingRequest, RequestContext, UserForm};

/// Password given to every user created by [`TestApp::create_user`].
pub const PASSWORD: &str = "password123";

/// Test application context
pub struct TestApp {
    /// The Axum router for making test requests
    pub router: Router,
    /// State shared with the router, for setting up data directly
    pub state: AppState,
    encoder: JwtEncoder,
}

/// Configuration for an in-memory database.
pub fn test_config() -> AppConfig {
    let mut config = AppConfig::default();
    config.debug = true;
    config.database.path = ":memory:".to_string();
    config.auth.jwt_secret = "integration-test-secret".to_string();
    config
}

impl TestApp {
    /// Create a new test application over a fresh in-memory database
    pub async fn new() -> Self {
        Self::with_config(test_config()).await
    }

    pub async fn with_config(config: AppConfig) -> Self {
        let db = DatabasePool::connect(&config.database)
            .await
            .expect("Failed to open test database");
        run_migrations(db.pool())
            .await
            .expect("Failed to run migrations");

        let encoder = JwtEncoder::new(&config);
        let state = build_state(config, db.into_pool());
        let router = build_app(state.clone());

        Self {
            router,
            state,
            encoder,
        }
    }

    /// Create a user with [`PASSWORD`] and an email derived from `name`.
    pub async fn create_user(&self, name: &str, role: Role) -> User {
        let setup = RequestContext::new(0, "setup@test.local", Role::Admin);
        self.state
            .admin_user_service
            .create(
                &setup,
                UserForm {
                    name: name.to_string(),
                    email: format!("{name}@test.local"),
                    phone: String::new(),
                    role,
                    password: PASSWORD.to_string(),
                },
            )
            .await
            .expect("Failed to create test user")
    }

    /// A valid session token for `user`.
    pub fn token_for(&self, user: &User) -> String {
        self.encoder
            .issue(user.id, &user.email, user.role)
            .expect("Failed to issue token")
            .token
    }

    /// A pending booking for tomorrow at 10:00.
    pub async fn book(&self, customer: &User) -> Booking {
        let ctx = RequestContext::new(customer.id, customer.email.clone(), customer.role);
        let date = (chrono::Utc::now() + chrono::Duration::days(1))
            .format("%Y-%m-%d")
            .to_string();
        self.state
            .booking_service
            .create(
                &ctx,
                BookingRequest {
                    date,
                    time: "10:00".to_string(),
                    notes: "Brakes squeak".to_string(),
                    ..Default::default()
                },
            )
            .await
            .expect("Failed to create booking")
    }

    /// Open a ticket for `booking` assigned to `technician`, through the
    /// workshop route.
    pub async fn open_ticket(&self, technician: &User, booking: &Booking) -> Ticket {
        let token = self.token_for(technician);
        let response = self
            .post_form(&format!("/bookings/{}/ticket", booking.id), &[], Some(&token))
            .await;
        assert_eq!(response.status, StatusCode::SEE_OTHER, "{}", response.body);
        let id = response
            .location()
            .and_then(|l| l.strip_prefix("/tickets/"))
            .and_then(|l| l.split('?').next())
            .and_then(|id| id.parse::<i64>().ok())
            .expect("Redirect should point at the new ticket");
        self.state
            .ticket_service
            .get(id)
            .await
            .expect("Ticket should exist")
    }

    pub async fn get(&self, path: &str, token: Option<&str>) -> TestResponse {
        let req = Request::builder().method("GET").uri(path);
        self.send(req, Body::empty(), token).await
    }

    pub async fn post_form(
        &self,
        path: &str,
        fields: &[(&str, &str)],
        token: Option<&str>,
    ) -> TestResponse {
        let body = fields
            .iter()
            .map(|(k, v)| format!("{}={}", form_encode(k), form_encode(v)))
            .collect::<Vec<_>>()
            .join("&");
        let req = Request::builder()
            .method("POST")
            .uri(path)
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded");
        self.send(req, Body::from(body), token).await
    }

    /// Send a request carrying `token` in the session cookie.
    pub async fn send(
        &self,
        mut req: axum::http::request::Builder,
        body: Body,
        token: Option<&str>,
    ) -> TestResponse {
        if let Some(token) = token {
            req = req.header(header::COOKIE, format!("auth_token={token}"));
        }
        let req = req.body(body).expect("Failed to build request");

        let response = self
            .router
            .clone()
            .oneshot(req)
            .await
            .expect("Failed to send request");

        let status = response.status();
        let headers = response.headers().clone();
        let body_bytes = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .expect("Failed to read body");

        TestResponse {
            status,
            headers,
            body: String::from_utf8_lossy(&body_bytes).into_owned(),
        }
    }
}

fn form_encode(value: &str) -> String {
    value
        .bytes()
        .map(|b| match b {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'*' => {
                (b as char).to_string()
            }
            b' ' => "+".to_string(),
            _ => format!("%{b:02X}"),
        })
        .collect()
}

/// Response from a test request
#[derive(Debug)]
pub struct TestResponse {
    /// HTTP status code
    pub status: StatusCode,
    pub headers: HeaderMap,
    /// Raw body text
    pub body: String,
}

impl TestResponse {
    pub fn location(&self) -> Option<&str> {
        self.headers
            .get(header::LOCATION)
            .and_then(|v| v.to_str().ok())
    }

    pub fn json(&self) -> Value {
        serde_json::from_str(&self.body).expect("Body should be JSON")
    }

    /// All `Set-Cookie` values.
    pub fn cookies(&self) -> Vec<&str> {
        self.headers
            .get_all(header::SET_COOKIE)
            .iter()
            .filter_map(|v| v.to_str().ok())
            .collect()
    }
}
