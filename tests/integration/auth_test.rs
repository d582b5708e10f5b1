//! Integration tests for sign in, sessions and sign out.

use axum::body::Body;
use axum::http::{Request, StatusCode, header};

use bikeshop_entity::user::Role;

use crate::helpers::{PASSWORD, TestApp};

#[tokio::test]
async fn test_login_success_sets_cookie_and_redirects_home() {
    let app = TestApp::new().await;
    app.create_user("carla", Role::Customer).await;

    let response = app
        .post_form(
            "/login",
            &[("email", "carla@test.local"), ("password", PASSWORD)],
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/dashboard"));
    let cookie = response
        .cookies()
        .into_iter()
        .find(|c| c.starts_with("auth_token="))
        .expect("session cookie");
    assert!(cookie.contains("HttpOnly"));
    assert!(cookie.contains("SameSite=Strict"));
    assert!(cookie.contains("Max-Age=86400"));
}

#[tokio::test]
async fn test_technician_lands_in_workshop() {
    let app = TestApp::new().await;
    app.create_user("tomas", Role::Technician).await;

    let response = app
        .post_form(
            "/login",
            &[("email", "tomas@test.local"), ("password", PASSWORD)],
            None,
        )
        .await;

    assert_eq!(response.location(), Some("/workshop"));
}

#[tokio::test]
async fn test_login_invalid_password() {
    let app = TestApp::new().await;
    app.create_user("carla", Role::Customer).await;

    let response = app
        .post_form(
            "/login",
            &[("email", "carla@test.local"), ("password", "wrongpassword")],
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
    assert!(response.cookies().is_empty());
    assert!(response.body.contains("carla@test.local"));
}

#[tokio::test]
async fn test_login_nonexistent_user() {
    let app = TestApp::new().await;

    let response = app
        .post_form(
            "/login",
            &[("email", "nobody@test.local"), ("password", PASSWORD)],
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_protected_page_without_token_redirects_to_login() {
    let app = TestApp::new().await;

    let response = app.get("/dashboard", None).await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/login"));
}

#[tokio::test]
async fn test_invalid_token_redirects_and_clears_cookie() {
    let app = TestApp::new().await;

    let response = app.get("/dashboard", Some("not-a-token")).await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/login"));
    assert!(response.cookies().iter().any(|c| c.starts_with("auth_token=")));
}

#[tokio::test]
async fn test_bearer_header_is_accepted() {
    let app = TestApp::new().await;
    let user = app.create_user("carla", Role::Customer).await;
    let token = app.token_for(&user);

    let req = Request::builder()
        .method("GET")
        .uri("/dashboard")
        .header(header::AUTHORIZATION, format!("Bearer {token}"));
    let response = app.send(req, Body::empty(), None).await;

    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_register_then_login() {
    let app = TestApp::new().await;

    let response = app
        .post_form(
            "/register",
            &[
                ("name", "Nuria"),
                ("email", "nuria@test.local"),
                ("phone", "600000000"),
                ("password", "secret123"),
                ("confirm_password", "secret123"),
            ],
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/login?registered=1"));

    let response = app
        .post_form(
            "/login",
            &[("email", "nuria@test.local"), ("password", "secret123")],
            None,
        )
        .await;
    assert_eq!(response.location(), Some("/dashboard"));
}

#[tokio::test]
async fn test_register_duplicate_email_conflicts() {
    let app = TestApp::new().await;
    app.create_user("carla", Role::Customer).await;

    let response = app
        .post_form(
            "/register",
            &[
                ("name", "Carla"),
                ("email", "carla@test.local"),
                ("password", "secret123"),
                ("confirm_password", "secret123"),
            ],
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
}

#[tokio::test]
async fn test_logout_expires_cookie() {
    let app = TestApp::new().await;
    let user = app.create_user("carla", Role::Customer).await;
    let token = app.token_for(&user);

    let response = app.post_form("/logout", &[], Some(&token)).await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/"));
    let cookie = response
        .cookies()
        .into_iter()
        .find(|c| c.starts_with("auth_token="))
        .expect("removal cookie");
    assert!(cookie.contains("Max-Age=0"));
}
