//! Integration tests for role-gated areas.

use axum::http::StatusCode;

use bikeshop_entity::user::Role;

use crate::helpers::TestApp;

#[tokio::test]
async fn test_workshop_requires_staff() {
    let app = TestApp::new().await;
    let customer = app.create_user("carla", Role::Customer).await;
    let technician = app.create_user("tomas", Role::Technician).await;
    let admin = app.create_user("ana", Role::Admin).await;

    for path in ["/workshop", "/tickets", "/tickets/new"] {
        let response = app.get(path, Some(&app.token_for(&customer))).await;
        assert_eq!(response.status, StatusCode::FORBIDDEN, "customer on {path}");

        let response = app.get(path, Some(&app.token_for(&technician))).await;
        assert_eq!(response.status, StatusCode::OK, "technician on {path}");

        let response = app.get(path, Some(&app.token_for(&admin))).await;
        assert_eq!(response.status, StatusCode::OK, "admin on {path}");
    }
}

#[tokio::test]
async fn test_admin_area_requires_admin() {
    let app = TestApp::new().await;
    let customer = app.create_user("carla", Role::Customer).await;
    let technician = app.create_user("tomas", Role::Technician).await;
    let admin = app.create_user("ana", Role::Admin).await;

    for path in [
        "/admin",
        "/admin/users",
        "/admin/brands",
        "/admin/services",
        "/admin/tickets",
        "/admin/reports",
        "/admin/settings",
    ] {
        let response = app.get(path, Some(&app.token_for(&customer))).await;
        assert_eq!(response.status, StatusCode::FORBIDDEN, "customer on {path}");

        let response = app.get(path, Some(&app.token_for(&technician))).await;
        assert_eq!(response.status, StatusCode::FORBIDDEN, "technician on {path}");

        let response = app.get(path, Some(&app.token_for(&admin))).await;
        assert_eq!(response.status, StatusCode::OK, "admin on {path}");
    }
}

#[tokio::test]
async fn test_forbidden_post_does_not_mutate() {
    let app = TestApp::new().await;
    let customer = app.create_user("carla", Role::Customer).await;
    let token = app.token_for(&customer);

    let response = app
        .post_form(
            "/admin/users/new",
            &[
                ("name", "Mallory"),
                ("email", "mallory@test.local"),
                ("role", "admin"),
                ("password", "secret123"),
            ],
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    let response = app
        .post_form(
            "/login",
            &[("email", "mallory@test.local"), ("password", "secret123")],
            None,
        )
        .await;
    assert_eq!(response.status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_gated_area_without_session_redirects_to_login() {
    let app = TestApp::new().await;

    for path in ["/workshop", "/admin", "/api/slots?date=2030-01-01"] {
        let response = app.get(path, None).await;
        assert_eq!(response.status, StatusCode::SEE_OTHER, "{path}");
        assert_eq!(response.location(), Some("/login"), "{path}");
    }
}

#[tokio::test]
async fn test_admin_creates_technician() {
    let app = TestApp::new().await;
    let admin = app.create_user("ana", Role::Admin).await;
    let token = app.token_for(&admin);

    let response = app
        .post_form(
            "/admin/users/new",
            &[
                ("name", "Teo"),
                ("email", "teo@test.local"),
                ("phone", ""),
                ("role", "technician"),
                ("password", "secret123"),
            ],
            Some(&token),
        )
        .await;
    assert_eq!(response.location(), Some("/admin/users?created=1"));

    let response = app
        .post_form(
            "/login",
            &[("email", "teo@test.local"), ("password", "secret123")],
            None,
        )
        .await;
    assert_eq!(response.location(), Some("/workshop"));
}
