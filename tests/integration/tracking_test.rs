//! Integration tests for public tracking, surveys and health.

use std::time::Duration;

use axum::http::StatusCode;

use bikeshop_entity::ad::{Ad, AdInput, MediaType};
use bikeshop_entity::ticket::TicketStatus;
use bikeshop_entity::user::Role;
use bikeshop_service::RequestContext;

use crate::helpers::TestApp;

/// Tracking code of a fresh ticket, plus the app and the ticket id.
async fn tracked_ticket() -> (TestApp, i64, String) {
    let app = TestApp::new().await;
    let customer = app.create_user("carla", Role::Customer).await;
    let technician = app.create_user("tomas", Role::Technician).await;
    let booking = app.book(&customer).await;
    let ticket = app.open_ticket(&technician, &booking).await;
    (app, ticket.id, ticket.tracking_code)
}

async fn force_status(app: &TestApp, ticket_id: i64, status: TicketStatus) {
    let admin = app.create_user("ana", Role::Admin).await;
    let admin = RequestContext::new(admin.id, admin.email, admin.role);
    app.state
        .ticket_service
        .update_status(&admin, ticket_id, status, "")
        .await
        .unwrap();
}

#[tokio::test]
async fn test_tracking_page_is_public() {
    let (app, _, code) = tracked_ticket().await;

    let response = app.get(&format!("/tracking/{code}"), None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains(&code));
}

#[tokio::test]
async fn test_tracking_code_is_case_insensitive() {
    let (app, _, code) = tracked_ticket().await;

    let response = app
        .get(&format!("/tracking/{}", code.to_uppercase()), None)
        .await;

    assert_eq!(response.status, StatusCode::OK);
}

#[tokio::test]
async fn test_unknown_tracking_code_is_not_found() {
    let app = TestApp::new().await;

    let response = app.get("/tracking/deadbeef", None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert!(response.body.contains("deadbeef"));
}

#[tokio::test]
async fn test_tracking_form_redirects_to_code() {
    let app = TestApp::new().await;

    let response = app.get("/tracking?code=%20AB12CD34%20", None).await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/tracking/ab12cd34"));
}

#[tokio::test]
async fn test_survey_accepted_once_ticket_is_ready() {
    let (app, ticket_id, code) = tracked_ticket().await;
    let path = format!("/tracking/{code}/survey");

    let response = app
        .post_form(&path, &[("rating", "5"), ("feedback", "Great")], None)
        .await;
    assert_eq!(response.status, StatusCode::BAD_REQUEST);

    force_status(&app, ticket_id, TicketStatus::Ready).await;
    let response = app
        .post_form(&path, &[("rating", "5"), ("feedback", "Great")], None)
        .await;
    assert_eq!(
        response.location(),
        Some(format!("/tracking/{code}?survey=1").as_str())
    );

    let response = app
        .post_form(&path, &[("rating", "1"), ("feedback", "Changed my mind")], None)
        .await;
    assert_eq!(
        response.location(),
        Some(format!("/tracking/{code}").as_str())
    );

    let survey = app
        .state
        .survey_service
        .for_ticket(ticket_id)
        .await
        .unwrap()
        .expect("survey stored");
    assert_eq!(survey.rating, 5);
}

#[tokio::test]
async fn test_survey_rejects_out_of_range_rating() {
    let (app, ticket_id, code) = tracked_ticket().await;
    force_status(&app, ticket_id, TicketStatus::Delivered).await;

    let response = app
        .post_form(&format!("/tracking/{code}/survey"), &[("rating", "9")], None)
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_health_reports_healthy() {
    let app = TestApp::new().await;

    let response = app.get("/health", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["status"], "healthy");
}

#[tokio::test]
async fn test_detailed_health_checks_database() {
    let app = TestApp::new().await;

    let response = app.get("/health/detailed", None).await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["status"], "healthy");
    assert_eq!(body["database"], "connected");
}

#[tokio::test]
async fn test_responses_carry_security_headers() {
    let app = TestApp::new().await;

    let response = app.get("/", None).await;

    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.headers["x-content-type-options"], "nosniff");
    assert_eq!(response.headers["x-frame-options"], "DENY");
    assert!(response.headers.contains_key("content-security-policy"));
}

#[tokio::test]
async fn test_unknown_route_is_not_found() {
    let app = TestApp::new().await;

    let response = app.get("/no/such/page", None).await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
}

async fn create_ad(app: &TestApp, link_url: &str) -> Ad {
    app.state
        .ad_service
        .create(AdInput {
            title: "Spring sale".to_string(),
            media_url: "https://cdn.test/spring.png".to_string(),
            media_type: MediaType::Image,
            link_url: link_url.to_string(),
            active: true,
        })
        .await
        .unwrap()
}

/// Counters are bumped by a spawned task; give it a few turns to land.
async fn wait_for_ad(app: &TestApp, id: i64, done: impl Fn(&Ad) -> bool) -> Ad {
    for _ in 0..50 {
        let ad = app.state.ad_service.get(id).await.unwrap();
        if done(&ad) {
            return ad;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }
    app.state.ad_service.get(id).await.unwrap()
}

#[tokio::test]
async fn test_ad_click_redirects_and_counts() {
    let app = TestApp::new().await;
    let ad = create_ad(&app, "https://shop.test/sale").await;

    let response = app.get(&format!("/ads/{}/click", ad.id), None).await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("https://shop.test/sale"));
    let ad = wait_for_ad(&app, ad.id, |a| a.clicks > 0).await;
    assert_eq!(ad.clicks, 1);
}

#[tokio::test]
async fn test_ad_click_without_link_goes_home() {
    let app = TestApp::new().await;
    let ad = create_ad(&app, "").await;

    let response = app.get(&format!("/ads/{}/click", ad.id), None).await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(response.location(), Some("/"));
}

#[tokio::test]
async fn test_tracking_view_counts_ad_impression() {
    let (app, _, code) = tracked_ticket().await;
    let ad = create_ad(&app, "https://shop.test/sale").await;
    assert_eq!(ad.impressions, 0);

    let response = app.get(&format!("/tracking/{code}"), None).await;
    assert_eq!(response.status, StatusCode::OK);
    assert!(response.body.contains(&format!("/ads/{}/click", ad.id)));

    let ad = wait_for_ad(&app, ad.id, |a| a.impressions > 0).await;
    assert_eq!(ad.impressions, 1);
    assert_eq!(ad.clicks, 0);
}
