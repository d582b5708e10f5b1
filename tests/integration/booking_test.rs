//! Integration tests for customer bookings and the slot API.

use axum::http::StatusCode;

use bikeshop_entity::booking::BookingStatus;
use bikeshop_entity::user::Role;

use crate::helpers::TestApp;

fn tomorrow() -> String {
    (chrono::Utc::now() + chrono::Duration::days(1))
        .format("%Y-%m-%d")
        .to_string()
}

#[tokio::test]
async fn test_customer_books_and_sees_booking() {
    let app = TestApp::new().await;
    let customer = app.create_user("carla", Role::Customer).await;
    let token = app.token_for(&customer);
    let date = tomorrow();

    let response = app
        .post_form(
            "/bookings",
            &[
                ("date", date.as_str()),
                ("time", "11:00"),
                ("notes", "Gears slipping"),
            ],
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER, "{}", response.body);
    let location = response.location().expect("redirect").to_string();
    assert!(location.ends_with("?created=1"), "{location}");

    let detail = app.get(&location, Some(&token)).await;
    assert_eq!(detail.status, StatusCode::OK);
    assert!(detail.body.contains("Gears slipping"));
}

#[tokio::test]
async fn test_invalid_booking_date_is_rejected() {
    let app = TestApp::new().await;
    let customer = app.create_user("carla", Role::Customer).await;
    let token = app.token_for(&customer);

    let response = app
        .post_form(
            "/bookings",
            &[("date", "someday"), ("time", "11:00")],
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_other_customer_cannot_view_booking() {
    let app = TestApp::new().await;
    let owner = app.create_user("carla", Role::Customer).await;
    let stranger = app.create_user("pablo", Role::Customer).await;
    let booking = app.book(&owner).await;

    let token = app.token_for(&stranger);
    let response = app
        .get(&format!("/bookings/{}", booking.id), Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app
        .post_form(&format!("/bookings/{}/cancel", booking.id), &[], Some(&token))
        .await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);
    let booking = app.state.booking_service.get(booking.id).await.unwrap();
    assert_eq!(booking.status, BookingStatus::Pending);
}

#[tokio::test]
async fn test_owner_cancels_booking() {
    let app = TestApp::new().await;
    let owner = app.create_user("carla", Role::Customer).await;
    let booking = app.book(&owner).await;
    let token = app.token_for(&owner);

    let response = app
        .post_form(&format!("/bookings/{}/cancel", booking.id), &[], Some(&token))
        .await;

    assert_eq!(response.location(), Some("/bookings?cancelled=1"));
    let booking = app.state.booking_service.get(booking.id).await.unwrap();
    assert_eq!(booking.status, BookingStatus::Cancelled);
}

#[tokio::test]
async fn test_slots_exclude_taken_times() {
    let app = TestApp::new().await;
    let customer = app.create_user("carla", Role::Customer).await;
    app.book(&customer).await;
    let token = app.token_for(&customer);
    let date = tomorrow();

    let response = app
        .get(&format!("/api/slots?date={date}"), Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::OK);
    let body = response.json();
    assert_eq!(body["date"], date.as_str());
    let slots: Vec<&str> = body["slots"]
        .as_array()
        .expect("slots array")
        .iter()
        .filter_map(|s| s.as_str())
        .collect();
    assert!(!slots.contains(&"10:00"));
    assert!(slots.contains(&"09:00"));
}

#[tokio::test]
async fn test_slots_with_bad_date_is_bad_request() {
    let app = TestApp::new().await;
    let customer = app.create_user("carla", Role::Customer).await;
    let token = app.token_for(&customer);

    let response = app.get("/api/slots?date=31-12-2030", Some(&token)).await;

    assert_eq!(response.status, StatusCode::BAD_REQUEST);
    assert!(response.json().get("error").is_some());
}
