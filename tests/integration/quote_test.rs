//! Integration tests for quotes: drafting, customer decisions and
//! approval from the tracking page.

use axum::http::StatusCode;

use bikeshop_entity::quote::{Quote, QuoteStatus};
use bikeshop_entity::ticket::Ticket;
use bikeshop_entity::user::{Role, User};

use crate::helpers::TestApp;

struct Quoted {
    app: TestApp,
    customer: User,
    ticket: Ticket,
    quote: Quote,
}

/// A ticket with a pending two-line quote drafted by its technician.
async fn quoted_ticket() -> Quoted {
    let app = TestApp::new().await;
    let customer = app.create_user("carla", Role::Customer).await;
    let technician = app.create_user("tomas", Role::Technician).await;
    let booking = app.book(&customer).await;
    let ticket = app.open_ticket(&technician, &booking).await;
    let token = app.token_for(&technician);

    let ticket_id = ticket.id.to_string();
    let response = app
        .post_form(
            &format!("/quotes/new/{}", booking.id),
            &[
                ("ticket_id", ticket_id.as_str()),
                ("item_description", "Brake pads"),
                ("item_quantity", "2"),
                ("item_price", "12.50"),
                ("item_description", "Labour"),
                ("item_quantity", "1"),
                ("item_price", "30"),
                ("item_description", ""),
                ("item_quantity", ""),
                ("item_price", ""),
            ],
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER, "{}", response.body);
    assert_eq!(
        response.location(),
        Some(format!("/tickets/{}?quote_created=1", ticket.id).as_str())
    );

    let quote = app
        .state
        .quote_service
        .latest_for_booking(booking.id)
        .await
        .unwrap()
        .expect("quote should exist");

    Quoted {
        app,
        customer,
        ticket,
        quote,
    }
}

async fn reload(app: &TestApp, id: i64) -> Quote {
    app.state.quote_service.get(id).await.unwrap()
}

#[tokio::test]
async fn test_create_quote_sums_items() {
    let Quoted { quote, .. } = quoted_ticket().await;

    assert_eq!(quote.status, QuoteStatus::Pending);
    assert_eq!(quote.items.0.len(), 2);
    assert!((quote.total - 55.0).abs() < 1e-9);
    assert!(quote.valid_until > quote.created_at);
}

#[tokio::test]
async fn test_customer_approves_quote() {
    let Quoted {
        app,
        customer,
        quote,
        ..
    } = quoted_ticket().await;
    let token = app.token_for(&customer);

    let response = app
        .post_form(&format!("/quotes/{}/approve", quote.id), &[], Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(
        response.location(),
        Some(format!("/quotes/{}?quote_approved=1", quote.id).as_str())
    );
    assert_eq!(reload(&app, quote.id).await.status, QuoteStatus::Approved);
}

#[tokio::test]
async fn test_customer_rejects_quote_with_reason() {
    let Quoted {
        app,
        customer,
        quote,
        ..
    } = quoted_ticket().await;
    let token = app.token_for(&customer);

    let response = app
        .post_form(
            &format!("/quotes/{}/reject", quote.id),
            &[("reason", "  Too expensive  ")],
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    let quote = reload(&app, quote.id).await;
    assert_eq!(quote.status, QuoteStatus::Rejected);
    assert_eq!(quote.rejection_reason, "Too expensive");

    let page = app.get(&format!("/quotes/{}", quote.id), Some(&token)).await;
    assert_eq!(page.status, StatusCode::OK);
    assert!(page.body.contains("Too expensive"));
}

#[tokio::test]
async fn test_tracking_code_approves_quote_without_login() {
    let Quoted {
        app, ticket, quote, ..
    } = quoted_ticket().await;

    let code = ticket.tracking_code.to_uppercase();
    let response = app
        .post_form(
            &format!("/tracking/quote/{}/approve", quote.id),
            &[("tracking_code", code.as_str())],
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(
        response.location(),
        Some(format!("/tracking/{}?quote_approved=1", ticket.tracking_code).as_str())
    );
    assert_eq!(reload(&app, quote.id).await.status, QuoteStatus::Approved);
}

#[tokio::test]
async fn test_wrong_tracking_code_leaves_quote_pending() {
    let Quoted { app, quote, .. } = quoted_ticket().await;

    let response = app
        .post_form(
            &format!("/tracking/quote/{}/approve", quote.id),
            &[("tracking_code", "00000000")],
            None,
        )
        .await;

    assert_eq!(response.status, StatusCode::NOT_FOUND);
    assert_eq!(reload(&app, quote.id).await.status, QuoteStatus::Pending);
}

#[tokio::test]
async fn test_only_pending_quotes_can_be_decided() {
    let Quoted {
        app,
        customer,
        quote,
        ..
    } = quoted_ticket().await;
    let token = app.token_for(&customer);

    app.post_form(&format!("/quotes/{}/approve", quote.id), &[], Some(&token))
        .await;

    let response = app
        .post_form(
            &format!("/quotes/{}/reject", quote.id),
            &[("reason", "Changed my mind")],
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::CONFLICT);
    let quote = reload(&app, quote.id).await;
    assert_eq!(quote.status, QuoteStatus::Approved);
    assert!(quote.rejection_reason.is_empty());
}

#[tokio::test]
async fn test_other_customer_cannot_decide_quote() {
    let Quoted { app, quote, .. } = quoted_ticket().await;
    let stranger = app.create_user("otra", Role::Customer).await;
    let token = app.token_for(&stranger);

    let response = app
        .post_form(&format!("/quotes/{}/approve", quote.id), &[], Some(&token))
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(reload(&app, quote.id).await.status, QuoteStatus::Pending);
}
