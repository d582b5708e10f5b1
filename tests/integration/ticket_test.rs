//! Integration tests for workshop tickets and the status machine.

use axum::body::Body;
use axum::http::{Request, StatusCode};

use bikeshop_entity::booking::BookingStatus;
use bikeshop_entity::ticket::TicketStatus;
use bikeshop_entity::user::{Role, User};

use crate::helpers::TestApp;

struct Workshop {
    app: TestApp,
    technician: User,
    ticket_id: i64,
}

/// A ticket assigned to a technician, moved to `status`.
async fn ticket_in(status: TicketStatus) -> Workshop {
    let app = TestApp::new().await;
    let customer = app.create_user("carla", Role::Customer).await;
    let technician = app.create_user("tomas", Role::Technician).await;
    let booking = app.book(&customer).await;
    let ticket = app.open_ticket(&technician, &booking).await;

    if status != TicketStatus::Received {
        let admin = app.create_user("ana", Role::Admin).await;
        let token = app.token_for(&admin);
        let response = app
            .post_form(
                &format!("/tickets/{}/status", ticket.id),
                &[("status", status.as_str()), ("notes", "")],
                Some(&token),
            )
            .await;
        assert_eq!(response.status, StatusCode::SEE_OTHER);
    }

    Workshop {
        app,
        technician,
        ticket_id: ticket.id,
    }
}

async fn history_len(app: &TestApp, ticket_id: i64) -> usize {
    app.state.ticket_service.history(ticket_id).await.unwrap().len()
}

async fn status_of(app: &TestApp, ticket_id: i64) -> TicketStatus {
    app.state.ticket_service.get(ticket_id).await.unwrap().status
}

#[tokio::test]
async fn test_opening_ticket_confirms_booking() {
    let app = TestApp::new().await;
    let customer = app.create_user("carla", Role::Customer).await;
    let technician = app.create_user("tomas", Role::Technician).await;
    let booking = app.book(&customer).await;
    assert_eq!(booking.status, BookingStatus::Pending);

    let ticket = app.open_ticket(&technician, &booking).await;

    let booking = app.state.booking_service.get(booking.id).await.unwrap();
    assert_eq!(booking.status, BookingStatus::Confirmed);
    assert_eq!(ticket.status, TicketStatus::Received);
    assert_eq!(ticket.technician_id, Some(technician.id));
    assert_eq!(ticket.tracking_code.len(), 8);

    let history = app.state.ticket_service.history(ticket.id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].status, TicketStatus::Received);
    assert_eq!(history[0].changed_by, Some(technician.id));
    assert_eq!(history[0].notes, "created");
}

#[tokio::test]
async fn test_technician_moves_diagnosing_to_ready_but_not_delivered() {
    let Workshop {
        app,
        technician,
        ticket_id,
    } = ticket_in(TicketStatus::Diagnosing).await;
    let token = app.token_for(&technician);
    let before = history_len(&app, ticket_id).await;

    let response = app
        .post_form(
            &format!("/tickets/{ticket_id}/status"),
            &[("status", "ready"), ("notes", "All adjusted")],
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(
        response.location(),
        Some(format!("/tickets/{ticket_id}?saved=1").as_str())
    );
    assert_eq!(status_of(&app, ticket_id).await, TicketStatus::Ready);

    let history = app.state.ticket_service.history(ticket_id).await.unwrap();
    assert_eq!(history.len(), before + 1);
    let last = history.iter().max_by_key(|h| h.id).unwrap();
    assert_eq!(last.status, TicketStatus::Ready);
    assert_eq!(last.changed_by, Some(technician.id));
    assert_eq!(last.notes, "All adjusted");
}

#[tokio::test]
async fn test_technician_cannot_skip_to_delivered() {
    let Workshop {
        app,
        technician,
        ticket_id,
    } = ticket_in(TicketStatus::Diagnosing).await;
    let token = app.token_for(&technician);
    let before = history_len(&app, ticket_id).await;

    let response = app
        .post_form(
            &format!("/tickets/{ticket_id}/status"),
            &[("status", "delivered")],
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(
        response.location(),
        Some(format!("/tickets/{ticket_id}?error=invalid_transition").as_str())
    );
    assert_eq!(status_of(&app, ticket_id).await, TicketStatus::Diagnosing);
    assert_eq!(history_len(&app, ticket_id).await, before);
}

#[tokio::test]
async fn test_technician_transitions_follow_table() {
    for current in TicketStatus::ALL {
        for next in TicketStatus::ALL {
            let Workshop {
                app,
                technician,
                ticket_id,
            } = ticket_in(current).await;
            let token = app.token_for(&technician);

            app.post_form(
                &format!("/tickets/{ticket_id}/status"),
                &[("status", next.as_str())],
                Some(&token),
            )
            .await;

            let allowed = current == next || current.allowed_next().contains(&next);
            let expected = if allowed { next } else { current };
            assert_eq!(
                status_of(&app, ticket_id).await,
                expected,
                "{current:?} -> {next:?}"
            );
        }
    }
}

#[tokio::test]
async fn test_same_status_appends_history_with_notes() {
    let Workshop {
        app,
        technician,
        ticket_id,
    } = ticket_in(TicketStatus::Received).await;
    let token = app.token_for(&technician);

    app.post_form(
        &format!("/tickets/{ticket_id}/status"),
        &[("status", "received"), ("notes", "Customer called")],
        Some(&token),
    )
    .await;

    let history = app.state.ticket_service.history(ticket_id).await.unwrap();
    assert_eq!(history.len(), 2);
    assert!(history.iter().any(|h| h.notes == "Customer called"
        && h.status == TicketStatus::Received
        && h.changed_by == Some(technician.id)));
}

#[tokio::test]
async fn test_admin_may_move_backwards() {
    let Workshop { app, ticket_id, .. } = ticket_in(TicketStatus::Delivered).await;
    let admin = app.create_user("root", Role::Admin).await;
    let token = app.token_for(&admin);
    let before = history_len(&app, ticket_id).await;

    let response = app
        .post_form(
            &format!("/tickets/{ticket_id}/status"),
            &[("status", "received")],
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(status_of(&app, ticket_id).await, TicketStatus::Received);
    assert_eq!(history_len(&app, ticket_id).await, before + 1);
}

#[tokio::test]
async fn test_unassigned_technician_is_forbidden() {
    let Workshop { app, ticket_id, .. } = ticket_in(TicketStatus::Diagnosing).await;
    let other = app.create_user("otro", Role::Technician).await;
    let token = app.token_for(&other);
    let before = history_len(&app, ticket_id).await;

    let response = app
        .post_form(
            &format!("/tickets/{ticket_id}/status"),
            &[("status", "ready")],
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::FORBIDDEN);
    assert_eq!(status_of(&app, ticket_id).await, TicketStatus::Diagnosing);
    assert_eq!(history_len(&app, ticket_id).await, before);
}

#[tokio::test]
async fn test_unknown_status_is_invalid_transition() {
    let Workshop {
        app,
        technician,
        ticket_id,
    } = ticket_in(TicketStatus::Received).await;
    let token = app.token_for(&technician);

    let response = app
        .post_form(
            &format!("/tickets/{ticket_id}/status"),
            &[("status", "teleported")],
            Some(&token),
        )
        .await;

    assert_eq!(
        response.location(),
        Some(format!("/tickets/{ticket_id}?error=invalid_transition").as_str())
    );
}

#[tokio::test]
async fn test_reassignment_keeps_status_and_records_history() {
    let Workshop { app, ticket_id, .. } = ticket_in(TicketStatus::InProgress).await;
    let admin = app.create_user("root", Role::Admin).await;
    let other = app.create_user("otro", Role::Technician).await;
    let token = app.token_for(&admin);
    let before = history_len(&app, ticket_id).await;

    let technician_id = other.id.to_string();
    let response = app
        .post_form(
            &format!("/admin/tickets/{ticket_id}/technician"),
            &[("technician_id", technician_id.as_str())],
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    let ticket = app.state.ticket_service.get(ticket_id).await.unwrap();
    assert_eq!(ticket.technician_id, Some(other.id));
    assert_eq!(ticket.status, TicketStatus::InProgress);
    let history = app.state.ticket_service.history(ticket_id).await.unwrap();
    assert_eq!(history.len(), before + 1);
    assert!(history
        .iter()
        .any(|h| h.status == TicketStatus::InProgress && h.changed_by == Some(admin.id)));
}

#[tokio::test]
async fn test_part_toggle_answers_htmx_with_status() {
    let Workshop {
        app,
        technician,
        ticket_id,
    } = ticket_in(TicketStatus::InProgress).await;
    let token = app.token_for(&technician);

    app.post_form(
        &format!("/tickets/{ticket_id}/parts"),
        &[("name", "Brake pads")],
        Some(&token),
    )
    .await;
    let detail = app.state.ticket_service.detail(ticket_id).await.unwrap();
    assert_eq!(detail.parts.len(), 1);
    let part_id = detail.parts[0].id;

    let req = Request::builder()
        .method("POST")
        .uri(format!("/tickets/{ticket_id}/parts/{part_id}/toggle"))
        .header("HX-Request", "true");
    let response = app.send(req, Body::empty(), Some(&token)).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.body, "done");

    let response = app
        .post_form(
            &format!("/tickets/{ticket_id}/parts/{part_id}/toggle"),
            &[],
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER);
    let detail = app.state.ticket_service.detail(ticket_id).await.unwrap();
    assert_eq!(detail.parts[0].status.as_str(), "pending");
}

#[tokio::test]
async fn test_walk_in_creates_unassigned_ticket() {
    let app = TestApp::new().await;
    let technician = app.create_user("tomas", Role::Technician).await;
    let token = app.token_for(&technician);

    let response = app
        .post_form(
            "/tickets/create_direct",
            &[
                ("customer_name", "Walk In"),
                ("customer_email", "walkin@test.local"),
                ("customer_phone", ""),
                ("brand_name", "Orbea"),
                ("model_name", "Alma"),
                ("color", "red"),
                ("serial_number", "SN-1"),
                ("notes", "Flat tyre"),
            ],
            Some(&token),
        )
        .await;
    assert_eq!(response.status, StatusCode::SEE_OTHER, "{}", response.body);

    let id: i64 = response
        .location()
        .and_then(|l| l.strip_prefix("/tickets/"))
        .and_then(|l| l.split('?').next())
        .and_then(|id| id.parse().ok())
        .expect("ticket id in redirect");
    let ticket = app.state.ticket_service.get(id).await.unwrap();
    assert_eq!(ticket.technician_id, None);
    assert_eq!(ticket.status, TicketStatus::Received);
    let history = app.state.ticket_service.history(id).await.unwrap();
    assert_eq!(history.len(), 1);
    assert_eq!(history[0].changed_by, None);
}

#[tokio::test]
async fn test_ticket_detail_and_label_render() {
    let Workshop {
        app,
        technician,
        ticket_id,
    } = ticket_in(TicketStatus::Received).await;
    let token = app.token_for(&technician);
    let code = app.state.ticket_service.get(ticket_id).await.unwrap().tracking_code;

    let detail = app.get(&format!("/tickets/{ticket_id}"), Some(&token)).await;
    assert_eq!(detail.status, StatusCode::OK);
    assert!(detail.body.contains(&code));

    let label = app
        .get(&format!("/tickets/{ticket_id}/label"), Some(&token))
        .await;
    assert_eq!(label.status, StatusCode::OK);
    assert!(label.body.contains("data:image/png;base64,"));
}

#[tokio::test]
async fn test_history_failure_keeps_status_change() {
    let Workshop {
        app,
        technician,
        ticket_id,
    } = ticket_in(TicketStatus::Diagnosing).await;
    let token = app.token_for(&technician);

    sqlx::query("DROP TABLE ticket_status_history")
        .execute(&app.state.db_pool)
        .await
        .unwrap();

    let response = app
        .post_form(
            &format!("/tickets/{ticket_id}/status"),
            &[("status", "in_progress"), ("notes", "Started")],
            Some(&token),
        )
        .await;

    assert_eq!(response.status, StatusCode::SEE_OTHER);
    assert_eq!(
        response.location(),
        Some(format!("/tickets/{ticket_id}?saved=1").as_str())
    );
    assert_eq!(status_of(&app, ticket_id).await, TicketStatus::InProgress);
}

#[tokio::test]
async fn test_delivered_ticket_still_takes_notes() {
    let Workshop {
        app,
        technician,
        ticket_id,
    } = ticket_in(TicketStatus::Delivered).await;
    let token = app.token_for(&technician);
    let before = history_len(&app, ticket_id).await;

    let detail = app.get(&format!("/tickets/{ticket_id}"), Some(&token)).await;
    assert_eq!(detail.status, StatusCode::OK);
    assert!(detail.body.contains(r#"<option value="delivered" selected>"#));

    let response = app
        .post_form(
            &format!("/tickets/{ticket_id}/status"),
            &[("status", "delivered"), ("notes", "Picked up by partner")],
            Some(&token),
        )
        .await;

    assert_eq!(
        response.location(),
        Some(format!("/tickets/{ticket_id}?saved=1").as_str())
    );
    assert_eq!(history_len(&app, ticket_id).await, before + 1);
}

#[tokio::test]
async fn test_status_api_limited_to_booking_owner_and_staff() {
    let app = TestApp::new().await;
    let owner = app.create_user("carla", Role::Customer).await;
    let stranger = app.create_user("otra", Role::Customer).await;
    let technician = app.create_user("tomas", Role::Technician).await;
    let booking = app.book(&owner).await;
    let ticket = app.open_ticket(&technician, &booking).await;
    let path = format!("/api/tickets/{}/status", ticket.id);

    let response = app.get(&path, Some(&app.token_for(&stranger))).await;
    assert_eq!(response.status, StatusCode::FORBIDDEN);

    let response = app.get(&path, Some(&app.token_for(&owner))).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["trackingCode"], ticket.tracking_code.as_str());

    let response = app.get(&path, Some(&app.token_for(&technician))).await;
    assert_eq!(response.status, StatusCode::OK);
    assert_eq!(response.json()["status"], "received");
}
