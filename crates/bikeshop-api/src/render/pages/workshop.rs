//! Workshop pages for technicians and admins.

use askama::Template;

use bikeshop_database::repositories::booking::BookingSummary;
use bikeshop_database::repositories::ticket::TicketSummary;
use bikeshop_entity::booking::Booking;
use bikeshop_entity::catalog::{BicycleDetails, ServiceOffering};
use bikeshop_entity::quote::Quote;
use bikeshop_entity::ticket::{Ticket, TicketStatus};
use bikeshop_entity::user::User;
use bikeshop_service::TicketDetail;

use super::{Chip, Pager, SelectOption};
use crate::render::{Layout, filters};

#[derive(Template)]
#[template(path = "workshop/dashboard.html")]
pub struct WorkshopPage {
    pub layout: Layout,
    pub status_counts: Vec<(TicketStatus, i64)>,
    pub pending_bookings: Vec<BookingSummary>,
    pub my_tickets: Vec<TicketSummary>,
}

#[derive(Template)]
#[template(path = "workshop/tickets.html")]
pub struct TicketsPage {
    pub layout: Layout,
    pub chips: Vec<Chip>,
    pub tickets: Vec<TicketSummary>,
    pub pager: Pager,
}

#[derive(Template)]
#[template(path = "workshop/ticket_detail.html")]
pub struct TicketDetailPage {
    pub layout: Layout,
    pub detail: TicketDetail,
    /// Choices for the status form, current status preselected.
    pub statuses: Vec<SelectOption>,
    /// Reassignment choices; empty unless the viewer is an admin.
    pub technicians: Vec<SelectOption>,
    pub tracking_url: String,
}

impl TicketDetailPage {
    fn can_reassign(&self) -> bool {
        self.layout.user.as_ref().is_some_and(|u| u.is_admin())
    }
}

#[derive(Template)]
#[template(path = "workshop/ticket_new.html")]
pub struct TicketNewPage {
    pub layout: Layout,
    pub services: Vec<SelectOption>,
}

impl TicketNewPage {
    pub fn new(layout: Layout, services: &[ServiceOffering]) -> Self {
        Self {
            layout,
            services: services
                .iter()
                .map(|s| SelectOption::new(s.id, s.name.as_str(), false))
                .collect(),
        }
    }
}

/// Quote entry form. The first row is prefilled from the booked service.
#[derive(Template)]
#[template(path = "workshop/quote_new.html")]
pub struct QuoteNewPage {
    pub layout: Layout,
    pub booking: Booking,
    pub ticket_id: Option<i64>,
    pub customer_name: String,
    pub first_description: String,
    pub first_price: String,
}

impl QuoteNewPage {
    pub fn new(
        layout: Layout,
        booking: Booking,
        ticket_id: Option<i64>,
        service: Option<ServiceOffering>,
        customer_name: String,
    ) -> Self {
        let (first_description, first_price) = match service {
            Some(s) => (s.name, format!("{:.2}", s.base_price)),
            None => (String::new(), String::new()),
        };
        Self {
            layout,
            booking,
            ticket_id,
            customer_name,
            first_description,
            first_price,
        }
    }
}

/// Printable bicycle tag with the tracking QR code.
#[derive(Template)]
#[template(path = "workshop/ticket_label.html")]
pub struct TicketLabelPage {
    pub layout: Layout,
    pub ticket: Ticket,
    pub qr_base64: String,
    pub tracking_url: String,
    pub customer: Option<User>,
    pub bicycle: Option<BicycleDetails>,
}

#[derive(Template)]
#[template(path = "workshop/ticket_quote.html")]
pub struct TicketQuotePage {
    pub layout: Layout,
    pub ticket: Ticket,
    pub quote: Quote,
    pub customer: Option<User>,
    pub bicycle: Option<BicycleDetails>,
}

#[cfg(test)]
mod tests {
    use bikeshop_core::config::business::BusinessConfig;
    use bikeshop_entity::ticket::{PartStatus, TicketPart, TicketStatusHistory};
    use bikeshop_entity::user::Role;
    use bikeshop_service::RequestContext;
    use chrono::Utc;

    use super::super::status_options;
    use super::*;

    fn layout(role: Role) -> Layout {
        let user = RequestContext::new(2, "tomas@test.local", role);
        Layout::new(&BusinessConfig::default(), "Workshop", Some(user))
    }

    fn ticket() -> Ticket {
        Ticket {
            id: 5,
            booking_id: 8,
            technician_id: Some(2),
            tracking_code: "ab12cd34".into(),
            qr_code: None,
            status: TicketStatus::Diagnosing,
            notes: String::new(),
            created_at: Utc::now(),
            updated_at: Utc::now(),
        }
    }

    fn walk_in_bicycle() -> BicycleDetails {
        BicycleDetails {
            id: 3,
            user_id: 9,
            brand_name: Some("<script>alert(1)</script>".into()),
            model_name: Some("Rockhopper".into()),
            color: "red".into(),
            serial_number: "SN-1".into(),
            notes: String::new(),
        }
    }

    fn detail() -> TicketDetail {
        TicketDetail {
            ticket: ticket(),
            booking: None,
            customer: None,
            technician: None,
            bicycle: Some(walk_in_bicycle()),
            history: vec![TicketStatusHistory {
                id: 1,
                ticket_id: 5,
                status: TicketStatus::Received,
                changed_by: Some(2),
                notes: "Checked in".into(),
                created_at: Utc::now(),
            }],
            parts: vec![TicketPart {
                id: 11,
                ticket_id: 5,
                name: "Chain".into(),
                status: PartStatus::Done,
                created_at: Utc::now(),
            }],
            quote: None,
            survey: None,
        }
    }

    #[test]
    fn test_ticket_detail_escapes_walk_in_brand() {
        let page = TicketDetailPage {
            layout: layout(Role::Technician),
            detail: detail(),
            statuses: status_options(
                [TicketStatus::Diagnosing, TicketStatus::Ready],
                TicketStatus::Diagnosing,
            ),
            technicians: Vec::new(),
            tracking_url: "http://localhost:3000/tracking/ab12cd34".into(),
        };
        let html = page.render().unwrap();
        assert!(html.contains("&lt;script&gt;alert(1)"));
        assert!(!html.contains("<script>alert(1)</script>"));
        assert!(html.contains(r#"<option value="diagnosing" selected>"#));
        assert!(html.contains(r#"action="/tickets/5/parts/11/toggle""#));
        assert!(html.contains("by user #2"));
        assert!(html.contains(r#"href="/quotes/new/8?ticket_id=5""#));
        assert!(!html.contains("/admin/tickets/5/technician"));
    }

    #[test]
    fn test_label_is_printable_without_navigation() {
        let page = TicketLabelPage {
            layout: layout(Role::Technician),
            ticket: ticket(),
            qr_base64: "iVBORw0KGgo=".into(),
            tracking_url: "http://localhost:3000/tracking/ab12cd34".into(),
            customer: None,
            bicycle: Some(walk_in_bicycle()),
        };
        let html = page.render().unwrap();
        assert!(html.contains("window.print()"));
        assert!(html.contains("data:image/png;base64,iVBORw0KGgo="));
        assert!(!html.contains("nav-links"));
        assert!(!html.contains("<script>alert(1)</script>"));
    }

    #[test]
    fn test_quote_form_prefills_service_row() {
        let booking = Booking {
            id: 8,
            customer_id: 9,
            service_id: Some(1),
            bicycle_id: None,
            scheduled_at: Utc::now(),
            status: bikeshop_entity::booking::BookingStatus::Confirmed,
            notes: String::new(),
            created_at: Utc::now(),
        };
        let service = ServiceOffering {
            id: 1,
            name: "Tune-up".into(),
            description: String::new(),
            base_price: 45.0,
            estimated_hours: 1.5,
        };
        let page = QuoteNewPage::new(
            layout(Role::Technician),
            booking,
            Some(5),
            Some(service),
            "Carla".into(),
        );
        let html = page.render().unwrap();
        assert!(html.contains(r#"value="Tune-up""#));
        assert!(html.contains(r#"value="45.00""#));
        assert!(html.contains(r#"name="ticket_id" value="5""#));
        assert!(html.contains(r#"action="/quotes/new/8""#));
    }
}
