//! Customer area pages.

use askama::Template;

use bikeshop_database::repositories::booking::BookingSummary;
use bikeshop_database::repositories::ticket::TicketSummary;
use bikeshop_entity::booking::Booking;
use bikeshop_entity::catalog::{BicycleDetails, Brand, ServiceOffering};
use bikeshop_entity::quote::{Quote, QuoteStatus};
use bikeshop_entity::survey::Survey;
use bikeshop_entity::ticket::Ticket;
use bikeshop_entity::user::User;
use bikeshop_service::BookingDetail;

use super::SelectOption;
use crate::render::{Layout, filters};

#[derive(Template)]
#[template(path = "customer/dashboard.html")]
pub struct DashboardPage {
    pub layout: Layout,
    pub bookings: Vec<BookingSummary>,
    pub tickets: Vec<TicketSummary>,
    pub pending_quotes: usize,
}

#[derive(Template)]
#[template(path = "customer/bookings.html")]
pub struct BookingsPage {
    pub layout: Layout,
    pub bookings: Vec<BookingSummary>,
}

/// Booking form. Models and time slots are refreshed client-side from the
/// JSON endpoints once a brand or date is picked.
#[derive(Template)]
#[template(path = "customer/booking_new.html")]
pub struct BookingNewPage {
    pub layout: Layout,
    pub services: Vec<SelectOption>,
    pub bicycles: Vec<SelectOption>,
    pub brands: Vec<SelectOption>,
    pub slots: Vec<SelectOption>,
    pub min_date: String,
}

impl BookingNewPage {
    pub fn new(
        layout: Layout,
        services: &[ServiceOffering],
        bicycles: &[BicycleDetails],
        brands: &[Brand],
        slots: &[&str],
        min_date: String,
    ) -> Self {
        Self {
            layout,
            services: services
                .iter()
                .map(|s| SelectOption::new(s.id, s.name.as_str(), false))
                .collect(),
            bicycles: bicycles
                .iter()
                .map(|b| {
                    let label = format!("{} {}", b.display_name(), b.color);
                    SelectOption::new(b.id, label.trim(), false)
                })
                .collect(),
            brands: brands
                .iter()
                .map(|b| SelectOption::new(b.id, b.name.as_str(), false))
                .collect(),
            slots: slots
                .iter()
                .map(|s| SelectOption::new(s, *s, false))
                .collect(),
            min_date,
        }
    }
}

#[derive(Template)]
#[template(path = "customer/booking_detail.html")]
pub struct BookingDetailPage {
    pub layout: Layout,
    pub detail: BookingDetail,
    pub can_cancel: bool,
}

#[derive(Template)]
#[template(path = "customer/quotes.html")]
pub struct QuotesPage {
    pub layout: Layout,
    pub quotes: Vec<Quote>,
}

#[derive(Template)]
#[template(path = "customer/quote_detail.html")]
pub struct QuoteDetailPage {
    pub layout: Layout,
    pub quote: Quote,
    pub booking: Booking,
}

impl QuoteDetailPage {
    fn is_rejected(&self) -> bool {
        self.quote.status == QuoteStatus::Rejected
    }
}

#[derive(Template)]
#[template(path = "customer/profile.html")]
pub struct ProfilePage {
    pub layout: Layout,
    pub profile: User,
}

#[derive(Template)]
#[template(path = "customer/survey.html")]
pub struct SurveyPage {
    pub layout: Layout,
    pub ticket: Ticket,
}

#[derive(Template)]
#[template(path = "customer/survey_completed.html")]
pub struct SurveyCompletedPage {
    pub layout: Layout,
    pub ticket: Ticket,
    pub survey: Survey,
}
