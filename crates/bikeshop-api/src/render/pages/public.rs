//! Pages reachable without signing in.

use askama::Template;

use bikeshop_entity::ad::{Ad, MediaType};
use bikeshop_entity::catalog::{BicycleDetails, ServiceOffering};
use bikeshop_entity::quote::Quote;
use bikeshop_entity::survey::Survey;
use bikeshop_entity::ticket::{Ticket, TicketStatusHistory};

use crate::render::{Layout, filters};

#[derive(Template)]
#[template(path = "public/home.html")]
pub struct HomePage {
    pub layout: Layout,
    pub hero_concept: String,
    pub tagline: String,
    pub services: Vec<ServiceOffering>,
}

#[derive(Template)]
#[template(path = "public/services.html")]
pub struct ServicesPage {
    pub layout: Layout,
    pub services: Vec<ServiceOffering>,
}

#[derive(Template)]
#[template(path = "public/login.html")]
pub struct LoginPage {
    pub layout: Layout,
    pub email: String,
}

#[derive(Template)]
#[template(path = "public/register.html")]
pub struct RegisterPage {
    pub layout: Layout,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub password_min_length: usize,
}

#[derive(Template)]
#[template(path = "public/tracking.html")]
pub struct TrackingPage {
    pub layout: Layout,
    pub code: String,
    pub not_found: bool,
}

/// Public view of one repair, looked up by tracking code.
#[derive(Template)]
#[template(path = "public/tracking_result.html")]
pub struct TrackingResultPage {
    pub layout: Layout,
    pub ticket: Ticket,
    pub history: Vec<TicketStatusHistory>,
    pub bicycle: Option<BicycleDetails>,
    pub quote: Option<Quote>,
    pub survey: Option<Survey>,
    pub can_survey: bool,
    pub ad: Option<Ad>,
}

impl TrackingResultPage {
    fn ad_is_video(&self) -> bool {
        self.ad
            .as_ref()
            .is_some_and(|ad| ad.media_type == MediaType::Video)
    }
}
