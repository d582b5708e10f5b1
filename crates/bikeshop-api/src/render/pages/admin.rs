//! Back-office pages.

use askama::Template;

use bikeshop_database::repositories::catalog::ModelWithBrand;
use bikeshop_database::repositories::ticket::TicketSummary;
use bikeshop_entity::ad::{Ad, MediaType};
use bikeshop_entity::catalog::{BikeModel, Brand, ServiceOffering};
use bikeshop_entity::user::{Role, User};
use bikeshop_service::report::{
    AdminDashboard, BookingsReport, ReportsOverview, RevenueReport, SurveyReport,
};

use super::{Chip, Pager, SelectOption};
use crate::render::{Layout, filters};

/// Brands / Models / Services tabs above the catalog tables.
pub fn catalog_tabs(current: &str) -> Vec<Chip> {
    [
        ("/admin/brands", "Brands"),
        ("/admin/models", "Models"),
        ("/admin/services", "Services"),
    ]
    .into_iter()
    .map(|(href, label)| Chip {
        href: href.to_string(),
        label,
        active: href == current,
    })
    .collect()
}

/// "All" followed by one chip per role.
pub fn role_chips(current: Option<Role>) -> Vec<Chip> {
    std::iter::once(Chip {
        href: "/admin/users".to_string(),
        label: "All",
        active: current.is_none(),
    })
    .chain(Role::ALL.into_iter().map(|role| Chip {
        href: format!("/admin/users?role={}", role.as_str()),
        label: role.as_str(),
        active: current == Some(role),
    }))
    .collect()
}

#[derive(Template)]
#[template(path = "admin/dashboard.html")]
pub struct AdminDashboardPage {
    pub layout: Layout,
    pub stats: AdminDashboard,
}

#[derive(Template)]
#[template(path = "admin/users.html")]
pub struct UsersPage {
    pub layout: Layout,
    pub chips: Vec<Chip>,
    pub users: Vec<User>,
}

/// Create/edit form for an account. Also re-shown with the submitted
/// values when saving fails.
#[derive(Template)]
#[template(path = "admin/user_form.html")]
pub struct UserFormPage {
    pub layout: Layout,
    pub user_id: Option<i64>,
    pub name: String,
    pub email: String,
    pub phone: String,
    pub roles: Vec<SelectOption>,
}

impl UserFormPage {
    pub fn new(
        layout: Layout,
        user_id: Option<i64>,
        name: &str,
        email: &str,
        phone: &str,
        role: &str,
    ) -> Self {
        let role = if role.trim().is_empty() {
            Role::Customer.as_str()
        } else {
            role
        };
        Self {
            layout,
            user_id,
            name: name.to_string(),
            email: email.to_string(),
            phone: phone.to_string(),
            roles: Role::ALL
                .into_iter()
                .map(|r| SelectOption::new(r.as_str(), r.as_str(), r.as_str() == role))
                .collect(),
        }
    }

    pub fn blank(layout: Layout) -> Self {
        Self::new(layout, None, "", "", "", "")
    }

    pub fn edit(layout: Layout, user: &User) -> Self {
        Self::new(
            layout,
            Some(user.id),
            &user.name,
            &user.email,
            &user.phone,
            user.role.as_str(),
        )
    }

    fn action(&self) -> String {
        match self.user_id {
            Some(id) => format!("/admin/users/{id}"),
            None => "/admin/users/new".to_string(),
        }
    }
}

#[derive(Template)]
#[template(path = "admin/brands.html")]
pub struct BrandsPage {
    pub layout: Layout,
    pub tabs: Vec<Chip>,
    pub brands: Vec<Brand>,
}

#[derive(Template)]
#[template(path = "admin/brand_form.html")]
pub struct BrandFormPage {
    pub layout: Layout,
    pub action: String,
    pub name: String,
    pub logo_url: String,
}

impl BrandFormPage {
    pub fn new(layout: Layout, brand: Option<Brand>) -> Self {
        match brand {
            Some(b) => Self {
                layout,
                action: format!("/admin/brands/{}", b.id),
                name: b.name,
                logo_url: b.logo_url,
            },
            None => Self {
                layout,
                action: "/admin/brands/new".to_string(),
                name: String::new(),
                logo_url: String::new(),
            },
        }
    }
}

#[derive(Template)]
#[template(path = "admin/models.html")]
pub struct ModelsPage {
    pub layout: Layout,
    pub tabs: Vec<Chip>,
    pub models: Vec<ModelWithBrand>,
}

#[derive(Template)]
#[template(path = "admin/model_form.html")]
pub struct ModelFormPage {
    pub layout: Layout,
    pub action: String,
    pub name: String,
    pub brands: Vec<SelectOption>,
}

impl ModelFormPage {
    pub fn new(layout: Layout, model: Option<BikeModel>, brands: &[Brand]) -> Self {
        let brand_id = model.as_ref().map(|m| m.brand_id);
        let brands = brands
            .iter()
            .map(|b| SelectOption::new(b.id, b.name.as_str(), brand_id == Some(b.id)))
            .collect();
        match model {
            Some(m) => Self {
                layout,
                action: format!("/admin/models/{}", m.id),
                name: m.name,
                brands,
            },
            None => Self {
                layout,
                action: "/admin/models/new".to_string(),
                name: String::new(),
                brands,
            },
        }
    }
}

#[derive(Template)]
#[template(path = "admin/services.html")]
pub struct ServicesPage {
    pub layout: Layout,
    pub tabs: Vec<Chip>,
    pub services: Vec<ServiceOffering>,
}

#[derive(Template)]
#[template(path = "admin/service_form.html")]
pub struct ServiceFormPage {
    pub layout: Layout,
    pub action: String,
    pub name: String,
    pub description: String,
    pub base_price: String,
    pub estimated_hours: String,
}

impl ServiceFormPage {
    pub fn new(layout: Layout, service: Option<ServiceOffering>) -> Self {
        match service {
            Some(s) => Self {
                layout,
                action: format!("/admin/services/{}", s.id),
                name: s.name,
                description: s.description,
                base_price: format!("{:.2}", s.base_price),
                estimated_hours: s.estimated_hours.to_string(),
            },
            None => Self {
                layout,
                action: "/admin/services/new".to_string(),
                name: String::new(),
                description: String::new(),
                base_price: String::new(),
                estimated_hours: String::new(),
            },
        }
    }
}

#[derive(Template)]
#[template(path = "admin/reports.html")]
pub struct ReportsPage {
    pub layout: Layout,
    pub overview: ReportsOverview,
}

#[derive(Template)]
#[template(path = "admin/report_bookings.html")]
pub struct BookingsReportPage {
    pub layout: Layout,
    pub report: BookingsReport,
}

#[derive(Template)]
#[template(path = "admin/report_revenue.html")]
pub struct RevenueReportPage {
    pub layout: Layout,
    pub report: RevenueReport,
}

#[derive(Template)]
#[template(path = "admin/report_surveys.html")]
pub struct SurveysReportPage {
    pub layout: Layout,
    pub report: SurveyReport,
}

impl SurveysReportPage {
    /// `(stars, answers, percent)` from five stars down to one.
    fn bars(&self) -> Vec<(i64, i64, i64)> {
        let stats = &self.report.stats;
        (0..5)
            .rev()
            .map(|i| (i as i64 + 1, stats.distribution[i], stats.percentages[i]))
            .collect()
    }
}

/// One row of the admin ticket table with its reassignment choices.
pub struct TicketRow {
    pub ticket: TicketSummary,
    pub technicians: Vec<SelectOption>,
}

#[derive(Template)]
#[template(path = "admin/tickets.html")]
pub struct AdminTicketsPage {
    pub layout: Layout,
    pub chips: Vec<Chip>,
    pub rows: Vec<TicketRow>,
    pub pager: Pager,
}

#[derive(Template)]
#[template(path = "admin/settings.html")]
pub struct SettingsPage {
    pub layout: Layout,
    pub hero_concept: String,
}

pub struct AdRow {
    pub ad: Ad,
    pub media_types: Vec<SelectOption>,
}

impl AdRow {
    pub fn new(ad: Ad) -> Self {
        let media_types = [MediaType::Image, MediaType::Video]
            .into_iter()
            .map(|t| SelectOption::new(t.as_str(), t.as_str(), t == ad.media_type))
            .collect();
        Self { ad, media_types }
    }
}

#[derive(Template)]
#[template(path = "admin/ads.html")]
pub struct AdsPage {
    pub layout: Layout,
    pub ads: Vec<AdRow>,
}
