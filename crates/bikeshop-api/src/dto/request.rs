//! Form and query DTOs with validation.

use chrono::{DateTime, Duration, NaiveDate, NaiveTime, Utc};
use serde::Deserialize;
use validator::{Validate, ValidationErrors};

use bikeshop_core::error::AppError;
use bikeshop_core::result::AppResult;
use bikeshop_entity::ad::{AdInput, MediaType};
use bikeshop_entity::catalog::ServiceInput;
use bikeshop_entity::quote::QuoteItem;
use bikeshop_entity::user::Role;
use bikeshop_service::{BookingRequest, NewBicycle, UserForm, WalkInRequest};

/// Run the derive-based checks on a form, turning the first failure into a
/// validation error.
pub fn validate_form<T: Validate>(form: &T) -> AppResult<()> {
    form.validate().map_err(|e| AppError::validation(first_message(&e)))
}

fn first_message(errors: &ValidationErrors) -> String {
    errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            errs.iter().map(move |err| match &err.message {
                Some(message) => message.to_string(),
                None => format!("Invalid value for {field}"),
            })
        })
        .next()
        .unwrap_or_else(|| "Invalid form".to_string())
}

/// Optional integer from a form field; blank or malformed is `None`.
fn parse_id(value: &str) -> Option<i64> {
    value.trim().parse().ok()
}

fn parse_amount(field: &str, value: &str) -> AppResult<f64> {
    let value = value.trim();
    if value.is_empty() {
        return Ok(0.0);
    }
    value
        .parse()
        .map_err(|_| AppError::validation(format!("{field} must be a number")))
}

fn checkbox(value: &Option<String>) -> bool {
    value
        .as_deref()
        .is_some_and(|v| matches!(v, "on" | "true" | "1"))
}

// ── Auth ─────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct LoginForm {
    #[serde(default)]
    #[validate(length(min = 1, message = "Email is required"))]
    pub email: String,
    #[serde(default)]
    #[validate(length(min = 1, message = "Password is required"))]
    pub password: String,
}

// ── Tracking & surveys ───────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
pub struct TrackingQuery {
    pub code: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TrackingApproveForm {
    #[serde(default)]
    pub tracking_code: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SurveyForm {
    pub rating: i64,
    #[serde(default)]
    pub feedback: String,
}

// ── Customer area ────────────────────────────────────────────

/// Booking form. `bicycle_id` is an existing bicycle id or `"new"`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BookingForm {
    pub service_id: String,
    pub bicycle_id: String,
    pub brand_id: String,
    pub model_id: String,
    pub color: String,
    pub serial_number: String,
    pub date: String,
    pub time: String,
    pub notes: String,
}

impl BookingForm {
    pub fn into_request(self) -> BookingRequest {
        let new_bicycle = (self.bicycle_id.trim() == "new").then(|| NewBicycle {
            brand_id: parse_id(&self.brand_id),
            model_id: parse_id(&self.model_id),
            color: self.color.trim().to_string(),
            serial_number: self.serial_number.trim().to_string(),
        });
        BookingRequest {
            service_id: parse_id(&self.service_id),
            bicycle_id: parse_id(&self.bicycle_id),
            new_bicycle,
            date: self.date,
            time: self.time,
            notes: self.notes,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RejectForm {
    #[serde(default)]
    pub reason: String,
}

#[derive(Debug, Clone, Deserialize, Validate)]
pub struct ProfileForm {
    #[serde(default)]
    #[validate(length(min = 1, max = 100, message = "Name is required"))]
    pub name: String,
    #[serde(default)]
    #[validate(length(max = 30, message = "Phone number is too long"))]
    pub phone: String,
}

// ── Workshop ─────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct StatusForm {
    pub status: String,
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct NotesForm {
    #[serde(default)]
    pub notes: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PartForm {
    #[serde(default)]
    pub name: String,
}

/// Bicycle details edited from the ticket page.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BicycleForm {
    pub redirect_to: String,
    pub color: String,
    pub serial_number: String,
    pub notes: String,
}

impl BicycleForm {
    /// Local path to return to; anything else falls back to `fallback`.
    pub fn redirect_or(&self, fallback: &str) -> String {
        let target = self.redirect_to.trim();
        if target.starts_with('/') && !target.starts_with("//") {
            target.to_string()
        } else {
            fallback.to_string()
        }
    }
}

/// Itemised quote form: the three item fields repeat once per line.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct QuoteForm {
    pub ticket_id: String,
    pub item_description: Vec<String>,
    pub item_quantity: Vec<String>,
    pub item_price: Vec<String>,
}

impl QuoteForm {
    pub fn ticket_id(&self) -> Option<i64> {
        parse_id(&self.ticket_id)
    }

    /// Line items, skipping rows without a description. A missing or
    /// non-positive quantity counts as one.
    pub fn items(&self) -> AppResult<Vec<QuoteItem>> {
        let mut items = Vec::new();
        for (i, description) in self.item_description.iter().enumerate() {
            let description = description.trim();
            if description.is_empty() {
                continue;
            }
            let quantity = self
                .item_quantity
                .get(i)
                .and_then(|q| q.trim().parse::<i64>().ok())
                .filter(|q| *q > 0)
                .unwrap_or(1);
            let price = parse_amount(
                "Unit price",
                self.item_price.get(i).map(String::as_str).unwrap_or(""),
            )?;
            if price < 0.0 {
                return Err(AppError::validation("Unit price cannot be negative"));
            }
            items.push(QuoteItem::new(description, quantity, price));
        }
        Ok(items)
    }
}

#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(default)]
pub struct WalkInForm {
    #[validate(length(min = 1, message = "Customer name is required"))]
    pub customer_name: String,
    #[validate(email(message = "A valid customer email is required"))]
    pub customer_email: String,
    pub customer_phone: String,
    pub brand_name: String,
    pub model_name: String,
    pub color: String,
    pub serial_number: String,
    pub service_id: String,
    pub notes: String,
}

impl WalkInForm {
    pub fn into_request(self) -> WalkInRequest {
        WalkInRequest {
            service_id: parse_id(&self.service_id),
            customer_name: self.customer_name,
            customer_email: self.customer_email,
            customer_phone: self.customer_phone,
            brand_name: self.brand_name,
            model_name: self.model_name,
            color: self.color,
            serial_number: self.serial_number,
            notes: self.notes,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct TechnicianForm {
    pub technician_id: i64,
}

// ── Admin ────────────────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
pub struct RoleQuery {
    pub role: Option<String>,
}

impl RoleQuery {
    /// The role filter; blank means every role.
    pub fn role(&self) -> AppResult<Option<Role>> {
        match self.role.as_deref().map(str::trim) {
            None | Some("") => Ok(None),
            Some(role) => role.parse().map(Some),
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct StatusQuery {
    pub status: Option<String>,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AdminUserForm {
    pub name: String,
    pub email: String,
    pub phone: String,
    pub role: String,
    pub password: String,
}

impl AdminUserForm {
    pub fn into_form(self) -> AppResult<UserForm> {
        Ok(UserForm {
            role: self.role.parse()?,
            name: self.name,
            email: self.email,
            phone: self.phone,
            password: self.password,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BrandForm {
    pub name: String,
    pub logo_url: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ModelForm {
    pub brand_id: i64,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct ServiceForm {
    pub name: String,
    pub description: String,
    pub base_price: String,
    pub estimated_hours: String,
}

impl ServiceForm {
    pub fn into_input(self) -> AppResult<ServiceInput> {
        Ok(ServiceInput {
            base_price: parse_amount("Base price", &self.base_price)?,
            estimated_hours: parse_amount("Estimated hours", &self.estimated_hours)?,
            name: self.name,
            description: self.description,
        })
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AdForm {
    pub title: String,
    pub media_url: String,
    pub media_type: String,
    pub link_url: String,
    pub active: Option<String>,
    /// `"toggle"` when the pause/activate button submitted the form.
    pub action: Option<String>,
}

impl AdForm {
    pub fn is_toggle(&self) -> bool {
        self.action.as_deref() == Some("toggle")
    }

    pub fn into_input(self) -> AdInput {
        let media_type = if self.media_type.trim() == "video" {
            MediaType::Video
        } else {
            MediaType::Image
        };
        AdInput {
            active: checkbox(&self.active),
            title: self.title,
            media_url: self.media_url,
            media_type,
            link_url: self.link_url,
        }
    }
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SettingsForm {
    #[serde(default)]
    pub hero_concept: String,
}

/// `?from=YYYY-MM-DD&to=YYYY-MM-DD` on the bookings report. Both ends are
/// inclusive whole days.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ReportRangeQuery {
    pub from: Option<String>,
    pub to: Option<String>,
}

impl ReportRangeQuery {
    pub fn range(&self) -> AppResult<(Option<DateTime<Utc>>, Option<DateTime<Utc>>)> {
        let day = |value: &Option<String>| -> AppResult<Option<NaiveDate>> {
            match value.as_deref().map(str::trim) {
                None | Some("") => Ok(None),
                Some(raw) => NaiveDate::parse_from_str(raw, "%Y-%m-%d")
                    .map(Some)
                    .map_err(|_| AppError::validation(format!("Invalid date: {raw}"))),
            }
        };
        let from = day(&self.from)?.map(|d| d.and_time(NaiveTime::MIN).and_utc());
        let to = day(&self.to)?
            .and_then(|d| d.succ_opt())
            .map(|d| d.and_time(NaiveTime::MIN).and_utc() - Duration::seconds(1));
        Ok((from, to))
    }
}

// ── JSON endpoints ───────────────────────────────────────────

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SlotsQuery {
    #[serde(default)]
    pub date: String,
}
