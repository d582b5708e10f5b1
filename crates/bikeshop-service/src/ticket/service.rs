//! Ticket lifecycle service.
//!
//! A status change is two statements: the ticket update, then the history
//! append. They are not wrapped in a transaction. If the append fails the
//! change stands and the failure is only logged.

use std::sync::Arc;

use chrono::Utc;
use serde::Serialize;
use tracing::{info, warn};

use bikeshop_auth::PasswordHasher;
use bikeshop_core::error::{AppError, ErrorKind};
use bikeshop_core::result::AppResult;
use bikeshop_core::types::{PageRequest, PageResponse};
use bikeshop_database::repositories::ticket::{TicketFilter, TicketSummary};
use bikeshop_database::repositories::{
    BicycleRepository, BookingRepository, BrandRepository, QuoteRepository, SurveyRepository,
    TicketRepository, UserRepository,
};
use bikeshop_entity::booking::{Booking, BookingStatus, CreateBooking};
use bikeshop_entity::catalog::{BicycleDetails, CreateBicycle};
use bikeshop_entity::quote::Quote;
use bikeshop_entity::survey::Survey;
use bikeshop_entity::ticket::{
    CreateTicket, NewHistoryEntry, PartStatus, Ticket, TicketPart, TicketStatus,
    TicketStatusHistory,
};
use bikeshop_entity::user::{CreateUser, Role, User};

use super::tracking::{generate_tracking_code, render_qr_png};
use crate::context::RequestContext;
use crate::notification::Notifier;

/// Password given to customers created at the reception desk.
const WALK_IN_PASSWORD: &str = "123456";
/// Attempts at finding an unused tracking code.
const TRACKING_CODE_ATTEMPTS: usize = 3;

/// History note on the first row of every ticket.
pub const CREATED_NOTE: &str = "created";
/// History note when an admin changes the assigned technician.
pub const REASSIGNED_NOTE: &str = "technician reassigned by administrator";

/// Outcome of a successful status change.
#[derive(Debug, Clone, Serialize)]
pub struct StatusChange {
    pub ticket_id: i64,
    pub from: TicketStatus,
    pub to: TicketStatus,
}

/// Everything the ticket detail page shows.
#[derive(Debug, Clone, Serialize)]
pub struct TicketDetail {
    pub ticket: Ticket,
    pub booking: Option<Booking>,
    pub customer: Option<User>,
    pub technician: Option<User>,
    pub bicycle: Option<BicycleDetails>,
    pub history: Vec<TicketStatusHistory>,
    pub parts: Vec<TicketPart>,
    pub quote: Option<Quote>,
    pub survey: Option<Survey>,
}

/// Reception-desk intake of a bicycle without a prior booking.
#[derive(Debug, Clone, Default)]
pub struct WalkInRequest {
    pub customer_name: String,
    pub customer_email: String,
    pub customer_phone: String,
    pub brand_name: String,
    pub model_name: String,
    pub color: String,
    pub serial_number: String,
    pub service_id: Option<i64>,
    pub notes: String,
}

#[derive(Debug, Clone)]
pub struct TicketService {
    tickets: Arc<TicketRepository>,
    bookings: Arc<BookingRepository>,
    users: Arc<UserRepository>,
    bicycles: Arc<BicycleRepository>,
    brands: Arc<BrandRepository>,
    quotes: Arc<QuoteRepository>,
    surveys: Arc<SurveyRepository>,
    hasher: Arc<PasswordHasher>,
    notifier: Arc<Notifier>,
    public_url: String,
}

impl TicketService {
    #[allow(clippy::too_many_arguments)]
    pub fn new(
        tickets: Arc<TicketRepository>,
        bookings: Arc<BookingRepository>,
        users: Arc<UserRepository>,
        bicycles: Arc<BicycleRepository>,
        brands: Arc<BrandRepository>,
        quotes: Arc<QuoteRepository>,
        surveys: Arc<SurveyRepository>,
        hasher: Arc<PasswordHasher>,
        notifier: Arc<Notifier>,
        public_url: impl Into<String>,
    ) -> Self {
        Self {
            tickets,
            bookings,
            users,
            bicycles,
            brands,
            quotes,
            surveys,
            hasher,
            notifier,
            public_url: public_url.into(),
        }
    }

    /// Public URL printed on the label for a tracking code.
    pub fn tracking_url(&self, code: &str) -> String {
        format!("{}/tracking/{code}", self.public_url.trim_end_matches('/'))
    }

    pub async fn get(&self, id: i64) -> AppResult<Ticket> {
        self.tickets
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Ticket {id} not found")))
    }

    pub async fn find_by_tracking_code(&self, code: &str) -> AppResult<Option<Ticket>> {
        self.tickets.find_by_tracking_code(code).await
    }

    pub async fn list(
        &self,
        filter: TicketFilter,
        page: PageRequest,
    ) -> AppResult<PageResponse<TicketSummary>> {
        self.tickets.list(filter, page).await
    }

    pub async fn list_for_customer(&self, customer_id: i64) -> AppResult<Vec<TicketSummary>> {
        self.tickets.list_by_customer(customer_id).await
    }

    /// Ticket count per status, in workflow order.
    pub async fn status_counts(&self) -> AppResult<Vec<(TicketStatus, i64)>> {
        let mut counts = Vec::with_capacity(TicketStatus::ALL.len());
        for status in TicketStatus::ALL {
            counts.push((status, self.tickets.count_by_status(status).await?));
        }
        Ok(counts)
    }

    pub async fn history(&self, ticket_id: i64) -> AppResult<Vec<TicketStatusHistory>> {
        self.tickets.list_history(ticket_id).await
    }

    /// Load a ticket with its booking, people, bicycle, history, parts,
    /// latest quote and survey.
    pub async fn detail(&self, id: i64) -> AppResult<TicketDetail> {
        let ticket = self.get(id).await?;
        let booking = self.bookings.find_by_id(ticket.booking_id).await?;

        let (customer, bicycle, quote) = match &booking {
            Some(b) => {
                let customer = self.users.find_by_id(b.customer_id).await?;
                let bicycle = match b.bicycle_id {
                    Some(bicycle_id) => self.bicycles.find_details(bicycle_id).await?,
                    None => None,
                };
                let quote = self.quotes.find_latest_by_booking(b.id).await?;
                (customer, bicycle, quote)
            }
            None => (None, None, None),
        };

        let technician = match ticket.technician_id {
            Some(tech_id) => self.users.find_by_id(tech_id).await?,
            None => None,
        };

        let history = self.tickets.list_history(ticket.id).await?;
        let parts = self.tickets.list_parts(ticket.id).await?;
        let survey = self.surveys.find_by_ticket(ticket.id).await?;

        Ok(TicketDetail {
            ticket,
            booking,
            customer,
            technician,
            bicycle,
            history,
            parts,
            quote,
            survey,
        })
    }

    /// Open a ticket for a booking, assigned to the acting technician.
    ///
    /// Confirms the booking as a side effect.
    pub async fn create_from_booking(
        &self,
        ctx: &RequestContext,
        booking_id: i64,
    ) -> AppResult<Ticket> {
        let booking = self
            .bookings
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Booking {booking_id} not found")))?;

        let ticket = self
            .open_ticket(booking.id, Some(ctx.user_id), String::new(), Some(ctx.user_id))
            .await?;

        self.bookings
            .update_status(booking.id, BookingStatus::Confirmed)
            .await?;

        info!(
            ticket_id = ticket.id,
            booking_id = booking.id,
            technician_id = ctx.user_id,
            "Ticket opened from booking"
        );
        Ok(ticket)
    }

    /// Register a walk-in: customer, bicycle, confirmed booking and an
    /// unassigned ticket, creating catalog entries as needed.
    pub async fn create_walk_in(&self, request: WalkInRequest) -> AppResult<Ticket> {
        let email = request.customer_email.trim();
        if email.is_empty() || request.customer_name.trim().is_empty() {
            return Err(AppError::validation("Customer name and email are required"));
        }

        let customer = match self.users.find_by_email(email).await? {
            Some(user) => user,
            None => {
                let password_hash = self.hasher.hash(WALK_IN_PASSWORD)?;
                self.users
                    .create(&CreateUser {
                        email: email.to_string(),
                        password_hash,
                        name: request.customer_name.trim().to_string(),
                        phone: request.customer_phone.trim().to_string(),
                        role: Role::Customer,
                    })
                    .await?
            }
        };

        let brand_name = request.brand_name.trim();
        let brand = if brand_name.is_empty() {
            None
        } else {
            match self.brands.find_by_name(brand_name).await? {
                Some(brand) => Some(brand),
                None => Some(self.brands.create(brand_name, "").await?),
            }
        };

        let model_name = request.model_name.trim();
        let model = match &brand {
            Some(brand) if !model_name.is_empty() => {
                match self.brands.find_model_by_name(brand.id, model_name).await? {
                    Some(model) => Some(model),
                    None => Some(self.brands.create_model(brand.id, model_name).await?),
                }
            }
            _ => None,
        };

        let bicycle = self
            .bicycles
            .create(&CreateBicycle {
                user_id: customer.id,
                brand_id: brand.as_ref().map(|b| b.id),
                model_id: model.as_ref().map(|m| m.id),
                color: request.color.trim().to_string(),
                serial_number: request.serial_number.trim().to_string(),
                notes: "created at reception".to_string(),
            })
            .await?;

        let booking = self
            .bookings
            .create(&CreateBooking {
                customer_id: customer.id,
                service_id: request.service_id,
                bicycle_id: Some(bicycle.id),
                scheduled_at: Utc::now(),
                status: BookingStatus::Confirmed,
                notes: request.notes.clone(),
            })
            .await?;

        let ticket = self
            .open_ticket(booking.id, None, request.notes, None)
            .await?;

        info!(
            ticket_id = ticket.id,
            customer_id = customer.id,
            "Walk-in ticket opened"
        );
        Ok(ticket)
    }

    /// Move a ticket to `next`.
    ///
    /// Technicians must be assigned to the ticket and follow the transition
    /// table. Admins may move any ticket anywhere. Checks run before any
    /// write; a rejected change leaves ticket and history untouched.
    pub async fn update_status(
        &self,
        ctx: &RequestContext,
        ticket_id: i64,
        next: TicketStatus,
        notes: &str,
    ) -> AppResult<StatusChange> {
        let ticket = self.get(ticket_id).await?;
        ensure_can_work(ctx, &ticket)?;

        let from = ticket.status;
        if !from.permits(ctx.role, next) {
            return Err(AppError::invalid_transition(format!(
                "Cannot move ticket {ticket_id} from {from} to {next}"
            )));
        }

        self.tickets.update_status(ticket.id, next).await?;
        self.record_history(ticket.id, next, Some(ctx.user_id), notes.trim())
            .await;

        info!(
            ticket_id,
            from = %from,
            to = %next,
            user_id = ctx.user_id,
            "Ticket status changed"
        );

        if next == TicketStatus::Ready && from != TicketStatus::Ready {
            self.announce_ready(&ticket).await;
        }

        Ok(StatusChange {
            ticket_id,
            from,
            to: next,
        })
    }

    /// Replace the ticket's working notes.
    pub async fn update_notes(
        &self,
        ctx: &RequestContext,
        ticket_id: i64,
        notes: &str,
    ) -> AppResult<()> {
        let ticket = self.get(ticket_id).await?;
        ensure_can_work(ctx, &ticket)?;
        self.tickets.update_notes(ticket.id, notes.trim()).await
    }

    /// Admin-only: hand the ticket to another technician. Status is kept
    /// and the change is recorded in history.
    pub async fn reassign(
        &self,
        ctx: &RequestContext,
        ticket_id: i64,
        technician_id: i64,
    ) -> AppResult<()> {
        if !ctx.is_admin() {
            return Err(AppError::authorization(
                "Only administrators can reassign tickets",
            ));
        }
        let ticket = self.get(ticket_id).await?;
        let technician = self
            .users
            .find_by_id(technician_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("User {technician_id} not found")))?;
        if !technician.role.is_staff() {
            return Err(AppError::validation(
                "Tickets can only be assigned to workshop staff",
            ));
        }

        self.tickets
            .assign_technician(ticket.id, technician.id)
            .await?;
        self.record_history(ticket.id, ticket.status, Some(ctx.user_id), REASSIGNED_NOTE)
            .await;

        info!(ticket_id, technician_id, "Ticket reassigned");
        Ok(())
    }

    /// Add a part to the checklist. A blank name adds nothing.
    pub async fn add_part(
        &self,
        ctx: &RequestContext,
        ticket_id: i64,
        name: &str,
    ) -> AppResult<Option<TicketPart>> {
        let ticket = self.get(ticket_id).await?;
        ensure_can_work(ctx, &ticket)?;
        let name = name.trim();
        if name.is_empty() {
            return Ok(None);
        }
        self.tickets.add_part(ticket.id, name).await.map(Some)
    }

    /// Flip a part between pending and done; returns the new state.
    pub async fn toggle_part(
        &self,
        ctx: &RequestContext,
        ticket_id: i64,
        part_id: i64,
    ) -> AppResult<PartStatus> {
        let part = self.part_on_ticket(ctx, ticket_id, part_id).await?;
        let next = part.status.toggled();
        self.tickets.set_part_status(part.id, next).await?;
        Ok(next)
    }

    pub async fn delete_part(
        &self,
        ctx: &RequestContext,
        ticket_id: i64,
        part_id: i64,
    ) -> AppResult<()> {
        let part = self.part_on_ticket(ctx, ticket_id, part_id).await?;
        self.tickets.delete_part(part.id).await
    }

    async fn part_on_ticket(
        &self,
        ctx: &RequestContext,
        ticket_id: i64,
        part_id: i64,
    ) -> AppResult<TicketPart> {
        let ticket = self.get(ticket_id).await?;
        ensure_can_work(ctx, &ticket)?;
        self.tickets
            .find_part(part_id)
            .await?
            .filter(|part| part.ticket_id == ticket.id)
            .ok_or_else(|| AppError::not_found(format!("Part {part_id} not found")))
    }

    async fn open_ticket(
        &self,
        booking_id: i64,
        technician_id: Option<i64>,
        notes: String,
        changed_by: Option<i64>,
    ) -> AppResult<Ticket> {
        let mut attempt = 0;
        let ticket = loop {
            attempt += 1;
            let tracking_code = generate_tracking_code();
            let qr_code = match render_qr_png(&self.tracking_url(&tracking_code)) {
                Ok(png) => Some(png),
                Err(e) => {
                    warn!(error = %e, "QR label generation failed");
                    None
                }
            };
            let data = CreateTicket {
                booking_id,
                technician_id,
                tracking_code,
                qr_code,
                notes: notes.clone(),
            };
            match self.tickets.create(&data).await {
                Ok(ticket) => break ticket,
                Err(e) if e.is(ErrorKind::Conflict) && attempt < TRACKING_CODE_ATTEMPTS => {
                    continue;
                }
                Err(e) => return Err(e),
            }
        };

        self.record_history(ticket.id, ticket.status, changed_by, CREATED_NOTE)
            .await;
        Ok(ticket)
    }

    async fn record_history(
        &self,
        ticket_id: i64,
        status: TicketStatus,
        changed_by: Option<i64>,
        notes: &str,
    ) {
        let entry = NewHistoryEntry {
            ticket_id,
            status,
            changed_by,
            notes: notes.to_string(),
        };
        if let Err(e) = self.tickets.append_history(&entry).await {
            warn!(
                ticket_id,
                status = %status,
                error = %e,
                "Ticket history append failed; status change kept"
            );
        }
    }

    async fn announce_ready(&self, ticket: &Ticket) {
        let customer = match self.bookings.find_by_id(ticket.booking_id).await {
            Ok(Some(booking)) => self.users.find_by_id(booking.customer_id).await,
            Ok(None) => Ok(None),
            Err(e) => Err(e),
        };
        match customer {
            Ok(Some(customer)) => {
                let url = self.tracking_url(&ticket.tracking_code);
                self.notifier.ticket_ready(&customer, ticket, &url).await;
            }
            Ok(None) => {}
            Err(e) => warn!(ticket_id = ticket.id, error = %e, "Could not load customer to notify"),
        }
    }
}

/// Admins may work any ticket; technicians only their own.
fn ensure_can_work(ctx: &RequestContext, ticket: &Ticket) -> AppResult<()> {
    match ctx.role {
        Role::Admin => Ok(()),
        Role::Technician if ticket.is_assigned_to(ctx.user_id) => Ok(()),
        Role::Technician => Err(AppError::authorization(format!(
            "Ticket {} is not assigned to you",
            ticket.id
        ))),
        Role::Customer => Err(AppError::authorization(
            "Customers cannot modify tickets",
        )),
    }
}
