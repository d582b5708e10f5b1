//! Satisfaction surveys, one per finished ticket.

use std::sync::Arc;

use tracing::info;

use bikeshop_core::error::{AppError, ErrorKind};
use bikeshop_core::result::AppResult;
use bikeshop_database::repositories::{BookingRepository, SurveyRepository, TicketRepository};
use bikeshop_entity::survey::{Rating, Survey};
use bikeshop_entity::ticket::Ticket;

use crate::context::RequestContext;

#[derive(Debug, Clone)]
pub struct SurveyService {
    surveys: Arc<SurveyRepository>,
    tickets: Arc<TicketRepository>,
    bookings: Arc<BookingRepository>,
    enabled: bool,
}

impl SurveyService {
    pub fn new(
        surveys: Arc<SurveyRepository>,
        tickets: Arc<TicketRepository>,
        bookings: Arc<BookingRepository>,
        enabled: bool,
    ) -> Self {
        Self {
            surveys,
            tickets,
            bookings,
            enabled,
        }
    }

    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub async fn for_ticket(&self, ticket_id: i64) -> AppResult<Option<Survey>> {
        self.surveys.find_by_ticket(ticket_id).await
    }

    /// The ticket a signed-in customer is asked about, and any answer
    /// already given.
    pub async fn form(
        &self,
        ctx: &RequestContext,
        ticket_id: i64,
    ) -> AppResult<(Ticket, Option<Survey>)> {
        let ticket = self.owned_ticket(ctx, ticket_id).await?;
        let existing = self.surveys.find_by_ticket(ticket.id).await?;
        Ok((ticket, existing))
    }

    /// Answer the survey for one of the caller's tickets.
    pub async fn submit(
        &self,
        ctx: &RequestContext,
        ticket_id: i64,
        rating: i64,
        feedback: &str,
    ) -> AppResult<Survey> {
        let ticket = self.owned_ticket(ctx, ticket_id).await?;
        self.record(&ticket, rating, feedback).await
    }

    /// Answer from the public tracking page.
    ///
    /// Returns `None` when the ticket was already rated.
    pub async fn submit_by_tracking_code(
        &self,
        code: &str,
        rating: i64,
        feedback: &str,
    ) -> AppResult<Option<Survey>> {
        let ticket = self
            .tickets
            .find_by_tracking_code(code)
            .await?
            .ok_or_else(|| AppError::not_found("Tracking code not found"))?;

        match self.record(&ticket, rating, feedback).await {
            Ok(survey) => Ok(Some(survey)),
            Err(e) if e.is(ErrorKind::Conflict) => Ok(None),
            Err(e) => Err(e),
        }
    }

    async fn record(&self, ticket: &Ticket, rating: i64, feedback: &str) -> AppResult<Survey> {
        if !self.enabled {
            return Err(AppError::validation("Surveys are switched off"));
        }
        if !ticket.status.accepts_survey() {
            return Err(AppError::validation(format!(
                "Ticket {} cannot be rated while {}",
                ticket.id,
                ticket.status.label()
            )));
        }
        let rating = Rating::new(rating)?;
        let survey = self
            .surveys
            .create(ticket.id, rating, feedback.trim())
            .await?;
        info!(ticket_id = ticket.id, rating = rating.value(), "Survey received");
        Ok(survey)
    }

    async fn owned_ticket(&self, ctx: &RequestContext, ticket_id: i64) -> AppResult<Ticket> {
        let ticket = self
            .tickets
            .find_by_id(ticket_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Ticket {ticket_id} not found")))?;
        if ctx.is_staff() {
            return Ok(ticket);
        }
        let owner = self
            .bookings
            .find_by_id(ticket.booking_id)
            .await?
            .map(|b| b.customer_id);
        if owner != Some(ctx.user_id) {
            return Err(AppError::authorization("This ticket belongs to another customer"));
        }
        Ok(ticket)
    }
}
