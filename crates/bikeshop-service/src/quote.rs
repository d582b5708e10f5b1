//! Itemised estimates and the customer's decision on them.

use std::sync::Arc;

use chrono::{Duration, Utc};
use tracing::{info, warn};

use bikeshop_core::error::AppError;
use bikeshop_core::result::AppResult;
use bikeshop_database::repositories::{BookingRepository, QuoteRepository, TicketRepository};
use bikeshop_entity::booking::Booking;
use bikeshop_entity::quote::{CreateQuote, Quote, QuoteItem, QuoteStatus};

use crate::context::RequestContext;
use crate::payment::PaymentProvider;

/// Days a new quote stays valid.
pub const QUOTE_VALIDITY_DAYS: i64 = 7;
const CURRENCY: &str = "ars";

#[derive(Clone)]
pub struct QuoteService {
    quotes: Arc<QuoteRepository>,
    bookings: Arc<BookingRepository>,
    tickets: Arc<TicketRepository>,
    payments: Option<Arc<dyn PaymentProvider>>,
}

impl QuoteService {
    /// `payments` is `None` when payment collection is switched off.
    pub fn new(
        quotes: Arc<QuoteRepository>,
        bookings: Arc<BookingRepository>,
        tickets: Arc<TicketRepository>,
        payments: Option<Arc<dyn PaymentProvider>>,
    ) -> Self {
        Self {
            quotes,
            bookings,
            tickets,
            payments,
        }
    }

    pub async fn get(&self, id: i64) -> AppResult<Quote> {
        self.quotes
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Quote {id} not found")))
    }

    /// Quotes on the caller's bookings.
    pub async fn list_for(&self, ctx: &RequestContext) -> AppResult<Vec<Quote>> {
        self.quotes.list_by_customer(ctx.user_id).await
    }

    /// A quote the caller may see, with its booking.
    pub async fn visible(&self, ctx: &RequestContext, id: i64) -> AppResult<(Quote, Booking)> {
        let quote = self.get(id).await?;
        let booking = self.booking_of(&quote).await?;
        if !ctx.is_staff() && booking.customer_id != ctx.user_id {
            return Err(AppError::authorization("This quote belongs to another customer"));
        }
        Ok((quote, booking))
    }

    pub async fn latest_for_booking(&self, booking_id: i64) -> AppResult<Option<Quote>> {
        self.quotes.find_latest_by_booking(booking_id).await
    }

    /// Draft a pending quote on a booking, valid for a week.
    ///
    /// Lines with a blank description are ignored; at least one must remain.
    pub async fn create(&self, booking_id: i64, items: Vec<QuoteItem>) -> AppResult<Quote> {
        self.bookings
            .find_by_id(booking_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Booking {booking_id} not found")))?;

        let items: Vec<QuoteItem> = items
            .into_iter()
            .filter(|item| !item.description.trim().is_empty())
            .collect();
        if items.is_empty() {
            return Err(AppError::validation("A quote needs at least one item"));
        }
        if items.iter().any(|i| i.quantity < 0 || i.unit_price < 0.0) {
            return Err(AppError::validation("Quantities and prices cannot be negative"));
        }

        let quote = self
            .quotes
            .create(&CreateQuote {
                booking_id,
                items,
                valid_until: Utc::now() + Duration::days(QUOTE_VALIDITY_DAYS),
            })
            .await?;

        info!(quote_id = quote.id, booking_id, total = quote.total, "Quote created");
        Ok(quote)
    }

    pub async fn approve(&self, ctx: &RequestContext, id: i64) -> AppResult<Quote> {
        let (quote, _) = self.visible(ctx, id).await?;
        self.decide(quote, QuoteStatus::Approved, "").await
    }

    pub async fn reject(&self, ctx: &RequestContext, id: i64, reason: &str) -> AppResult<Quote> {
        let (quote, _) = self.visible(ctx, id).await?;
        self.decide(quote, QuoteStatus::Rejected, reason.trim()).await
    }

    /// Approval from the public tracking page. The tracking code proves the
    /// visitor holds the ticket for the quote's booking.
    pub async fn approve_with_tracking_code(&self, id: i64, code: &str) -> AppResult<Quote> {
        let quote = self.get(id).await?;
        let ticket = self
            .tickets
            .find_by_tracking_code(code)
            .await?
            .filter(|t| t.booking_id == quote.booking_id)
            .ok_or_else(|| AppError::not_found(format!("Quote {id} not found")))?;
        info!(quote_id = id, ticket_id = ticket.id, "Quote approved from tracking page");
        self.decide(quote, QuoteStatus::Approved, "").await
    }

    async fn decide(&self, quote: Quote, status: QuoteStatus, reason: &str) -> AppResult<Quote> {
        if !quote.is_pending() {
            return Err(AppError::conflict(format!(
                "Quote {} is already {}",
                quote.id,
                quote.status.as_str()
            )));
        }
        self.quotes.update_status(quote.id, status, reason).await?;
        info!(quote_id = quote.id, status = status.as_str(), "Quote decided");

        if status == QuoteStatus::Approved {
            self.open_payment(&quote).await;
        }

        Ok(Quote {
            status,
            rejection_reason: reason.to_string(),
            ..quote
        })
    }

    async fn open_payment(&self, quote: &Quote) {
        let Some(provider) = &self.payments else {
            return;
        };
        let amount = (quote.total * 100.0).round() as i64;
        let description = format!("Quote #{}", quote.id);
        match provider.create_intent(amount, CURRENCY, &description).await {
            Ok(intent) => info!(quote_id = quote.id, intent_id = %intent.id, "Payment intent created"),
            Err(e) => warn!(quote_id = quote.id, error = %e, "Payment intent failed"),
        }
    }

    async fn booking_of(&self, quote: &Quote) -> AppResult<Booking> {
        self.bookings
            .find_by_id(quote.booking_id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Booking {} not found", quote.booking_id)))
    }
}

impl std::fmt::Debug for QuoteService {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QuoteService")
            .field("payments", &self.payments.is_some())
            .finish()
    }
}
