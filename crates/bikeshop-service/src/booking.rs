//! Customer appointments, bicycles attached to them, and slot availability.

use std::sync::Arc;

use chrono::{DateTime, Duration, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use serde::Serialize;
use tracing::info;

use bikeshop_core::error::AppError;
use bikeshop_core::result::AppResult;
use bikeshop_database::repositories::booking::BookingSummary;
use bikeshop_database::repositories::{
    BicycleRepository, BookingRepository, QuoteRepository, ServiceRepository, TicketRepository,
};
use bikeshop_entity::booking::{Booking, BookingStatus, CreateBooking};
use bikeshop_entity::catalog::{BicycleDetails, CreateBicycle, ServiceOffering};
use bikeshop_entity::quote::Quote;
use bikeshop_entity::ticket::Ticket;

use crate::context::RequestContext;

/// Hourly appointment starts, lunch hour excluded.
pub const SLOTS: [&str; 8] = [
    "09:00", "10:00", "11:00", "12:00", "14:00", "15:00", "16:00", "17:00",
];

/// A bicycle registered while booking.
#[derive(Debug, Clone, Default)]
pub struct NewBicycle {
    pub brand_id: Option<i64>,
    pub model_id: Option<i64>,
    pub color: String,
    pub serial_number: String,
}

/// Booking form as submitted by a customer.
#[derive(Debug, Clone, Default)]
pub struct BookingRequest {
    pub service_id: Option<i64>,
    pub bicycle_id: Option<i64>,
    pub new_bicycle: Option<NewBicycle>,
    /// `YYYY-MM-DD`
    pub date: String,
    /// `HH:MM`
    pub time: String,
    pub notes: String,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingDetail {
    pub booking: Booking,
    pub service: Option<ServiceOffering>,
    pub bicycle: Option<BicycleDetails>,
    pub quote: Option<Quote>,
    pub ticket: Option<Ticket>,
}

#[derive(Debug, Clone)]
pub struct BookingService {
    bookings: Arc<BookingRepository>,
    bicycles: Arc<BicycleRepository>,
    services: Arc<ServiceRepository>,
    quotes: Arc<QuoteRepository>,
    tickets: Arc<TicketRepository>,
}

impl BookingService {
    pub fn new(
        bookings: Arc<BookingRepository>,
        bicycles: Arc<BicycleRepository>,
        services: Arc<ServiceRepository>,
        quotes: Arc<QuoteRepository>,
        tickets: Arc<TicketRepository>,
    ) -> Self {
        Self {
            bookings,
            bicycles,
            services,
            quotes,
            tickets,
        }
    }

    pub async fn get(&self, id: i64) -> AppResult<Booking> {
        self.bookings
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Booking {id} not found")))
    }

    /// The caller's bookings, newest first.
    pub async fn list_for(&self, ctx: &RequestContext) -> AppResult<Vec<BookingSummary>> {
        self.bookings.list_by_customer(ctx.user_id).await
    }

    /// At most `limit` of the caller's bookings.
    pub async fn recent_for(
        &self,
        ctx: &RequestContext,
        limit: usize,
    ) -> AppResult<Vec<BookingSummary>> {
        let mut bookings = self.bookings.list_by_customer(ctx.user_id).await?;
        bookings.truncate(limit);
        Ok(bookings)
    }

    /// Pending bookings awaiting a ticket, soonest first.
    pub async fn pending(&self, limit: i64) -> AppResult<Vec<BookingSummary>> {
        self.bookings
            .list_by_status(BookingStatus::Pending, limit)
            .await
    }

    pub async fn bicycles_for(&self, ctx: &RequestContext) -> AppResult<Vec<BicycleDetails>> {
        self.bicycles.list_by_user(ctx.user_id).await
    }

    /// Book an appointment for the caller, registering a new bicycle first
    /// if one was described.
    pub async fn create(&self, ctx: &RequestContext, request: BookingRequest) -> AppResult<Booking> {
        let scheduled_at = parse_schedule(&request.date, &request.time)?;

        let bicycle_id = match request.new_bicycle {
            Some(bike) => {
                let bicycle = self
                    .bicycles
                    .create(&CreateBicycle {
                        user_id: ctx.user_id,
                        brand_id: bike.brand_id,
                        model_id: bike.model_id,
                        color: bike.color.trim().to_string(),
                        serial_number: bike.serial_number.trim().to_string(),
                        notes: String::new(),
                    })
                    .await?;
                Some(bicycle.id)
            }
            None => match request.bicycle_id {
                Some(id) => {
                    self.owned_bicycle(ctx, id).await?;
                    Some(id)
                }
                None => None,
            },
        };

        let booking = self
            .bookings
            .create(&CreateBooking {
                customer_id: ctx.user_id,
                service_id: request.service_id,
                bicycle_id,
                scheduled_at,
                status: BookingStatus::Pending,
                notes: request.notes.trim().to_string(),
            })
            .await?;

        info!(
            booking_id = booking.id,
            customer_id = ctx.user_id,
            scheduled_at = %booking.scheduled_at,
            "Booking created"
        );
        Ok(booking)
    }

    /// A booking with its service, bicycle, latest quote and ticket.
    /// Customers may only open their own.
    pub async fn detail(&self, ctx: &RequestContext, id: i64) -> AppResult<BookingDetail> {
        let booking = self.get(id).await?;
        ensure_visible(ctx, &booking)?;

        let service = match booking.service_id {
            Some(service_id) => self.services.find_by_id(service_id).await?,
            None => None,
        };
        let bicycle = match booking.bicycle_id {
            Some(bicycle_id) => self.bicycles.find_details(bicycle_id).await?,
            None => None,
        };
        let quote = self.quotes.find_latest_by_booking(booking.id).await?;
        let ticket = self.tickets.find_by_booking(booking.id).await?;

        Ok(BookingDetail {
            booking,
            service,
            bicycle,
            quote,
            ticket,
        })
    }

    pub async fn cancel(&self, ctx: &RequestContext, id: i64) -> AppResult<()> {
        let booking = self.get(id).await?;
        ensure_visible(ctx, &booking)?;
        self.bookings
            .update_status(booking.id, BookingStatus::Cancelled)
            .await?;
        info!(booking_id = id, by = ctx.user_id, "Booking cancelled");
        Ok(())
    }

    /// Free slots on `date` (`YYYY-MM-DD`), in day order.
    pub async fn available_slots(&self, date: &str) -> AppResult<Vec<&'static str>> {
        let day = NaiveDate::parse_from_str(date.trim(), "%Y-%m-%d")
            .map_err(|_| AppError::validation(format!("Invalid date: '{date}'")))?;
        let start = day.and_time(NaiveTime::MIN).and_utc();
        let end = start + Duration::days(1);

        let taken: Vec<String> = self
            .bookings
            .list_scheduled_between(start, end)
            .await?
            .into_iter()
            .filter(|b| b.status.occupies_slot())
            .map(|b| b.scheduled_at.format("%H:%M").to_string())
            .collect();

        Ok(free_slots(&taken))
    }

    /// Workshop edit of a bicycle's descriptive fields.
    pub async fn update_bicycle(
        &self,
        id: i64,
        color: &str,
        serial_number: &str,
        notes: &str,
    ) -> AppResult<()> {
        let updated = self
            .bicycles
            .update(id, color.trim(), serial_number.trim(), notes.trim())
            .await?;
        if !updated {
            return Err(AppError::not_found(format!("Bicycle {id} not found")));
        }
        Ok(())
    }

    /// Register a bicycle for the booking's customer and attach it.
    pub async fn attach_new_bicycle(
        &self,
        booking_id: i64,
        color: &str,
        serial_number: &str,
        notes: &str,
    ) -> AppResult<i64> {
        let booking = self.get(booking_id).await?;
        let bicycle = self
            .bicycles
            .create(&CreateBicycle {
                user_id: booking.customer_id,
                brand_id: None,
                model_id: None,
                color: color.trim().to_string(),
                serial_number: serial_number.trim().to_string(),
                notes: notes.trim().to_string(),
            })
            .await?;
        self.bookings.set_bicycle(booking.id, bicycle.id).await?;
        Ok(bicycle.id)
    }

    async fn owned_bicycle(&self, ctx: &RequestContext, id: i64) -> AppResult<()> {
        match self.bicycles.find_by_id(id).await? {
            Some(bike) if bike.user_id == ctx.user_id => Ok(()),
            Some(_) => Err(AppError::authorization("That bicycle belongs to someone else")),
            None => Err(AppError::not_found(format!("Bicycle {id} not found"))),
        }
    }
}

/// Customers may only see their own bookings; staff see all.
fn ensure_visible(ctx: &RequestContext, booking: &Booking) -> AppResult<()> {
    if ctx.is_staff() || booking.customer_id == ctx.user_id {
        Ok(())
    } else {
        Err(AppError::authorization("This booking belongs to another customer"))
    }
}

/// Parse the booking form's date and time. The shop clock is UTC.
pub fn parse_schedule(date: &str, time: &str) -> AppResult<DateTime<Utc>> {
    let raw = format!("{} {}", date.trim(), time.trim());
    NaiveDateTime::parse_from_str(&raw, "%Y-%m-%d %H:%M")
        .map(|naive| naive.and_utc())
        .map_err(|_| AppError::validation("Invalid date or time"))
}

fn free_slots(taken: &[String]) -> Vec<&'static str> {
    SLOTS
        .into_iter()
        .filter(|slot| !taken.iter().any(|t| t == slot))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_schedule() {
        let at = parse_schedule("2026-03-14", "10:00").unwrap();
        assert_eq!(at.to_rfc3339(), "2026-03-14T10:00:00+00:00");
        assert!(parse_schedule("2026-03-14", "").is_err());
        assert!(parse_schedule("14/03/2026", "10:00").is_err());
    }

    #[test]
    fn test_free_slots_removes_taken() {
        let taken = vec!["10:00".to_string(), "15:00".to_string()];
        let free = free_slots(&taken);
        assert_eq!(free.len(), 6);
        assert!(!free.contains(&"10:00"));
        assert!(!free.contains(&"15:00"));
        assert_eq!(free[0], "09:00");
    }

    #[test]
    fn test_off_grid_booking_takes_no_slot() {
        let free = free_slots(&["10:30".to_string()]);
        assert_eq!(free.len(), SLOTS.len());
    }
}
