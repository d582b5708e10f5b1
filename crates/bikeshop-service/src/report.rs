//! Back-office dashboard figures and reports.

use std::sync::Arc;

use chrono::{DateTime, Datelike, Duration, NaiveTime, Utc};
use serde::Serialize;

use bikeshop_core::result::AppResult;
use bikeshop_database::repositories::booking::BookingSummary;
use bikeshop_database::repositories::{
    BookingRepository, QuoteRepository, SurveyRepository, TicketRepository, UserRepository,
};
use bikeshop_entity::booking::BookingStatus;
use bikeshop_entity::quote::Quote;
use bikeshop_entity::survey::{Rating, Survey};
use bikeshop_entity::ticket::TicketStatus;
use bikeshop_entity::user::Role;

/// Window for the rolling rating average and the bookings report.
pub const REPORT_WINDOW_DAYS: i64 = 30;

#[derive(Debug, Clone, Serialize)]
pub struct AdminDashboard {
    pub user_count: i64,
    pub customer_count: i64,
    pub technician_count: i64,
    pub booking_count: i64,
    pub pending_bookings: i64,
    pub ticket_counts: Vec<(TicketStatus, i64)>,
    pub average_rating: Option<f64>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReportsOverview {
    pub monthly_bookings: usize,
    pub current_month: String,
    pub ticket_counts: Vec<(TicketStatus, i64)>,
    pub average_rating: Option<f64>,
    pub total_revenue: f64,
}

#[derive(Debug, Clone, Serialize)]
pub struct BookingsReport {
    pub from: DateTime<Utc>,
    pub to: DateTime<Utc>,
    pub bookings: Vec<BookingSummary>,
}

#[derive(Debug, Clone, Serialize)]
pub struct RevenueReport {
    pub quotes: Vec<Quote>,
    pub total_revenue: f64,
}

/// Rating distribution and response rate.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurveyStats {
    pub total: i64,
    /// Answers per star, index 0 is one star.
    pub distribution: [i64; 5],
    /// Rounded share per star, index 0 is one star.
    pub percentages: [i64; 5],
    /// Surveys per ready or delivered ticket, as a rounded percentage.
    pub response_rate: i64,
}

#[derive(Debug, Clone, Serialize)]
pub struct SurveyReport {
    pub surveys: Vec<Survey>,
    pub average_rating: Option<f64>,
    pub stats: SurveyStats,
}

#[derive(Debug, Clone)]
pub struct ReportService {
    users: Arc<UserRepository>,
    bookings: Arc<BookingRepository>,
    tickets: Arc<TicketRepository>,
    quotes: Arc<QuoteRepository>,
    surveys: Arc<SurveyRepository>,
}

impl ReportService {
    pub fn new(
        users: Arc<UserRepository>,
        bookings: Arc<BookingRepository>,
        tickets: Arc<TicketRepository>,
        quotes: Arc<QuoteRepository>,
        surveys: Arc<SurveyRepository>,
    ) -> Self {
        Self {
            users,
            bookings,
            tickets,
            quotes,
            surveys,
        }
    }

    pub async fn dashboard(&self) -> AppResult<AdminDashboard> {
        Ok(AdminDashboard {
            user_count: self.users.count().await?,
            customer_count: self.users.count_by_role(Role::Customer).await?,
            technician_count: self.users.count_by_role(Role::Technician).await?,
            booking_count: self.bookings.count().await?,
            pending_bookings: self.bookings.count_by_status(BookingStatus::Pending).await?,
            ticket_counts: self.ticket_counts().await?,
            average_rating: self.rolling_average().await?,
        })
    }

    pub async fn overview(&self) -> AppResult<ReportsOverview> {
        let now = Utc::now();
        let month_start = now
            .date_naive()
            .with_day(1)
            .unwrap_or_else(|| now.date_naive())
            .and_time(NaiveTime::MIN)
            .and_utc();
        let monthly = self
            .bookings
            .list_scheduled_between(month_start, now)
            .await?;

        Ok(ReportsOverview {
            monthly_bookings: monthly.len(),
            current_month: now.format("%B %Y").to_string(),
            ticket_counts: self.ticket_counts().await?,
            average_rating: self.rolling_average().await?,
            total_revenue: self.quotes.approved_revenue().await?,
        })
    }

    /// Bookings scheduled in `[from, to]`, by default the last thirty days.
    pub async fn bookings(
        &self,
        from: Option<DateTime<Utc>>,
        to: Option<DateTime<Utc>>,
    ) -> AppResult<BookingsReport> {
        let to = to.unwrap_or_else(Utc::now);
        let from = from.unwrap_or(to - Duration::days(REPORT_WINDOW_DAYS));
        let bookings = self.bookings.list_scheduled_between(from, to).await?;
        Ok(BookingsReport { from, to, bookings })
    }

    /// Revenue is the sum of approved quote totals.
    pub async fn revenue(&self) -> AppResult<RevenueReport> {
        let quotes = self.quotes.list_approved().await?;
        let total_revenue = Quote::sum_totals(&quotes);
        Ok(RevenueReport {
            quotes,
            total_revenue,
        })
    }

    pub async fn surveys(&self) -> AppResult<SurveyReport> {
        let surveys = self.surveys.list().await?;
        let counts = self.surveys.rating_counts().await?;
        let eligible = self.tickets.count_by_status(TicketStatus::Ready).await?
            + self.tickets.count_by_status(TicketStatus::Delivered).await?;

        Ok(SurveyReport {
            average_rating: self.rolling_average().await?,
            stats: survey_stats(&counts, eligible),
            surveys,
        })
    }

    async fn ticket_counts(&self) -> AppResult<Vec<(TicketStatus, i64)>> {
        let mut counts = Vec::with_capacity(TicketStatus::ALL.len());
        for status in TicketStatus::ALL {
            counts.push((status, self.tickets.count_by_status(status).await?));
        }
        Ok(counts)
    }

    async fn rolling_average(&self) -> AppResult<Option<f64>> {
        let since = Utc::now() - Duration::days(REPORT_WINDOW_DAYS);
        self.surveys.average_rating_since(since).await
    }
}

/// Compute survey statistics from `(rating, count)` pairs and the number of
/// tickets eligible for a survey.
///
/// With surveys on record but no eligible ticket left, the response rate
/// is 100.
pub fn survey_stats(counts: &[(i64, i64)], eligible_tickets: i64) -> SurveyStats {
    let mut distribution = [0i64; 5];
    for &(rating, count) in counts {
        if let Ok(rating) = Rating::new(rating) {
            distribution[(rating.value() - Rating::MIN) as usize] += count;
        }
    }
    let total: i64 = distribution.iter().sum();

    let mut percentages = [0i64; 5];
    if total > 0 {
        for (pct, count) in percentages.iter_mut().zip(distribution) {
            *pct = (count as f64 / total as f64 * 100.0).round() as i64;
        }
    }

    let response_rate = if eligible_tickets > 0 {
        (total as f64 / eligible_tickets as f64 * 100.0).round() as i64
    } else if total > 0 {
        100
    } else {
        0
    };

    SurveyStats {
        total,
        distribution,
        percentages,
        response_rate,
    }
}
