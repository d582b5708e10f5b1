//! Quote entity model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;
use sqlx::types::Json;

/// Customer decision on a quote.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, sqlx::Type)]
#[sqlx(rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum QuoteStatus {
    Pending,
    Approved,
    Rejected,
}

impl QuoteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Approved => "approved",
            Self::Rejected => "rejected",
        }
    }
}

/// One line of a quote.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuoteItem {
    pub description: String,
    pub quantity: i64,
    pub unit_price: f64,
    /// `quantity * unit_price`.
    pub total: f64,
}

impl QuoteItem {
    pub fn new(description: impl Into<String>, quantity: i64, unit_price: f64) -> Self {
        Self {
            description: description.into(),
            quantity,
            unit_price,
            total: quantity as f64 * unit_price,
        }
    }
}

/// An estimate attached to a booking.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Quote {
    pub id: i64,
    pub booking_id: i64,
    /// Line items, stored as a JSON array.
    pub items: Json<Vec<QuoteItem>>,
    pub total: f64,
    pub status: QuoteStatus,
    pub rejection_reason: String,
    pub valid_until: DateTime<Utc>,
    pub created_at: DateTime<Utc>,
}

impl Quote {
    /// Sum of the line totals.
    pub fn sum(items: &[QuoteItem]) -> f64 {
        items.iter().map(|item| item.total).sum()
    }

    /// Sum of the quote totals.
    pub fn sum_totals(quotes: &[Quote]) -> f64 {
        quotes.iter().map(|quote| quote.total).sum()
    }

    pub fn is_pending(&self) -> bool {
        self.status == QuoteStatus::Pending
    }
}

/// Data required to create a quote.
#[derive(Debug, Clone)]
pub struct CreateQuote {
    pub booking_id: i64,
    pub items: Vec<QuoteItem>,
    pub valid_until: DateTime<Utc>,
}
