//! Customer-owned bicycles.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Bicycle {
    pub id: i64,
    pub user_id: i64,
    pub brand_id: Option<i64>,
    pub model_id: Option<i64>,
    pub color: String,
    pub serial_number: String,
    pub notes: String,
    pub created_at: DateTime<Utc>,
}

/// A bicycle joined with its brand and model names for display.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BicycleDetails {
    pub id: i64,
    pub user_id: i64,
    pub brand_name: Option<String>,
    pub model_name: Option<String>,
    pub color: String,
    pub serial_number: String,
    pub notes: String,
}

impl BicycleDetails {
    /// "Brand Model", skipping whatever is unknown.
    pub fn display_name(&self) -> String {
        let parts: Vec<&str> = [self.brand_name.as_deref(), self.model_name.as_deref()]
            .into_iter()
            .flatten()
            .filter(|s| !s.is_empty())
            .collect();
        if parts.is_empty() {
            "Bicycle".to_string()
        } else {
            parts.join(" ")
        }
    }
}

#[derive(Debug, Clone)]
pub struct CreateBicycle {
    pub user_id: i64,
    pub brand_id: Option<i64>,
    pub model_id: Option<i64>,
    pub color: String,
    pub serial_number: String,
    pub notes: String,
}
