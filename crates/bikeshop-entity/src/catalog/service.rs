//! Services offered by the workshop.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct ServiceOffering {
    pub id: i64,
    pub name: String,
    pub description: String,
    pub base_price: f64,
    pub estimated_hours: f64,
}

/// Editable fields of a service.
#[derive(Debug, Clone)]
pub struct ServiceInput {
    pub name: String,
    pub description: String,
    pub base_price: f64,
    pub estimated_hours: f64,
}
