//! Bicycle brands and their models.

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Brand {
    pub id: i64,
    pub name: String,
    pub logo_url: String,
}

/// A model line belonging to one brand.
#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct BikeModel {
    pub id: i64,
    pub brand_id: i64,
    pub name: String,
}
