//! Key/value site settings editable from the back office.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Setting key for the hero image concept on the home page.
pub const HERO_CONCEPT: &str = "hero_concept";
/// Value used when `hero_concept` was never set.
pub const DEFAULT_HERO_CONCEPT: &str = "bicycle workshop";

#[derive(Debug, Clone, Serialize, Deserialize, FromRow)]
pub struct Setting {
    pub key: String,
    pub value: String,
    pub updated_at: DateTime<Utc>,
}
