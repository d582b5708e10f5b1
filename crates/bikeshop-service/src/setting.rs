//! Site settings edited from the back office.

use std::sync::Arc;

use tracing::info;

use bikeshop_core::result::AppResult;
use bikeshop_database::repositories::SettingRepository;
use bikeshop_entity::setting::{DEFAULT_HERO_CONCEPT, HERO_CONCEPT};

#[derive(Debug, Clone)]
pub struct SettingService {
    settings: Arc<SettingRepository>,
}

impl SettingService {
    pub fn new(settings: Arc<SettingRepository>) -> Self {
        Self { settings }
    }

    /// Image concept for the home page hero, falling back to the default
    /// when unset, blank, or unreadable.
    pub async fn hero_concept(&self) -> String {
        match self.settings.get(HERO_CONCEPT).await {
            Ok(Some(value)) if !value.trim().is_empty() => value,
            _ => DEFAULT_HERO_CONCEPT.to_string(),
        }
    }

    /// Store a new hero concept. A blank value leaves the setting alone.
    pub async fn set_hero_concept(&self, value: &str) -> AppResult<()> {
        let value = value.trim();
        if value.is_empty() {
            return Ok(());
        }
        self.settings.set(HERO_CONCEPT, value).await?;
        info!(value, "Hero concept updated");
        Ok(())
    }
}
