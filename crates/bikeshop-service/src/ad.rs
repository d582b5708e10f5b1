//! Banner ads shown on the public tracking page.

use std::sync::Arc;

use tracing::{debug, info};

use bikeshop_core::error::AppError;
use bikeshop_core::result::AppResult;
use bikeshop_database::repositories::AdRepository;
use bikeshop_entity::ad::{Ad, AdInput};

#[derive(Debug, Clone)]
pub struct AdService {
    ads: Arc<AdRepository>,
}

impl AdService {
    pub fn new(ads: Arc<AdRepository>) -> Self {
        Self { ads }
    }

    pub async fn list(&self) -> AppResult<Vec<Ad>> {
        self.ads.list().await
    }

    pub async fn get(&self, id: i64) -> AppResult<Ad> {
        self.ads
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Ad {id} not found")))
    }

    pub async fn create(&self, input: AdInput) -> AppResult<Ad> {
        validate(&input)?;
        let ad = self.ads.create(&input).await?;
        info!(ad_id = ad.id, "Ad created");
        Ok(ad)
    }

    pub async fn update(&self, id: i64, input: AdInput) -> AppResult<()> {
        validate(&input)?;
        self.get(id).await?;
        self.ads.update(id, &input).await
    }

    /// Flip the active flag; returns the new value.
    pub async fn toggle(&self, id: i64) -> AppResult<bool> {
        let ad = self.get(id).await?;
        let active = !ad.active;
        self.ads.set_active(id, active).await?;
        Ok(active)
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        self.get(id).await?;
        self.ads.delete(id).await
    }

    /// Pick a random active ad and count the impression in the background.
    ///
    /// Lookup failures yield no ad; the page renders without one.
    pub async fn pick_for_display(&self) -> Option<Ad> {
        let ad = match self.ads.random_active().await {
            Ok(ad) => ad?,
            Err(e) => {
                debug!(error = %e, "Ad lookup failed");
                return None;
            }
        };

        let ads = Arc::clone(&self.ads);
        let id = ad.id;
        tokio::spawn(async move {
            if let Err(e) = ads.increment_impressions(id).await {
                debug!(ad_id = id, error = %e, "Impression count dropped");
            }
        });
        Some(ad)
    }

    /// Count a click in the background and return where to send the visitor.
    pub async fn click(&self, id: i64) -> AppResult<String> {
        let ad = self.get(id).await?;

        let ads = Arc::clone(&self.ads);
        tokio::spawn(async move {
            if let Err(e) = ads.increment_clicks(id).await {
                debug!(ad_id = id, error = %e, "Click count dropped");
            }
        });

        Ok(if ad.link_url.trim().is_empty() {
            "/".to_string()
        } else {
            ad.link_url
        })
    }
}

fn validate(input: &AdInput) -> AppResult<()> {
    if input.title.trim().is_empty() || input.media_url.trim().is_empty() {
        return Err(AppError::validation("Title and media URL are required"));
    }
    Ok(())
}
