//! Brands, models and the workshop service menu.

use std::sync::Arc;

use tracing::info;

use bikeshop_core::error::AppError;
use bikeshop_core::result::AppResult;
use bikeshop_database::repositories::catalog::ModelWithBrand;
use bikeshop_database::repositories::{BrandRepository, ServiceRepository};
use bikeshop_entity::catalog::{BikeModel, Brand, ServiceInput, ServiceOffering};

const SAMPLE_BRANDS: [&str; 5] = ["Trek", "Specialized", "Giant", "Cannondale", "Scott"];

/// (name, description, base price, estimated hours)
const SAMPLE_SERVICES: [(&str, &str, f64, f64); 8] = [
    ("General inspection", "Full check of every component", 2500.0, 1.5),
    ("Inner tube replacement", "New inner tube on either wheel", 800.0, 0.5),
    ("Brake adjustment", "Adjust and tune the brake system", 1200.0, 0.75),
    ("Chain replacement", "Replace a worn chain", 1500.0, 0.5),
    ("Full service", "Complete preventive maintenance", 5000.0, 3.0),
    ("Wheel truing", "Align the rim and tension the spokes", 1800.0, 1.0),
    ("Tyre replacement", "Fit new tyres", 1000.0, 0.5),
    ("Gear adjustment", "Tune the drivetrain shifting", 1500.0, 1.0),
];

#[derive(Debug, Clone)]
pub struct CatalogService {
    brands: Arc<BrandRepository>,
    services: Arc<ServiceRepository>,
}

impl CatalogService {
    pub fn new(brands: Arc<BrandRepository>, services: Arc<ServiceRepository>) -> Self {
        Self { brands, services }
    }

    // -- brands --

    pub async fn brands(&self) -> AppResult<Vec<Brand>> {
        self.brands.list().await
    }

    pub async fn brand(&self, id: i64) -> AppResult<Brand> {
        self.brands
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Brand {id} not found")))
    }

    pub async fn create_brand(&self, name: &str, logo_url: &str) -> AppResult<Brand> {
        let name = required("Brand name", name)?;
        self.brands.create(name, logo_url.trim()).await
    }

    pub async fn update_brand(&self, id: i64, name: &str, logo_url: &str) -> AppResult<()> {
        let name = required("Brand name", name)?;
        self.brand(id).await?;
        self.brands.update(id, name, logo_url.trim()).await
    }

    /// Deleting a brand removes its models.
    pub async fn delete_brand(&self, id: i64) -> AppResult<()> {
        self.brand(id).await?;
        self.brands.delete(id).await
    }

    // -- models --

    pub async fn models(&self) -> AppResult<Vec<ModelWithBrand>> {
        self.brands.list_models().await
    }

    pub async fn models_by_brand(&self, brand_id: i64) -> AppResult<Vec<BikeModel>> {
        self.brands.list_models_by_brand(brand_id).await
    }

    pub async fn model(&self, id: i64) -> AppResult<BikeModel> {
        self.brands
            .find_model(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Model {id} not found")))
    }

    pub async fn create_model(&self, brand_id: i64, name: &str) -> AppResult<BikeModel> {
        let name = required("Model name", name)?;
        self.brand(brand_id).await?;
        self.brands.create_model(brand_id, name).await
    }

    pub async fn update_model(&self, id: i64, brand_id: i64, name: &str) -> AppResult<()> {
        let name = required("Model name", name)?;
        self.model(id).await?;
        self.brand(brand_id).await?;
        self.brands.update_model(id, brand_id, name).await
    }

    pub async fn delete_model(&self, id: i64) -> AppResult<()> {
        self.model(id).await?;
        self.brands.delete_model(id).await
    }

    // -- services --

    pub async fn services(&self) -> AppResult<Vec<ServiceOffering>> {
        self.services.list().await
    }

    pub async fn service(&self, id: i64) -> AppResult<ServiceOffering> {
        self.services
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Service {id} not found")))
    }

    pub async fn create_service(&self, input: ServiceInput) -> AppResult<ServiceOffering> {
        validate_service(&input)?;
        self.services.create(&input).await
    }

    pub async fn update_service(&self, id: i64, input: ServiceInput) -> AppResult<()> {
        validate_service(&input)?;
        self.service(id).await?;
        self.services.update(id, &input).await
    }

    pub async fn delete_service(&self, id: i64) -> AppResult<()> {
        self.service(id).await?;
        self.services.delete(id).await
    }

    /// Fill an empty catalog with sample brands and services.
    pub async fn seed_sample_data(&self) -> AppResult<()> {
        if self.brands.count().await? == 0 {
            for name in SAMPLE_BRANDS {
                self.brands.create(name, "").await?;
            }
        }
        if self.services.count().await? == 0 {
            for (name, description, base_price, estimated_hours) in SAMPLE_SERVICES {
                self.services
                    .create(&ServiceInput {
                        name: name.to_string(),
                        description: description.to_string(),
                        base_price,
                        estimated_hours,
                    })
                    .await?;
            }
        }
        info!(
            brands = SAMPLE_BRANDS.len(),
            services = SAMPLE_SERVICES.len(),
            "Sample catalog seeded"
        );
        Ok(())
    }
}

fn required<'a>(field: &str, value: &'a str) -> AppResult<&'a str> {
    let value = value.trim();
    if value.is_empty() {
        Err(AppError::validation(format!("{field} is required")))
    } else {
        Ok(value)
    }
}

fn validate_service(input: &ServiceInput) -> AppResult<()> {
    required("Service name", &input.name)?;
    if input.base_price < 0.0 || input.estimated_hours < 0.0 {
        return Err(AppError::validation("Price and hours cannot be negative"));
    }
    Ok(())
}
