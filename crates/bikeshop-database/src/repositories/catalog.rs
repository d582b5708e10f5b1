//! Brand, model and service repositories.

use sqlx::SqlitePool;

use bikeshop_core::result::AppResult;
use bikeshop_entity::catalog::{BikeModel, Brand, ServiceInput, ServiceOffering};

use super::db_error;

/// A model row joined with its brand name, for the admin listing.
#[derive(Debug, Clone, sqlx::FromRow, serde::Serialize)]
pub struct ModelWithBrand {
    pub id: i64,
    pub brand_id: i64,
    pub name: String,
    pub brand_name: String,
}

/// Repository for brands and the models under them.
#[derive(Debug, Clone)]
pub struct BrandRepository {
    pool: SqlitePool,
}

impl BrandRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> AppResult<Vec<Brand>> {
        sqlx::query_as::<_, Brand>("SELECT * FROM brands ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list brands"))
    }

    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<Brand>> {
        sqlx::query_as::<_, Brand>("SELECT * FROM brands WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find brand"))
    }

    /// Case-insensitive lookup used by the walk-in form.
    pub async fn find_by_name(&self, name: &str) -> AppResult<Option<Brand>> {
        sqlx::query_as::<_, Brand>("SELECT * FROM brands WHERE LOWER(name) = LOWER(?) LIMIT 1")
            .bind(name.trim())
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find brand by name"))
    }

    pub async fn count(&self) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM brands")
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to count brands"))
    }

    pub async fn create(&self, name: &str, logo_url: &str) -> AppResult<Brand> {
        sqlx::query_as::<_, Brand>("INSERT INTO brands (name, logo_url) VALUES (?, ?) RETURNING *")
            .bind(name.trim())
            .bind(logo_url)
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to create brand"))
    }

    pub async fn update(&self, id: i64, name: &str, logo_url: &str) -> AppResult<()> {
        sqlx::query("UPDATE brands SET name = ?, logo_url = ? WHERE id = ?")
            .bind(name.trim())
            .bind(logo_url)
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to update brand"))?;
        Ok(())
    }

    /// Delete a brand and, by cascade, its models.
    pub async fn delete(&self, id: i64) -> AppResult<()> {
        sqlx::query("DELETE FROM brands WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete brand"))?;
        Ok(())
    }

    pub async fn list_models(&self) -> AppResult<Vec<ModelWithBrand>> {
        sqlx::query_as::<_, ModelWithBrand>(
            "SELECT m.id, m.brand_id, m.name, b.name AS brand_name
             FROM models m JOIN brands b ON b.id = m.brand_id
             ORDER BY b.name, m.name",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list models"))
    }

    pub async fn list_models_by_brand(&self, brand_id: i64) -> AppResult<Vec<BikeModel>> {
        sqlx::query_as::<_, BikeModel>("SELECT * FROM models WHERE brand_id = ? ORDER BY name")
            .bind(brand_id)
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list models by brand"))
    }

    pub async fn find_model(&self, id: i64) -> AppResult<Option<BikeModel>> {
        sqlx::query_as::<_, BikeModel>("SELECT * FROM models WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find model"))
    }

    /// Case-insensitive lookup of a model within one brand.
    pub async fn find_model_by_name(
        &self,
        brand_id: i64,
        name: &str,
    ) -> AppResult<Option<BikeModel>> {
        sqlx::query_as::<_, BikeModel>(
            "SELECT * FROM models WHERE brand_id = ? AND LOWER(name) = LOWER(?) LIMIT 1",
        )
        .bind(brand_id)
        .bind(name.trim())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to find model by name"))
    }

    pub async fn create_model(&self, brand_id: i64, name: &str) -> AppResult<BikeModel> {
        sqlx::query_as::<_, BikeModel>(
            "INSERT INTO models (brand_id, name) VALUES (?, ?) RETURNING *",
        )
        .bind(brand_id)
        .bind(name.trim())
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to create model"))
    }

    pub async fn update_model(&self, id: i64, brand_id: i64, name: &str) -> AppResult<()> {
        sqlx::query("UPDATE models SET brand_id = ?, name = ? WHERE id = ?")
            .bind(brand_id)
            .bind(name.trim())
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to update model"))?;
        Ok(())
    }

    pub async fn delete_model(&self, id: i64) -> AppResult<()> {
        sqlx::query("DELETE FROM models WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete model"))?;
        Ok(())
    }
}

/// Repository for workshop services.
#[derive(Debug, Clone)]
pub struct ServiceRepository {
    pool: SqlitePool,
}

impl ServiceRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    pub async fn list(&self) -> AppResult<Vec<ServiceOffering>> {
        sqlx::query_as::<_, ServiceOffering>("SELECT * FROM services ORDER BY name")
            .fetch_all(&self.pool)
            .await
            .map_err(db_error("Failed to list services"))
    }

    pub async fn find_by_id(&self, id: i64) -> AppResult<Option<ServiceOffering>> {
        sqlx::query_as::<_, ServiceOffering>("SELECT * FROM services WHERE id = ?")
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(db_error("Failed to find service"))
    }

    pub async fn count(&self) -> AppResult<i64> {
        sqlx::query_scalar("SELECT COUNT(*) FROM services")
            .fetch_one(&self.pool)
            .await
            .map_err(db_error("Failed to count services"))
    }

    pub async fn create(&self, input: &ServiceInput) -> AppResult<ServiceOffering> {
        sqlx::query_as::<_, ServiceOffering>(
            "INSERT INTO services (name, description, base_price, estimated_hours)
             VALUES (?, ?, ?, ?) RETURNING *",
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.base_price)
        .bind(input.estimated_hours)
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to create service"))
    }

    pub async fn update(&self, id: i64, input: &ServiceInput) -> AppResult<()> {
        sqlx::query(
            "UPDATE services SET name = ?, description = ?, base_price = ?, estimated_hours = ?
             WHERE id = ?",
        )
        .bind(&input.name)
        .bind(&input.description)
        .bind(input.base_price)
        .bind(input.estimated_hours)
        .bind(id)
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to update service"))?;
        Ok(())
    }

    pub async fn delete(&self, id: i64) -> AppResult<()> {
        sqlx::query("DELETE FROM services WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await
            .map_err(db_error("Failed to delete service"))?;
        Ok(())
    }
}
