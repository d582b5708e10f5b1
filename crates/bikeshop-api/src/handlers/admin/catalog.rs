//! Brands, bicycle models and workshop services.

use axum::extract::{Path, Query, State};
use axum::response::{Html, Redirect};
use axum_extra::extract::Form;

use crate::dto::request::{BrandForm, ModelForm, ServiceForm};
use crate::error::HttpResult;
use crate::extractors::{AuthUser, NoticeParams};
use crate::render::pages::admin::{
    BrandFormPage, BrandsPage, ModelFormPage, ModelsPage, ServiceFormPage, ServicesPage,
    catalog_tabs,
};
use crate::render::render;
use crate::state::AppState;

// ── Brands ───────────────────────────────────────────────────

/// GET /admin/brands
pub async fn brands(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(notice): Query<NoticeParams>,
) -> HttpResult<Html<String>> {
    let brands = state.catalog_service.brands().await?;
    render(&BrandsPage {
        layout: state.layout("Brands", Some(auth.0)).with_flash(notice.into_flash()),
        tabs: catalog_tabs("/admin/brands"),
        brands,
    })
}

/// GET /admin/brands/new
pub async fn new_brand(State(state): State<AppState>, auth: AuthUser) -> HttpResult<Html<String>> {
    render(&BrandFormPage::new(state.layout("New brand", Some(auth.0)), None))
}

/// POST /admin/brands/new
pub async fn create_brand(
    State(state): State<AppState>,
    Form(form): Form<BrandForm>,
) -> HttpResult<Redirect> {
    state
        .catalog_service
        .create_brand(&form.name, &form.logo_url)
        .await?;
    Ok(Redirect::to("/admin/brands?created=1"))
}

/// GET /admin/brands/{id}
pub async fn edit_brand(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> HttpResult<Html<String>> {
    let brand = state.catalog_service.brand(id).await?;
    render(&BrandFormPage::new(
        state.layout("Edit brand", Some(auth.0)),
        Some(brand),
    ))
}

/// POST /admin/brands/{id}
pub async fn update_brand(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<BrandForm>,
) -> HttpResult<Redirect> {
    state
        .catalog_service
        .update_brand(id, &form.name, &form.logo_url)
        .await?;
    Ok(Redirect::to("/admin/brands?saved=1"))
}

/// POST /admin/brands/{id}/delete
pub async fn delete_brand(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> HttpResult<Redirect> {
    state.catalog_service.delete_brand(id).await?;
    Ok(Redirect::to("/admin/brands?saved=1"))
}

// ── Models ───────────────────────────────────────────────────

/// GET /admin/models
pub async fn models(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(notice): Query<NoticeParams>,
) -> HttpResult<Html<String>> {
    let models = state.catalog_service.models().await?;
    render(&ModelsPage {
        layout: state.layout("Models", Some(auth.0)).with_flash(notice.into_flash()),
        tabs: catalog_tabs("/admin/models"),
        models,
    })
}

/// GET /admin/models/new
pub async fn new_model(State(state): State<AppState>, auth: AuthUser) -> HttpResult<Html<String>> {
    let brands = state.catalog_service.brands().await?;
    render(&ModelFormPage::new(
        state.layout("New model", Some(auth.0)),
        None,
        &brands,
    ))
}

/// POST /admin/models/new
pub async fn create_model(
    State(state): State<AppState>,
    Form(form): Form<ModelForm>,
) -> HttpResult<Redirect> {
    state
        .catalog_service
        .create_model(form.brand_id, &form.name)
        .await?;
    Ok(Redirect::to("/admin/models?created=1"))
}

/// GET /admin/models/{id}
pub async fn edit_model(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> HttpResult<Html<String>> {
    let model = state.catalog_service.model(id).await?;
    let brands = state.catalog_service.brands().await?;
    render(&ModelFormPage::new(
        state.layout("Edit model", Some(auth.0)),
        Some(model),
        &brands,
    ))
}

/// POST /admin/models/{id}
pub async fn update_model(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<ModelForm>,
) -> HttpResult<Redirect> {
    state
        .catalog_service
        .update_model(id, form.brand_id, &form.name)
        .await?;
    Ok(Redirect::to("/admin/models?saved=1"))
}

/// POST /admin/models/{id}/delete
pub async fn delete_model(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> HttpResult<Redirect> {
    state.catalog_service.delete_model(id).await?;
    Ok(Redirect::to("/admin/models?saved=1"))
}

// ── Services ─────────────────────────────────────────────────

/// GET /admin/services
pub async fn services(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(notice): Query<NoticeParams>,
) -> HttpResult<Html<String>> {
    let services = state.catalog_service.services().await?;
    render(&ServicesPage {
        layout: state
            .layout("Services", Some(auth.0))
            .with_flash(notice.into_flash()),
        tabs: catalog_tabs("/admin/services"),
        services,
    })
}

/// GET /admin/services/new
pub async fn new_service(
    State(state): State<AppState>,
    auth: AuthUser,
) -> HttpResult<Html<String>> {
    render(&ServiceFormPage::new(
        state.layout("New service", Some(auth.0)),
        None,
    ))
}

/// POST /admin/services/new
pub async fn create_service(
    State(state): State<AppState>,
    Form(form): Form<ServiceForm>,
) -> HttpResult<Redirect> {
    state
        .catalog_service
        .create_service(form.into_input()?)
        .await?;
    Ok(Redirect::to("/admin/services?created=1"))
}

/// GET /admin/services/{id}
pub async fn edit_service(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> HttpResult<Html<String>> {
    let service = state.catalog_service.service(id).await?;
    render(&ServiceFormPage::new(
        state.layout("Edit service", Some(auth.0)),
        Some(service),
    ))
}

/// POST /admin/services/{id}
pub async fn update_service(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<ServiceForm>,
) -> HttpResult<Redirect> {
    state
        .catalog_service
        .update_service(id, form.into_input()?)
        .await?;
    Ok(Redirect::to("/admin/services?saved=1"))
}

/// POST /admin/services/{id}/delete
pub async fn delete_service(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> HttpResult<Redirect> {
    state.catalog_service.delete_service(id).await?;
    Ok(Redirect::to("/admin/services?saved=1"))
}
