//! Public pages: home, services and ad clicks.

use axum::extract::{Path, State};
use axum::response::{Html, Redirect};

use crate::error::HttpResult;
use crate::extractors::CurrentUser;
use crate::render::pages::public::{HomePage, ServicesPage};
use crate::render::render;
use crate::state::AppState;

/// GET /
pub async fn home(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> HttpResult<Html<String>> {
    let services = state.catalog_service.services().await?;
    let hero_concept = state.setting_service.hero_concept().await;
    render(&HomePage {
        layout: state.layout(state.config.business.name.clone(), user),
        hero_concept,
        tagline: state.config.business.tagline.clone(),
        services,
    })
}

/// GET /services
pub async fn services(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> HttpResult<Html<String>> {
    let services = state.catalog_service.services().await?;
    render(&ServicesPage {
        layout: state.layout("Services", user),
        services,
    })
}

/// GET /ads/{id}/click
pub async fn ad_click(
    State(state): State<AppState>,
    Path(id): Path<i64>,
) -> HttpResult<Redirect> {
    let link = state.ad_service.click(id).await?;
    if link.trim().is_empty() {
        return Ok(Redirect::to("/"));
    }
    Ok(Redirect::to(&link))
}
