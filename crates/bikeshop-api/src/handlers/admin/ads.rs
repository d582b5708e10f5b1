//! Ads shown on the public tracking page.

use axum::extract::{Path, Query, State};
use axum::response::{Html, Redirect};
use axum_extra::extract::Form;

use crate::dto::request::AdForm;
use crate::error::HttpResult;
use crate::extractors::{AuthUser, NoticeParams};
use crate::render::pages::admin::{AdRow, AdsPage};
use crate::render::render;
use crate::state::AppState;

/// GET /admin/ads
pub async fn list_ads(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(notice): Query<NoticeParams>,
) -> HttpResult<Html<String>> {
    let ads = state.ad_service.list().await?;
    render(&AdsPage {
        layout: state.layout("Ads", Some(auth.0)).with_flash(notice.into_flash()),
        ads: ads.into_iter().map(AdRow::new).collect(),
    })
}

/// POST /admin/ads
pub async fn create_ad(
    State(state): State<AppState>,
    Form(form): Form<AdForm>,
) -> HttpResult<Redirect> {
    state.ad_service.create(form.into_input()).await?;
    Ok(Redirect::to("/admin/ads?created=1"))
}

/// POST /admin/ads/{id}/update
///
/// The same form carries a toggle button that flips `active` and leaves
/// the other fields alone.
pub async fn update_ad(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    Form(form): Form<AdForm>,
) -> HttpResult<Redirect> {
    if form.is_toggle() {
        let active = state.ad_service.toggle(id).await?;
        tracing::debug!(ad_id = id, active, "Ad toggled");
    } else {
        state.ad_service.update(id, form.into_input()).await?;
    }
    Ok(Redirect::to("/admin/ads?saved=1"))
}

/// POST /admin/ads/{id}/delete
pub async fn delete_ad(State(state): State<AppState>, Path(id): Path<i64>) -> HttpResult<Redirect> {
    state.ad_service.delete(id).await?;
    Ok(Redirect::to("/admin/ads?saved=1"))
}
