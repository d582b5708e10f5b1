//! Site settings.

use axum::extract::{Query, State};
use axum::response::{Html, Redirect};
use axum_extra::extract::Form;

use crate::dto::request::SettingsForm;
use crate::error::HttpResult;
use crate::extractors::{AuthUser, NoticeParams};
use crate::render::pages::admin::SettingsPage;
use crate::render::render;
use crate::state::AppState;

/// GET /admin/settings
pub async fn settings_page(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(notice): Query<NoticeParams>,
) -> HttpResult<Html<String>> {
    let hero_concept = state.setting_service.hero_concept().await;
    render(&SettingsPage {
        layout: state
            .layout("Settings", Some(auth.0))
            .with_flash(notice.into_flash()),
        hero_concept,
    })
}

/// POST /admin/settings
pub async fn save_settings(
    State(state): State<AppState>,
    Form(form): Form<SettingsForm>,
) -> HttpResult<Redirect> {
    state
        .setting_service
        .set_hero_concept(&form.hero_concept)
        .await?;
    Ok(Redirect::to("/admin/settings?saved=1"))
}
