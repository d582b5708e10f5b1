//! Admin user management.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::Form;

use bikeshop_core::error::{AppError, ErrorKind};

use crate::dto::request::{AdminUserForm, RoleQuery};
use crate::error::HttpResult;
use crate::extractors::{AuthUser, NoticeParams};
use crate::render::pages::admin::{UserFormPage, UsersPage, role_chips};
use crate::render::{Flash, render};
use crate::state::AppState;

/// GET /admin/users
pub async fn list_users(
    State(state): State<AppState>,
    auth: AuthUser,
    Query(query): Query<RoleQuery>,
    Query(notice): Query<NoticeParams>,
) -> HttpResult<Html<String>> {
    let role = query.role()?;
    let users = state.admin_user_service.list(role).await?;
    render(&UsersPage {
        layout: state.layout("Users", Some(auth.0)).with_flash(notice.into_flash()),
        chips: role_chips(role),
        users,
    })
}

/// GET /admin/users/new
pub async fn new_user(State(state): State<AppState>, auth: AuthUser) -> HttpResult<Html<String>> {
    render(&UserFormPage::blank(state.layout("New user", Some(auth.0))))
}

/// POST /admin/users/new
pub async fn create_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Form(form): Form<AdminUserForm>,
) -> HttpResult<Response> {
    let result = match form.clone().into_form() {
        Ok(input) => state.admin_user_service.create(&auth, input).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(_) => Ok(Redirect::to("/admin/users?created=1").into_response()),
        Err(e) => rerender(&state, auth, None, &form, e),
    }
}

/// GET /admin/users/{id}
pub async fn edit_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> HttpResult<Html<String>> {
    let user = state.admin_user_service.get(id).await?;
    render(&UserFormPage::edit(
        state.layout("Edit user", Some(auth.0)),
        &user,
    ))
}

/// POST /admin/users/{id}
pub async fn update_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
    Form(form): Form<AdminUserForm>,
) -> HttpResult<Response> {
    let result = match form.clone().into_form() {
        Ok(input) => state.admin_user_service.update(&auth, id, input).await,
        Err(e) => Err(e),
    };
    match result {
        Ok(_) => Ok(Redirect::to("/admin/users?saved=1").into_response()),
        Err(e) => rerender(&state, auth, Some(id), &form, e),
    }
}

/// POST /admin/users/{id}/delete
pub async fn delete_user(
    State(state): State<AppState>,
    auth: AuthUser,
    Path(id): Path<i64>,
) -> HttpResult<Redirect> {
    state.admin_user_service.delete(&auth, id).await?;
    Ok(Redirect::to("/admin/users?saved=1"))
}

/// Show the form again with the submitted values for input mistakes;
/// anything else becomes the usual error page.
fn rerender(
    state: &AppState,
    auth: AuthUser,
    id: Option<i64>,
    form: &AdminUserForm,
    err: AppError,
) -> HttpResult<Response> {
    let status = match err.kind {
        ErrorKind::Validation => StatusCode::BAD_REQUEST,
        ErrorKind::Conflict => StatusCode::CONFLICT,
        _ => return Err(err.into()),
    };
    let layout = state
        .layout("Users", Some(auth.0))
        .with_flash(Some(Flash::error(err.message)));
    let page = UserFormPage::new(layout, id, &form.name, &form.email, &form.phone, &form.role);
    Ok((status, render(&page)?).into_response())
}
