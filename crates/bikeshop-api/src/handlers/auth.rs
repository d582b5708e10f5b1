//! Auth handlers: sign in, registration, sign out.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum_extra::extract::Form;
use axum_extra::extract::cookie::CookieJar;

use bikeshop_core::error::{AppError, ErrorKind};
use bikeshop_service::RegisterRequest;

use crate::dto::request::{LoginForm, validate_form};
use crate::error::HttpResult;
use crate::extractors::auth::{removal_cookie, session_cookie};
use crate::extractors::{CurrentUser, NoticeParams};
use crate::render::pages::public::{LoginPage, RegisterPage};
use crate::render::{Flash, render};
use crate::state::AppState;

/// GET /login
pub async fn login_page(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    Query(notice): Query<NoticeParams>,
) -> HttpResult<Response> {
    if let Some(user) = user {
        return Ok(Redirect::to(user.role.home_path()).into_response());
    }
    let page = LoginPage {
        layout: state.layout("Sign in", None).with_flash(notice.into_flash()),
        email: String::new(),
    };
    Ok(render(&page)?.into_response())
}

/// POST /login
pub async fn login(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> HttpResult<Response> {
    let result = match validate_form(&form) {
        Ok(()) => state.user_service.login(&form.email, &form.password).await,
        Err(e) => Err(e),
    };

    match result {
        Ok((user, issued)) => {
            let jar = jar.add(session_cookie(&issued, state.config.debug));
            Ok((jar, Redirect::to(user.role.home_path())).into_response())
        }
        Err(e) if e.is(ErrorKind::Authentication) || e.is(ErrorKind::Validation) => {
            let status = if e.is(ErrorKind::Authentication) {
                StatusCode::UNAUTHORIZED
            } else {
                StatusCode::BAD_REQUEST
            };
            let page = LoginPage {
                layout: state
                    .layout("Sign in", None)
                    .with_flash(Some(Flash::error(e.message))),
                email: form.email,
            };
            Ok((status, render(&page)?).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

/// GET /register
pub async fn register_page(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> HttpResult<Response> {
    if let Some(user) = user {
        return Ok(Redirect::to(user.role.home_path()).into_response());
    }
    let page = render_register(&state, &RegisterRequest::default(), None)?;
    Ok(page.into_response())
}

/// POST /register
pub async fn register(
    State(state): State<AppState>,
    Form(form): Form<RegisterRequest>,
) -> HttpResult<Response> {
    match state.user_service.register(form.clone()).await {
        Ok(_) => Ok(Redirect::to("/login?registered=1").into_response()),
        Err(e) if e.is(ErrorKind::Validation) || e.is(ErrorKind::Conflict) => {
            let status = if e.is(ErrorKind::Conflict) {
                StatusCode::CONFLICT
            } else {
                StatusCode::BAD_REQUEST
            };
            let page = render_register(&state, &form, Some(e))?;
            Ok((status, page).into_response())
        }
        Err(e) => Err(e.into()),
    }
}

fn render_register(
    state: &AppState,
    form: &RegisterRequest,
    error: Option<AppError>,
) -> HttpResult<Html<String>> {
    render(&RegisterPage {
        layout: state
            .layout("Create an account", None)
            .with_flash(error.map(|e| Flash::error(e.message))),
        name: form.name.clone(),
        email: form.email.clone(),
        phone: form.phone.clone(),
        password_min_length: state.config.auth.password_min_length,
    })
}

/// GET|POST /logout
pub async fn logout(jar: CookieJar) -> (CookieJar, Redirect) {
    (jar.add(removal_cookie()), Redirect::to("/"))
}
