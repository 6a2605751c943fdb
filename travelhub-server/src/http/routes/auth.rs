//! Login, logout and signup pages

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::{routing::get, Form, Router};
use axum_extra::extract::CookieJar;
use serde::Deserialize;

use crate::auth::session_token;
use crate::http::error::ApiError;
use crate::http::extractors::MaybeUser;
use crate::http::pages::{self, Flash};
use crate::services::{ServiceError, SignupForm};
use crate::state::AppState;

#[derive(Debug, Default, Deserialize)]
pub struct NoticeQuery {
    pub notice: Option<String>,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
}

fn notices(query: &NoticeQuery) -> Vec<Flash> {
    query
        .notice
        .as_deref()
        .and_then(pages::notice_text)
        .map(Flash::info)
        .into_iter()
        .collect()
}

fn login_page(status: StatusCode, flashes: &[Flash], username: &str) -> Response {
    let html = pages::layout("Log in", None, flashes, &pages::login_form(username));
    (status, Html(html)).into_response()
}

fn signup_page(status: StatusCode, flashes: &[Flash], form: &SignupForm) -> Response {
    let html = pages::layout(
        "Sign up",
        None,
        flashes,
        &pages::signup_form(&form.username, &form.nickname),
    );
    (status, Html(html)).into_response()
}

/// GET /login
async fn login_get(Query(query): Query<NoticeQuery>) -> Response {
    login_page(StatusCode::OK, &notices(&query), "")
}

/// POST /login - sets the session cookie and redirects home
async fn login_post(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<LoginForm>,
) -> Result<Response, ApiError> {
    let user = match state
        .accounts()
        .authenticate(&form.username, &form.password)
        .await
    {
        Ok(user) => user,
        Err(ServiceError::InvalidCredentials) => {
            let flash = Flash::error(ServiceError::InvalidCredentials.to_string());
            return Ok(login_page(
                StatusCode::UNAUTHORIZED,
                &[flash],
                &form.username,
            ));
        }
        Err(e) => return Err(e.into()),
    };

    let sessions = state.sessions();
    if let Err(e) = sessions.purge_expired().await {
        tracing::warn!(error = %e, "expired session purge failed");
    }
    let session = sessions.issue(user.id).await.map_err(ServiceError::from)?;

    Ok((jar.add(sessions.cookie(&session)), Redirect::to("/")).into_response())
}

/// GET /logout
async fn logout(State(state): State<AppState>, jar: CookieJar) -> Result<Response, ApiError> {
    let sessions = state.sessions();
    if let Some(token) = session_token(&jar) {
        sessions.revoke(&token).await.map_err(ServiceError::from)?;
    }
    Ok((jar.add(sessions.clear_cookie()), Redirect::to("/")).into_response())
}

/// GET /signup
async fn signup_get(MaybeUser(user): MaybeUser) -> Response {
    if user.is_some() {
        return Redirect::to("/profile").into_response();
    }
    signup_page(StatusCode::OK, &[], &SignupForm::default())
}

/// POST /signup - redirects to the login page on success
async fn signup_post(
    State(state): State<AppState>,
    Form(form): Form<SignupForm>,
) -> Result<Response, ApiError> {
    match state.accounts().signup(&form).await {
        Ok(_) => Ok(Redirect::to("/login?notice=registered").into_response()),
        Err(e @ ServiceError::Validation(_)) => Ok(signup_page(
            StatusCode::BAD_REQUEST,
            &[Flash::error(e.to_string())],
            &form,
        )),
        Err(e @ ServiceError::UsernameTaken) => Ok(signup_page(
            StatusCode::CONFLICT,
            &[Flash::error(e.to_string())],
            &form,
        )),
        Err(e) => Err(e.into()),
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/login", get(login_get).post(login_post))
        .route("/logout", get(logout))
        .route("/signup", get(signup_get).post(signup_post))
}
