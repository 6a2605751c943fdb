//! Session-aware Axum extractors

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use axum::response::{IntoResponse, Redirect, Response};
use axum_extra::extract::CookieJar;

use super::error::ApiError;
use crate::auth::session_token;
use crate::state::AppState;
use crate::store::User;

/// Where anonymous visitors of protected pages are sent
pub const LOGIN_REQUIRED_REDIRECT: &str = "/login?notice=login_required";

async fn resolve(parts: &Parts, state: &AppState) -> Result<Option<User>, ApiError> {
    let jar = CookieJar::from_headers(&parts.headers);
    let Some(token) = session_token(&jar) else {
        return Ok(None);
    };
    state
        .sessions()
        .resolve(&token)
        .await
        .map_err(|e| ApiError::Internal {
            message: format!("session lookup failed: {e}"),
        })
}

/// Visitor identity, `None` when anonymous
pub struct MaybeUser(pub Option<User>);

impl FromRequestParts<AppState> for MaybeUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        Ok(Self(resolve(parts, state).await?))
    }
}

/// Logged-in user. Anonymous requests are redirected to the login page.
pub struct CurrentUser(pub User);

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = Response;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match resolve(parts, state).await {
            Ok(Some(user)) => Ok(Self(user)),
            Ok(None) => Err(Redirect::to(LOGIN_REQUIRED_REDIRECT).into_response()),
            Err(e) => Err(e.into_response()),
        }
    }
}

/// Administrator. Anyone else gets 403.
pub struct AdminUser(pub User);

impl FromRequestParts<AppState> for AdminUser {
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &AppState) -> Result<Self, Self::Rejection> {
        match resolve(parts, state).await? {
            Some(user) if user.is_admin => Ok(Self(user)),
            _ => Err(ApiError::Forbidden {
                reason: "administrator session required".to_owned(),
            }),
        }
    }
}
