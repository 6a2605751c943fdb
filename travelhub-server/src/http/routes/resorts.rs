//! Resort detail page and follow-up reviews

use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::{routing::get, Form, Router};

use travelhub_core::models::ReviewInput;

use crate::http::error::ApiError;
use crate::http::extractors::{CurrentUser, MaybeUser};
use crate::http::pages::{self, Flash};
use crate::services::ServiceError;
use crate::state::AppState;
use crate::store::User;

async fn render(
    state: &AppState,
    id: i64,
    user: Option<&User>,
    status: StatusCode,
    flashes: &[Flash],
    draft: &ReviewInput,
) -> Result<Response, ApiError> {
    let detail = state.rankings().detail(id).await?;
    let title = detail.ranked.resort.resort_name.clone();
    let body = pages::resort_detail(&detail, user.is_some(), draft);
    Ok((status, Html(pages::layout(&title, user, flashes, &body))).into_response())
}

/// GET /resort/{id}
async fn resort_get(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    MaybeUser(user): MaybeUser,
) -> Result<Response, ApiError> {
    render(
        &state,
        id,
        user.as_ref(),
        StatusCode::OK,
        &[],
        &ReviewInput::default(),
    )
    .await
}

/// POST /resort/{id} - add a review
async fn resort_post(
    State(state): State<AppState>,
    Path(id): Path<i64>,
    CurrentUser(user): CurrentUser,
    Form(input): Form<ReviewInput>,
) -> Result<Response, ApiError> {
    match state.reviews().add_review(id, user.id, &input).await {
        Ok(_) => Ok(Redirect::to(&format!("/resort/{id}")).into_response()),
        Err(e @ ServiceError::Validation(_)) => {
            render(
                &state,
                id,
                Some(&user),
                StatusCode::BAD_REQUEST,
                &[Flash::error(e.to_string())],
                &input,
            )
            .await
        }
        Err(e) => Err(e.into()),
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/resort/{id}", get(resort_get).post(resort_post))
}
