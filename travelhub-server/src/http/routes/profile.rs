//! Profile page and resort submission

use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{Html, IntoResponse, Redirect, Response};
use axum::{routing::get, Router};

use travelhub_core::models::{ResortInput, ReviewInput};

use crate::http::error::ApiError;
use crate::http::extractors::CurrentUser;
use crate::http::pages::{self, Flash};
use crate::services::{ReviewSubmission, ServiceError};
use crate::state::AppState;
use crate::store::User;
use crate::uploads::PictureUpload;

async fn render(
    state: &AppState,
    user: &User,
    status: StatusCode,
    flashes: &[Flash],
    resort: &ResortInput,
    review: &ReviewInput,
) -> Result<Response, ApiError> {
    let reviews = state.rankings().reviews_by_user(user.id).await?;
    let body = pages::profile(user, &reviews, resort, review);
    Ok((status, Html(pages::layout("Profile", Some(user), flashes, &body))).into_response())
}

/// GET /profile
async fn profile_get(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
) -> Result<Response, ApiError> {
    render(
        &state,
        &user,
        StatusCode::OK,
        &[],
        &ResortInput::default(),
        &ReviewInput::default(),
    )
    .await
}

fn non_blank(value: String) -> Option<String> {
    if value.trim().is_empty() {
        None
    } else {
        Some(value)
    }
}

/// Collect the multipart fields of the submission form. Unknown fields are
/// ignored; an empty file input counts as no picture.
async fn read_submission(mut multipart: Multipart) -> Result<ReviewSubmission, ApiError> {
    let mut submission = ReviewSubmission::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest {
            message: format!("malformed form data: {e}"),
        })?
    {
        let name = field.name().unwrap_or_default().to_owned();

        if name == "picture" {
            let file_name = field.file_name().unwrap_or_default().to_owned();
            let bytes = field.bytes().await.map_err(|e| ApiError::BadRequest {
                message: format!("could not read picture: {e}"),
            })?;
            if !file_name.is_empty() && !bytes.is_empty() {
                submission.picture = Some(PictureUpload {
                    file_name,
                    bytes: bytes.to_vec(),
                });
            }
            continue;
        }

        let value = field.text().await.map_err(|e| ApiError::BadRequest {
            message: format!("could not read field '{name}': {e}"),
        })?;
        let resort = &mut submission.resort;
        let review = &mut submission.review;
        match name.as_str() {
            "country" => resort.country = value,
            "state" => resort.state = non_blank(value),
            "city" => resort.city = non_blank(value),
            "county" => resort.county = non_blank(value),
            "resort_name" => resort.resort_name = value,
            "resort_type" => resort.resort_type = value,
            "recommendation" => review.recommendation = Some(value),
            "expenditure" => review.expenditure = Some(value),
            "comment" => review.comment = Some(value),
            _ => {}
        }
    }

    Ok(submission)
}

/// POST /profile - multipart resort submission
async fn profile_post(
    State(state): State<AppState>,
    CurrentUser(user): CurrentUser,
    multipart: Multipart,
) -> Result<Response, ApiError> {
    let submission = read_submission(multipart).await?;
    let (resort_input, review_input) = (submission.resort.clone(), submission.review.clone());

    match state.reviews().submit(user.id, submission).await {
        Ok((resort, _)) => Ok(Redirect::to(&format!("/resort/{}", resort.id)).into_response()),
        Err(e @ ServiceError::Validation(_)) => {
            render(
                &state,
                &user,
                StatusCode::BAD_REQUEST,
                &[Flash::error(e.to_string())],
                &resort_input,
                &review_input,
            )
            .await
        }
        Err(e) if e.is_client_error() => Err(e.into()),
        Err(e) => {
            // Logged by the service; the visitor gets a generic message
            tracing::debug!(error = %e, "submission failed");
            render(
                &state,
                &user,
                StatusCode::INTERNAL_SERVER_ERROR,
                &[Flash::error("Could not save the resort. Please try again.")],
                &resort_input,
                &review_input,
            )
            .await
        }
    }
}

pub fn router() -> Router<AppState> {
    Router::new().route("/profile", get(profile_get).post(profile_post))
}
