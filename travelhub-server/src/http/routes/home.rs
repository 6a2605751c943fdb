//! Ranking page

use axum::extract::State;
use axum::response::Html;
use axum::{routing::get, Router};

use crate::http::error::ApiError;
use crate::http::extractors::MaybeUser;
use crate::http::pages;
use crate::state::AppState;

/// GET / - every resort, best average first, unrated last
async fn index(
    State(state): State<AppState>,
    MaybeUser(user): MaybeUser,
) -> Result<Html<String>, ApiError> {
    let ranked = state.rankings().ranked(None).await?;
    Ok(Html(pages::layout(
        "Top resorts",
        user.as_ref(),
        &[],
        &pages::home(&ranked),
    )))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/", get(index))
}
