//! Admin-only diagnostics

use axum::extract::State;
use axum::{routing::get, Json, Router};

use crate::http::error::ApiError;
use crate::http::extractors::AdminUser;
use crate::state::AppState;
use crate::store::UserSummary;

/// GET /debug/users - user list without credential material
async fn users(
    State(state): State<AppState>,
    AdminUser(admin): AdminUser,
) -> Result<Json<Vec<UserSummary>>, ApiError> {
    tracing::info!(user_id = admin.id, "admin listed users");
    Ok(Json(state.accounts().list_users().await?))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/debug/users", get(users))
}
