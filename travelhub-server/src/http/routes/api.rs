//! JSON ranking endpoint

use axum::extract::{Query, State};
use axum::{routing::get, Json, Router};
use serde::Serialize;

use travelhub_core::models::{ResortType, Window, WindowParams};

use crate::http::error::ApiError;
use crate::state::AppState;
use crate::store::RankedResort;

#[derive(Debug, Serialize)]
pub struct ResortSummary {
    pub id: i64,
    pub resort_name: String,
    pub country: String,
    pub city: Option<String>,
    /// Path relative to `/static`
    pub picture: Option<String>,
    /// `null` when no review carries a rating
    pub avg_score: Option<f64>,
    pub resort_type: ResortType,
}

impl From<RankedResort> for ResortSummary {
    fn from(r: RankedResort) -> Self {
        Self {
            id: r.resort.id,
            resort_name: r.resort.resort_name,
            country: r.resort.country,
            city: r.resort.city,
            picture: r.resort.picture,
            avg_score: r.avg_score,
            resort_type: r.resort.resort_type,
        }
    }
}

/// GET /api/resorts?offset=&limit=
async fn list_resorts(
    State(state): State<AppState>,
    Query(params): Query<WindowParams>,
) -> Result<Json<Vec<ResortSummary>>, ApiError> {
    let window = Window::from(params);
    let ranked = state.rankings().ranked(Some(window)).await?;
    Ok(Json(ranked.into_iter().map(ResortSummary::from).collect()))
}

pub fn router() -> Router<AppState> {
    Router::new().route("/api/resorts", get(list_resorts))
}
