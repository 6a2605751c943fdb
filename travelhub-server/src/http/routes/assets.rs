//! Stylesheet and script compiled into the binary
//!
//! Uploads live under `/static`; these two files never change at runtime.

use axum::http::header::CONTENT_TYPE;
use axum::response::IntoResponse;
use axum::{routing::get, Router};

use crate::state::AppState;

pub const STYLESHEET_PATH: &str = "/assets/style.css";
pub const SCRIPT_PATH: &str = "/assets/main.js";

async fn stylesheet() -> impl IntoResponse {
    (
        [(CONTENT_TYPE, "text/css; charset=utf-8")],
        include_str!("../../../assets/style.css"),
    )
}

async fn script() -> impl IntoResponse {
    (
        [(CONTENT_TYPE, "text/javascript; charset=utf-8")],
        include_str!("../../../assets/main.js"),
    )
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route(STYLESHEET_PATH, get(stylesheet))
        .route(SCRIPT_PATH, get(script))
}
