//! travelhub-server: resort rankings, reviews and accounts over HTTP
//!
//! Layers, outermost first: `http` (axum routes and pages), `services`
//! (workflows), `store` (persistence seam) with the PostgreSQL
//! implementation in `db`.

pub mod auth;
pub mod db;
pub mod http;
pub mod services;
pub mod state;
pub mod store;
pub mod uploads;

use std::sync::Arc;

use travelhub_core::{AppConfig, CoreError};

pub use http::build_router;
pub use state::AppState;

use auth::PasswordHasher;
use store::PgStore;

/// Failures that stop the server before it accepts connections
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error("configuration error: {0}")]
    Config(#[from] CoreError),

    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error(transparent)]
    Server(#[from] http::ServerError),
}

/// Connect, migrate and serve until shutdown.
pub async fn serve(config: AppConfig) -> Result<(), StartupError> {
    let hasher = PasswordHasher::new(config.secret_key()?);

    let pool = db::server_pool(&config).await?;
    db::migrations::run(&pool).await?;

    let store = Arc::new(PgStore::new(pool));
    let state = AppState::new(store, config, hasher);
    http::run_server(state).await?;
    Ok(())
}
