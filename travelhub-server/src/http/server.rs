//! Axum server setup
//!
//! - Localhost-only CORS by default
//! - Tracing middleware
//! - Upload size limit
//! - Graceful shutdown on SIGTERM/Ctrl+C

use axum::extract::DefaultBodyLimit;
use axum::http::HeaderValue;
use axum::Router;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::services::ServeDir;
use tower_http::trace::TraceLayer;

use super::routes;
use crate::state::AppState;

/// Multipart encoding overhead allowed on top of the picture itself
const FORM_OVERHEAD_BYTES: usize = 64 * 1024;

fn cors_layer(state: &AppState) -> CorsLayer {
    let server = &state.config().server;
    if server.cors_permissive {
        tracing::warn!("CORS: Permissive mode enabled - all origins allowed");
        return CorsLayer::permissive();
    }

    let port = server.bind_addr.port();
    let origins: Vec<HeaderValue> = ["localhost", "127.0.0.1"]
        .iter()
        .filter_map(|host| HeaderValue::from_str(&format!("http://{host}:{port}")).ok())
        .collect();

    CorsLayer::new()
        .allow_origin(origins)
        .allow_methods(Any)
        .allow_headers(Any)
}

/// Build the full application router.
pub fn build_router(state: AppState) -> Router {
    let static_dir = state.config().uploads.static_dir.clone();
    let body_limit = state.config().uploads.max_upload_bytes + FORM_OVERHEAD_BYTES;

    let app = Router::new()
        .merge(routes::health::router())
        .merge(routes::assets::router())
        .merge(routes::home::router())
        .merge(routes::auth::router())
        .merge(routes::profile::router())
        .merge(routes::resorts::router())
        .merge(routes::api::router())
        .merge(routes::debug::router())
        .nest_service("/static", ServeDir::new(static_dir));

    let middleware = ServiceBuilder::new()
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer(&state))
        .layer(DefaultBodyLimit::max(body_limit));

    app.layer(middleware).with_state(state)
}

/// Run the HTTP server until a shutdown signal arrives.
///
/// # Example
///
/// ```ignore
/// let state = AppState::new(store, config, hasher);
/// run_server(state).await?;
/// ```
pub async fn run_server(state: AppState) -> Result<(), ServerError> {
    let bind_addr = state.config().server.bind_addr;
    tokio::fs::create_dir_all(state.config().upload_dir()).await?;

    let app = build_router(state);

    let listener = TcpListener::bind(bind_addr).await?;
    tracing::info!("Server listening on {}", bind_addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shutdown complete");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting shutdown");
        }
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting shutdown");
        }
    }
}

/// Server error type
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
