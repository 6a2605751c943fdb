//! PostgreSQL pools
//!
//! The server shares one pool sized by `DB_MAX_CONNECTIONS`; one-shot
//! commands (`migrate`, `setup-db`, `check-db`, `provision-admin`) hold a
//! single connection and close it before exiting.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;

use travelhub_core::AppConfig;

/// An unreachable database fails startup instead of hanging it.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(10);

/// Pool for the HTTP server. Every request borrows one connection for its
/// duration.
pub async fn server_pool(config: &AppConfig) -> Result<PgPool, sqlx::Error> {
    connect(&config.database_url(), config.database.max_connections).await
}

/// Single-connection pool for CLI commands and database tests.
pub async fn command_pool(database_url: &str) -> Result<PgPool, sqlx::Error> {
    connect(database_url, 1).await
}

async fn connect(database_url: &str, max_connections: u32) -> Result<PgPool, sqlx::Error> {
    let max_connections = max_connections.max(1);
    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(database_url)
        .await?;
    tracing::debug!(max_connections, "database pool ready");
    Ok(pool)
}
