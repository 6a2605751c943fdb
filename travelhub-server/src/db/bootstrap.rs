//! Database and role provisioning
//!
//! Runs with privileged credentials, outside the request lifecycle:
//! creates the application database and login role when missing and grants
//! the role what it needs to run migrations. Safe to run repeatedly.

use once_cell::sync::Lazy;
use regex::Regex;
use sqlx::PgPool;

use super::pool::command_pool;

static IDENT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^[A-Za-z_][A-Za-z0-9_]{0,62}$").expect("invalid identifier regex"));

#[derive(Debug, thiserror::Error)]
pub enum BootstrapError {
    #[error("invalid identifier '{0}': use letters, digits and '_' (max 63 chars)")]
    InvalidIdentifier(String),

    #[error("application role password is empty")]
    EmptyPassword,

    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),
}

/// What to provision
#[derive(Debug, Clone)]
pub struct BootstrapPlan {
    pub database: String,
    pub app_user: String,
    pub app_password: String,
}

/// What the run changed
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BootstrapReport {
    pub database_created: bool,
    pub role_created: bool,
}

/// Double-quote a validated identifier.
fn quote_ident(name: &str) -> Result<String, BootstrapError> {
    if !IDENT_RE.is_match(name) {
        return Err(BootstrapError::InvalidIdentifier(name.to_owned()));
    }
    Ok(format!("\"{}\"", name))
}

/// Single-quote a string literal (utility statements cannot take bind
/// parameters).
fn quote_literal(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

/// Privileged connection strings: one for the `postgres` maintenance
/// database, one for the application database once it exists.
#[derive(Debug, Clone)]
pub struct RootUrls {
    pub maintenance: String,
    pub application: String,
}

/// Provision the database and role.
pub async fn run(plan: &BootstrapPlan, urls: &RootUrls) -> Result<BootstrapReport, BootstrapError> {
    let db_ident = quote_ident(&plan.database)?;
    let role_ident = quote_ident(&plan.app_user)?;
    if plan.app_password.is_empty() {
        return Err(BootstrapError::EmptyPassword);
    }

    let admin = command_pool(&urls.maintenance).await?;
    let mut report = BootstrapReport::default();

    let (db_exists,): (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_database WHERE datname = $1)")
            .bind(&plan.database)
            .fetch_one(&admin)
            .await?;
    if !db_exists {
        sqlx::query(&format!("CREATE DATABASE {} ENCODING 'UTF8'", db_ident))
            .execute(&admin)
            .await?;
        report.database_created = true;
        tracing::info!(database = %plan.database, "database created");
    }

    let (role_exists,): (bool,) =
        sqlx::query_as("SELECT EXISTS(SELECT 1 FROM pg_roles WHERE rolname = $1)")
            .bind(&plan.app_user)
            .fetch_one(&admin)
            .await?;
    if !role_exists {
        sqlx::query(&format!(
            "CREATE ROLE {} LOGIN PASSWORD {}",
            role_ident,
            quote_literal(&plan.app_password)
        ))
        .execute(&admin)
        .await?;
        report.role_created = true;
        tracing::info!(role = %plan.app_user, "role created");
    }

    sqlx::query(&format!(
        "GRANT CONNECT, CREATE, TEMPORARY ON DATABASE {} TO {}",
        db_ident, role_ident
    ))
    .execute(&admin)
    .await?;
    admin.close().await;

    // Schema privileges must be granted from inside the target database
    let app_db = command_pool(&urls.application).await?;
    grant_schema(&app_db, &role_ident).await?;
    app_db.close().await;

    Ok(report)
}

async fn grant_schema(pool: &PgPool, role_ident: &str) -> Result<(), BootstrapError> {
    sqlx::query(&format!(
        "GRANT USAGE, CREATE ON SCHEMA public TO {}",
        role_ident
    ))
    .execute(pool)
    .await?;
    Ok(())
}

/// Connectivity diagnostics printed by `travelhub check-db`
#[derive(Debug, Clone)]
pub struct ConnectionReport {
    pub server_version: String,
    pub current_user: String,
    pub can_create_db: bool,
    pub can_create_role: bool,
}

/// Connect and collect server facts. Read-only.
pub async fn inspect(url: &str) -> Result<ConnectionReport, BootstrapError> {
    let pool = command_pool(url).await?;

    let (server_version,): (String,) = sqlx::query_as("SHOW server_version")
        .fetch_one(&pool)
        .await?;
    let (current_user, can_create_db, can_create_role): (String, bool, bool) = sqlx::query_as(
        "SELECT current_user::text, rolcreatedb, rolcreaterole FROM pg_roles WHERE rolname = current_user",
    )
    .fetch_one(&pool)
    .await?;
    pool.close().await;

    Ok(ConnectionReport {
        server_version,
        current_user,
        can_create_db,
        can_create_role,
    })
}
