//! Administrator provisioning

use std::sync::Arc;

use anyhow::{anyhow, Context, Result};
use clap::Parser;

use travelhub_core::AppConfig;
use travelhub_server::auth::PasswordHasher;
use travelhub_server::db::{command_pool, migrations};
use travelhub_server::services::Accounts;
use travelhub_server::store::PgStore;

#[derive(Parser, Debug)]
pub struct ProvisionAdminArgs {
    /// Username of the administrator
    pub username: String,

    /// Display name for a newly created account (defaults to the username)
    #[arg(long)]
    pub nickname: Option<String>,

    /// Environment variable holding the password for a new account
    #[arg(long, default_value = "ADMIN_PASSWORD")]
    pub password_env: String,
}

/// Create the admin, or promote an existing user. Idempotent.
pub async fn run_provision_admin(args: ProvisionAdminArgs, config: &AppConfig) -> Result<()> {
    let password = std::env::var(&args.password_env).map_err(|_| {
        anyhow!(
            "{} is not set; export the admin password there or pass --password-env",
            args.password_env
        )
    })?;
    let nickname = args.nickname.as_deref().unwrap_or(&args.username);

    let hasher = PasswordHasher::new(config.secret_key()?);
    let pool = command_pool(&config.database_url())
        .await
        .context("Failed to connect to the application database")?;
    migrations::run(&pool).await.context("Migration failed")?;

    let accounts = Accounts::new(Arc::new(PgStore::new(pool.clone())), hasher);
    let (user, outcome) = accounts
        .provision_admin(&args.username, nickname, &password)
        .await
        .context("Admin provisioning failed")?;
    pool.close().await;

    println!("admin '{}' (id {}): {}", user.username, user.id, outcome.as_str());
    Ok(())
}
