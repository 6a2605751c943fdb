//! Database commands
//!
//! Commands: migrate, setup-db, check-db

use anyhow::{anyhow, Context, Result};
use clap::Parser;

use travelhub_core::AppConfig;
use travelhub_server::db::bootstrap::{self, BootstrapPlan, RootUrls};
use travelhub_server::db::{command_pool, migrations};

#[derive(Parser, Debug)]
pub struct CheckDbArgs {
    /// Check the root credentials (DB_ROOT_USER / DB_ROOT_PASSWORD) instead
    /// of the application role
    #[arg(long)]
    pub root: bool,
}

/// Apply the idempotent schema migrations.
pub async fn run_migrate(config: &AppConfig) -> Result<()> {
    let pool = command_pool(&config.database_url())
        .await
        .context("Failed to connect to the application database")?;
    migrations::run(&pool)
        .await
        .context("Migration failed")?;
    pool.close().await;

    println!("Schema is up to date");
    Ok(())
}

/// Create the application database and role with root credentials.
pub async fn run_setup_db(config: &AppConfig) -> Result<()> {
    let app_password = config
        .database
        .password
        .clone()
        .ok_or_else(|| anyhow!("DB_PASSWORD must be set: it becomes the application role's password"))?;

    let plan = BootstrapPlan {
        database: config.database.name.clone(),
        app_user: config.database.user.clone(),
        app_password,
    };
    let urls = RootUrls {
        maintenance: config.root_url("postgres")?,
        application: config.root_url(&config.database.name)?,
    };

    let report = bootstrap::run(&plan, &urls)
        .await
        .context("Database setup failed")?;

    println!(
        "database '{}': {}",
        plan.database,
        if report.database_created { "created" } else { "already exists" }
    );
    println!(
        "role '{}': {}",
        plan.app_user,
        if report.role_created { "created" } else { "already exists" }
    );
    println!("privileges granted; run `travelhub migrate` next");
    Ok(())
}

/// Print connectivity facts, or troubleshooting hints on failure.
pub async fn run_check_db(args: CheckDbArgs, config: &AppConfig) -> Result<()> {
    let (url, who) = if args.root {
        (config.root_url("postgres")?, config.bootstrap.root_user.as_str())
    } else {
        (config.database_url(), config.database.user.as_str())
    };
    let host = format!("{}:{}", config.database.host, config.database.port);

    match bootstrap::inspect(&url).await {
        Ok(report) => {
            println!("connected to {host} as {}", report.current_user);
            println!("server version: {}", report.server_version);
            println!("can create databases: {}", report.can_create_db);
            println!("can create roles: {}", report.can_create_role);
            Ok(())
        }
        Err(e) => {
            eprintln!("could not connect to {host} as '{who}': {e}");
            eprintln!("hints:");
            eprintln!("  - is PostgreSQL running and listening on {host}?");
            eprintln!("  - check DB_HOST / DB_PORT or DATABASE_URL");
            eprintln!("  - check the password (DB_PASSWORD, or DB_ROOT_PASSWORD with --root)");
            eprintln!("  - run `travelhub setup-db` if the database or role does not exist yet");
            Err(anyhow!("database check failed"))
        }
    }
}
