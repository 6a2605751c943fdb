//! travelhub CLI - run and administer a TravelHub instance
//!
//! - `serve`: migrate, then run the HTTP server
//! - `migrate`: apply the schema
//! - `setup-db` / `check-db`: database and role bootstrap, connectivity
//! - `provision-admin`: create or promote an administrator
//! - `completions`: shell completion scripts

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};

use travelhub_core::AppConfig;

mod commands;
mod tracing_setup;

#[derive(Parser, Debug)]
#[command(
    name = "travelhub",
    author,
    version,
    about = "Resort reviews and rankings server",
    long_about = "Run the TravelHub web application and manage its PostgreSQL database. \
                  Configuration comes from the environment, .env and an optional travelhub.toml."
)]
struct Cli {
    /// Debug logging (RUST_LOG still wins when set)
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Run the HTTP server (applies migrations first)
    Serve(commands::serve::ServeArgs),
    /// Apply schema migrations to the application database
    Migrate,
    /// Create the application database and role using root credentials
    SetupDb,
    /// Check database connectivity and privileges
    CheckDb(commands::db::CheckDbArgs),
    /// Create an administrator, or promote an existing user
    ProvisionAdmin(commands::admin::ProvisionAdminArgs),
    /// Generate shell completion scripts
    Completions(CompletionsArgs),
}

#[derive(Parser, Debug)]
struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    shell: Shell,
}

#[derive(ValueEnum, Debug, Clone, Copy)]
#[allow(clippy::enum_variant_names)] // PowerShell is a proper noun, not a suffix
enum Shell {
    Bash,
    Zsh,
    Fish,
    PowerShell,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    tracing_setup::init(&tracing_setup::TracingConfig { debug: cli.debug }).ok();

    match cli.command {
        Commands::Serve(args) => commands::run_serve(args, load_config()?).await?,
        Commands::Migrate => commands::run_migrate(&load_config()?).await?,
        Commands::SetupDb => commands::run_setup_db(&load_config()?).await?,
        Commands::CheckDb(args) => commands::run_check_db(args, &load_config()?).await?,
        Commands::ProvisionAdmin(args) => {
            commands::run_provision_admin(args, &load_config()?).await?
        }
        Commands::Completions(args) => run_completions(args)?,
    }
    Ok(())
}

/// Environment, .env and optional TOML file. Completions never need it.
fn load_config() -> Result<AppConfig> {
    AppConfig::load().context("Failed to load configuration")
}

fn run_completions(args: CompletionsArgs) -> Result<()> {
    use clap::CommandFactory;
    use clap_complete::{generate, Shell as CompletionShell};
    use std::io;

    let mut cmd = Cli::command();
    let bin_name = cmd.get_name().to_string();

    let shell = match args.shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
    };

    generate(shell, &mut cmd, bin_name, &mut io::stdout());

    Ok(())
}
