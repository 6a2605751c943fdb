//! HTTP server command

use std::net::SocketAddr;
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;

use travelhub_core::AppConfig;

/// Arguments for the serve command
#[derive(Parser, Debug)]
pub struct ServeArgs {
    /// Address to bind to (overrides BIND_ADDR, default 127.0.0.1:5000)
    #[arg(long, short = 'b')]
    pub bind: Option<SocketAddr>,

    /// Allow permissive CORS (all origins) - use with caution
    #[arg(long)]
    pub cors_permissive: bool,

    /// Directory served under /static; uploads go to its uploads/ subdirectory
    #[arg(long)]
    pub static_dir: Option<PathBuf>,
}

/// Apply flag overrides on top of the loaded configuration.
fn apply(args: ServeArgs, mut config: AppConfig) -> AppConfig {
    if let Some(bind) = args.bind {
        config.server.bind_addr = bind;
    }
    if args.cors_permissive {
        config.server.cors_permissive = true;
    }
    if let Some(dir) = args.static_dir {
        config.uploads.static_dir = dir;
    }
    config
}

/// Run migrations, then serve until Ctrl+C / SIGTERM.
pub async fn run_serve(args: ServeArgs, config: AppConfig) -> Result<()> {
    let config = apply(args, config);
    config
        .secret_key()
        .context("SECRET_KEY is required to serve")?;

    tracing::info!(
        bind = %config.server.bind_addr,
        static_dir = %config.uploads.static_dir.display(),
        "Starting travelhub server"
    );

    travelhub_server::serve(config)
        .await
        .context("Server error")?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn flags_override_config() {
        let args = ServeArgs {
            bind: Some("0.0.0.0:8080".parse().unwrap()),
            cors_permissive: false,
            static_dir: Some(PathBuf::from("/srv/static")),
        };
        let config = apply(args, AppConfig::default());
        assert_eq!(config.server.bind_addr.port(), 8080);
        assert!(!config.server.cors_permissive);
        assert_eq!(config.uploads.static_dir, PathBuf::from("/srv/static"));
    }
}
