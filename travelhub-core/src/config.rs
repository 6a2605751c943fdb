//! Configuration loading
//!
//! Precedence, highest first:
//! 1. Environment variables (a `.env` file is loaded through `dotenvy`)
//! 2. TOML file at `$TRAVELHUB_CONFIG` or `./travelhub.toml`
//! 3. Built-in defaults
//!
//! Recognised variables: `DATABASE_URL`, `DB_HOST`, `DB_PORT`, `DB_USER`,
//! `DB_PASSWORD`, `DB_NAME`, `DB_MAX_CONNECTIONS`, `SECRET_KEY`,
//! `SESSION_TTL_HOURS`, `BIND_ADDR`, `CORS_PERMISSIVE`, `STATIC_DIR`,
//! `MAX_UPLOAD_BYTES`, `DB_ROOT_USER`, `DB_ROOT_PASSWORD`.

use std::env;
use std::fs;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::Deserialize;

use crate::error::{CoreError, Result};

/// Config file used when `TRAVELHUB_CONFIG` is not set
pub const DEFAULT_CONFIG_FILE: &str = "travelhub.toml";

/// Subdirectory of the static dir that receives uploaded pictures
pub const UPLOADS_SUBDIR: &str = "uploads";

#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub server: ServerSettings,
    pub database: DatabaseSettings,
    pub auth: AuthSettings,
    pub uploads: UploadSettings,
    pub bootstrap: BootstrapSettings,
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ServerSettings {
    pub bind_addr: SocketAddr,
    /// WARNING: allows any origin. Development only.
    pub cors_permissive: bool,
}

impl Default for ServerSettings {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 5000)),
            cors_permissive: false,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct DatabaseSettings {
    /// Full connection string; when set the individual parts are ignored
    pub url: Option<String>,
    pub host: String,
    pub port: u16,
    pub user: String,
    pub password: Option<String>,
    pub name: String,
    pub max_connections: u32,
}

impl Default for DatabaseSettings {
    fn default() -> Self {
        Self {
            url: None,
            host: "localhost".to_string(),
            port: 5432,
            user: "travel_user".to_string(),
            password: None,
            name: "travelhub".to_string(),
            max_connections: 5,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct AuthSettings {
    pub secret_key: Option<String>,
    pub session_ttl_hours: i64,
}

impl Default for AuthSettings {
    fn default() -> Self {
        Self {
            secret_key: None,
            session_ttl_hours: 24 * 7,
        }
    }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct UploadSettings {
    pub static_dir: PathBuf,
    pub max_upload_bytes: usize,
}

impl Default for UploadSettings {
    fn default() -> Self {
        Self {
            static_dir: PathBuf::from("static"),
            max_upload_bytes: 16 * 1024 * 1024,
        }
    }
}

/// Privileged credentials used only by `travelhub setup-db`
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct BootstrapSettings {
    pub root_user: String,
    pub root_password: Option<String>,
}

impl Default for BootstrapSettings {
    fn default() -> Self {
        Self {
            root_user: "postgres".to_string(),
            root_password: None,
        }
    }
}

impl AppConfig {
    /// Load `.env`, the optional config file, then environment overrides.
    pub fn load() -> Result<Self> {
        dotenvy::dotenv().ok();

        let path = env::var("TRAVELHUB_CONFIG")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from(DEFAULT_CONFIG_FILE));

        let content = if path.exists() {
            tracing::debug!(path = %path.display(), "reading config file");
            Some(fs::read_to_string(&path)?)
        } else {
            None
        };

        Self::from_sources(
            content.as_deref().map(|c| (path.as_path(), c)),
            |var| env::var(var).ok(),
        )
    }

    /// Build config from an optional file body and an environment lookup.
    pub fn from_sources<F>(file: Option<(&Path, &str)>, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = match file {
            Some((path, content)) => {
                toml::from_str(content).map_err(|source| CoreError::ConfigParse {
                    path: path.to_path_buf(),
                    source,
                })?
            }
            None => Self::default(),
        };

        config.apply_env(env)?;
        Ok(config)
    }

    fn apply_env<F>(&mut self, env: F) -> Result<()>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |var: &str| env(var).filter(|v| !v.trim().is_empty());

        if let Some(url) = lookup("DATABASE_URL") {
            self.database.url = Some(url);
        }
        if let Some(host) = lookup("DB_HOST") {
            self.database.host = host;
        }
        if let Some(port) = parse_var(&lookup, "DB_PORT")? {
            self.database.port = port;
        }
        if let Some(user) = lookup("DB_USER") {
            self.database.user = user;
        }
        if let Some(password) = lookup("DB_PASSWORD") {
            self.database.password = Some(password);
        }
        if let Some(name) = lookup("DB_NAME") {
            self.database.name = name;
        }
        if let Some(max) = parse_var(&lookup, "DB_MAX_CONNECTIONS")? {
            self.database.max_connections = max;
        }
        if let Some(secret) = lookup("SECRET_KEY") {
            self.auth.secret_key = Some(secret);
        }
        if let Some(ttl) = parse_var(&lookup, "SESSION_TTL_HOURS")? {
            self.auth.session_ttl_hours = ttl;
        }
        if let Some(addr) = parse_var(&lookup, "BIND_ADDR")? {
            self.server.bind_addr = addr;
        }
        if let Some(permissive) = parse_var(&lookup, "CORS_PERMISSIVE")? {
            self.server.cors_permissive = permissive;
        }
        if let Some(dir) = lookup("STATIC_DIR") {
            self.uploads.static_dir = PathBuf::from(dir);
        }
        if let Some(max) = parse_var(&lookup, "MAX_UPLOAD_BYTES")? {
            self.uploads.max_upload_bytes = max;
        }
        if let Some(user) = lookup("DB_ROOT_USER") {
            self.bootstrap.root_user = user;
        }
        if let Some(password) = lookup("DB_ROOT_PASSWORD") {
            self.bootstrap.root_password = Some(password);
        }

        if self.auth.session_ttl_hours <= 0 {
            return Err(CoreError::invalid_env(
                "SESSION_TTL_HOURS",
                "must be a positive number of hours",
            ));
        }

        Ok(())
    }

    /// Connection string for the application database.
    pub fn database_url(&self) -> String {
        if let Some(url) = &self.database.url {
            return url.clone();
        }
        postgres_url(
            &self.database.user,
            self.database.password.as_deref(),
            &self.database.host,
            self.database.port,
            &self.database.name,
        )
    }

    /// Connection string for `database` using the root credentials.
    /// `setup-db` uses it against `postgres` and the application database.
    pub fn root_url(&self, database: &str) -> Result<String> {
        let password = self.bootstrap.root_password.as_deref().ok_or_else(|| {
            CoreError::missing("DB_ROOT_PASSWORD", "required to create the database and role")
        })?;
        Ok(postgres_url(
            &self.bootstrap.root_user,
            Some(password),
            &self.database.host,
            self.database.port,
            database,
        ))
    }

    /// Secret used to key password hashes. Required to serve.
    pub fn secret_key(&self) -> Result<&str> {
        self.auth
            .secret_key
            .as_deref()
            .ok_or_else(|| CoreError::missing("SECRET_KEY", "set it in the environment or .env"))
    }

    pub fn session_ttl(&self) -> chrono::Duration {
        chrono::Duration::hours(self.auth.session_ttl_hours)
    }

    /// Directory receiving uploaded pictures.
    pub fn upload_dir(&self) -> PathBuf {
        self.uploads.static_dir.join(UPLOADS_SUBDIR)
    }
}

fn parse_var<T, L>(lookup: &L, var: &'static str) -> Result<Option<T>>
where
    T: FromStr,
    T::Err: std::fmt::Display,
    L: Fn(&str) -> Option<String>,
{
    match lookup(var) {
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|e: T::Err| CoreError::invalid_env(var, e.to_string())),
        None => Ok(None),
    }
}

fn postgres_url(user: &str, password: Option<&str>, host: &str, port: u16, db: &str) -> String {
    let credentials = match password {
        Some(pw) => format!(
            "{}:{}",
            urlencoding::encode(user),
            urlencoding::encode(pw)
        ),
        None => urlencoding::encode(user).into_owned(),
    };
    format!("postgres://{}@{}:{}/{}", credentials, host, port, db)
}
