/// Structured error types for travelhub-core.
///
/// Uses `thiserror` so the server library can compose these errors.
/// The binary crate (travelhub-cli) wraps them with `anyhow` context.

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Main error type for travelhub-core operations
#[derive(Error, Debug)]
pub enum CoreError {
    /// I/O operation failed
    #[error("I/O error: {source}")]
    Io {
        #[from]
        source: io::Error,
    },

    /// Config file exists but is not valid TOML for our schema
    #[error("Invalid config file {path:?}: {source}")]
    ConfigParse {
        path: PathBuf,
        source: toml::de::Error,
    },

    /// Environment variable present but unusable
    #[error("Invalid value for {var}: {reason}")]
    InvalidEnv { var: &'static str, reason: String },

    /// Required setting missing for the requested operation
    #[error("Missing setting {setting}: {hint}")]
    MissingSetting {
        setting: &'static str,
        hint: &'static str,
    },
}

/// Result type alias for travelhub-core operations
pub type Result<T> = std::result::Result<T, CoreError>;

impl CoreError {
    /// Create an invalid environment value error
    pub fn invalid_env(var: &'static str, reason: impl Into<String>) -> Self {
        Self::InvalidEnv {
            var,
            reason: reason.into(),
        }
    }

    /// Create a missing setting error
    pub fn missing(setting: &'static str, hint: &'static str) -> Self {
        Self::MissingSetting { setting, hint }
    }
}
