//! Application workflows on top of the [`Store`](crate::store::Store)
//!
//! Handlers stay thin: they parse the request, call one service method and
//! render the outcome.

pub mod accounts;
pub mod rankings;
pub mod reviews;

pub use accounts::{Accounts, ProvisionOutcome, SignupForm};
pub use rankings::{Rankings, ResortDetail};
pub use reviews::{ReviewSubmission, Reviews};

use travelhub_core::models::ValidationError;

use crate::auth::HashError;
use crate::store::StoreError;

pub const USERNAME_TAKEN: &str = "Username already exists";
pub const INVALID_CREDENTIALS: &str = "Invalid username or password";

#[derive(Debug, thiserror::Error)]
pub enum ServiceError {
    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{}", USERNAME_TAKEN)]
    UsernameTaken,

    #[error("{}", INVALID_CREDENTIALS)]
    InvalidCredentials,

    #[error("{resource} '{id}' not found")]
    NotFound { resource: &'static str, id: String },

    #[error("storage failure: {0}")]
    Store(StoreError),

    #[error("upload failure: {0}")]
    Upload(#[from] std::io::Error),

    #[error("password hashing failure: {0}")]
    Hashing(#[from] HashError),

    #[error("background task failed: {0}")]
    Task(#[from] tokio::task::JoinError),
}

impl From<StoreError> for ServiceError {
    fn from(e: StoreError) -> Self {
        match e {
            StoreError::NotFound { resource, id } => Self::NotFound { resource, id },
            other => Self::Store(other),
        }
    }
}

impl ServiceError {
    /// True for failures caused by the caller's input rather than the
    /// server.
    pub fn is_client_error(&self) -> bool {
        matches!(
            self,
            Self::Validation(_)
                | Self::UsernameTaken
                | Self::InvalidCredentials
                | Self::NotFound { .. }
        )
    }
}
