//! Persistence seam
//!
//! Services talk to a [`Store`]; the PostgreSQL backend lives in
//! [`postgres`], the in-memory backend in [`memory`] (tests and demos).
//!
//! Backends must honour the same contract:
//! - usernames are unique, duplicates return [`StoreError::Conflict`]
//! - rows pointing at an unknown user return
//!   [`StoreError::MissingReference`]
//! - `create_resort_with_review` is atomic
//! - rankings use the outer-join policy: unrated resorts are listed with a
//!   `None` score after every rated resort, ties ordered by id

pub mod memory;
pub mod postgres;
pub mod records;

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use travelhub_core::models::Window;

pub use memory::MemoryStore;
pub use postgres::PgStore;
pub use records::*;

/// Storage error type
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("database error: {0}")]
    Sqlx(#[from] sqlx::Error),

    #[error("not found: {resource} '{id}'")]
    NotFound { resource: &'static str, id: String },

    #[error("conflict: {0}")]
    Conflict(String),

    /// A row points at a parent that does not exist (foreign key)
    #[error("missing reference: {0}")]
    MissingReference(String),

    #[error("corrupt row: {0}")]
    Corrupt(String),
}

impl StoreError {
    pub fn not_found(resource: &'static str, id: impl ToString) -> Self {
        Self::NotFound {
            resource,
            id: id.to_string(),
        }
    }
}

#[async_trait]
pub trait Store: Send + Sync {
    /// Backend name for logs
    fn backend_tag(&self) -> &'static str;

    async fn create_user(&self, user: NewUser) -> Result<User, StoreError>;

    async fn user_by_username(&self, username: &str) -> Result<Option<User>, StoreError>;

    async fn user_by_id(&self, id: i64) -> Result<Option<User>, StoreError>;

    async fn set_admin(&self, user_id: i64, is_admin: bool) -> Result<(), StoreError>;

    async fn list_users(&self) -> Result<Vec<User>, StoreError>;

    /// Insert a resort and its first review in one transaction.
    async fn create_resort_with_review(
        &self,
        resort: NewResort,
        review: NewReview,
    ) -> Result<(Resort, Review), StoreError>;

    /// Append a review to an existing resort.
    async fn add_review(&self, resort_id: i64, review: NewReview) -> Result<Review, StoreError>;

    /// Resorts ordered by average score (desc, unrated last, then id).
    /// `None` returns the full listing.
    async fn ranked_resorts(&self, window: Option<Window>)
        -> Result<Vec<RankedResort>, StoreError>;

    async fn ranked_resort(&self, resort_id: i64) -> Result<Option<RankedResort>, StoreError>;

    /// Newest first
    async fn reviews_for_resort(&self, resort_id: i64) -> Result<Vec<ResortReview>, StoreError>;

    /// Newest first
    async fn reviews_by_user(&self, user_id: i64) -> Result<Vec<UserReview>, StoreError>;

    async fn create_session(&self, session: Session) -> Result<(), StoreError>;

    async fn session(&self, token: &str) -> Result<Option<Session>, StoreError>;

    async fn delete_session(&self, token: &str) -> Result<(), StoreError>;

    async fn purge_expired_sessions(&self, now: DateTime<Utc>) -> Result<u64, StoreError>;
}
