//! Repository implementations for database access
//!
//! Each repository follows these patterns:
//! - Uses JOINs for list operations (no N+1)
//! - Relies on unique constraints and maps violations to conflicts
//! - Uses transactions for multi-step operations

pub mod resorts;
pub mod sessions;
pub mod users;

pub use resorts::ResortRepo;
pub use sessions::SessionRepo;
pub use users::UserRepo;

use crate::store::StoreError;

/// SQLSTATE for unique_violation
const UNIQUE_VIOLATION: &str = "23505";

/// SQLSTATE for foreign_key_violation
const FOREIGN_KEY_VIOLATION: &str = "23503";

/// Map a foreign key violation to [`StoreError::MissingReference`],
/// everything else passes through.
pub(crate) fn map_reference(err: sqlx::Error) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.code().as_deref() == Some(FOREIGN_KEY_VIOLATION) => {
            StoreError::MissingReference(db.constraint().unwrap_or("foreign key").to_owned())
        }
        _ => StoreError::Sqlx(err),
    }
}

/// Map a unique violation to [`StoreError::Conflict`], then defer to
/// [`map_reference`].
pub(crate) fn map_conflict(err: sqlx::Error, what: impl FnOnce() -> String) -> StoreError {
    match &err {
        sqlx::Error::Database(db) if db.code().as_deref() == Some(UNIQUE_VIOLATION) => {
            StoreError::Conflict(what())
        }
        _ => map_reference(err),
    }
}
