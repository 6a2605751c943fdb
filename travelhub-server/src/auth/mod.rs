//! Credentials and login sessions

pub mod password;
pub mod session;

pub use password::{HashError, PasswordHasher};
pub use session::{session_token, SessionManager, SESSION_COOKIE};
