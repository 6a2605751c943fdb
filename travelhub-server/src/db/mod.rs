//! Database layer - connection pool, schema and repositories
//!
//! # Design Principles
//!
//! - Connection pool with an explicit limit - no Arc<Mutex<Connection>>
//! - List operations use JOINs - no N+1 queries
//! - Rely on DB constraints, handle conflicts - no check-then-insert
//! - Transactions for multi-step operations

pub mod bootstrap;
pub mod migrations;
pub mod pool;
pub mod repos;

pub use pool::{command_pool, server_pool};
pub use repos::*;
