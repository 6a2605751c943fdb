//! Command implementations for the travelhub CLI

pub mod admin;
pub mod db;
pub mod serve;

// Re-export dispatcher functions for flat access from main.rs
pub use admin::run_provision_admin;
pub use db::{run_check_db, run_migrate, run_setup_db};
pub use serve::run_serve;
