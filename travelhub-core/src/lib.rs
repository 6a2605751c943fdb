//! travelhub-core: domain types and configuration for TravelHub
//!
//! Everything here is free of database and HTTP concerns so that the
//! server and the CLI share one definition of what valid input is.

pub mod config;
pub mod error;
pub mod models;
pub mod time;

pub use config::AppConfig;
pub use error::{CoreError, Result};
