//! HTTP layer
//!
//! Axum server with:
//! - Server-rendered pages and one JSON listing
//! - Cookie sessions resolved by extractors
//! - CORS (localhost only by default)
//! - Request tracing and graceful shutdown

pub mod error;
pub mod extractors;
pub mod pages;
pub mod routes;
pub mod server;

pub use error::ApiError;
pub use server::{build_router, run_server, ServerError};
