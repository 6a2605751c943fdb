//! Route handlers organized by page

pub mod api;
pub mod assets;
pub mod auth;
pub mod debug;
pub mod health;
pub mod home;
pub mod profile;
pub mod resorts;
