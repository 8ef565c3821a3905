//! Notice Board Backend Library
//!
//! Exposes the auth gate, notice store and router for the binary and tests.

pub mod app;
pub mod auth;
pub mod config;
pub mod middleware;
pub mod notices;

pub use app::{build_router, AppState};
pub use config::Config;
