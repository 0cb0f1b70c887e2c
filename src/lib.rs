//! calcvault: per-user arithmetic calculation records behind a JWT-protected
//! REST API, with a small bundled front end.

pub mod app;
pub mod auth;
pub mod calculations;
pub mod config;
pub mod db;
pub mod error;
pub mod memory;
pub mod state;

pub use app::build_app;
pub use state::AppState;
