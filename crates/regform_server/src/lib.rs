//! HTTP surface for the registration store.
//!
//! Wires an explicit route table onto `regform_core` through a shared,
//! per-request locked SQLite handle.

pub mod app;
pub mod config;
pub mod http;
pub mod state;

pub use app::build_router;
pub use config::{AppConfig, DatabaseLocation};
pub use state::AppState;
