//! Core domain logic for the registration service.
//! This crate owns the Registration entity and its SQLite persistence.

pub mod db;
pub mod logging;
pub mod model;
pub mod repo;
pub mod service;

pub use logging::{default_log_level, init_logging, logging_status};
pub use model::registration::{Registration, RegistrationId, RegistrationValidationError};
pub use repo::registration_repo::{
    RegistrationRepository, RepoError, RepoResult, SqliteRegistrationRepository,
};
pub use service::registration_service::RegistrationService;

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
