//! Domain model for registration records.
//!
//! # Responsibility
//! - Define the canonical data structure persisted in `registrations`.
//!
//! # Invariants
//! - Every stored registration is identified by a store-assigned `RegistrationId`.
//! - Deletion is a hard delete; there are no tombstones.

pub mod registration;
