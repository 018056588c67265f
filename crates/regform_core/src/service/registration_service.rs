//! Registration use-case service.
//!
//! # Responsibility
//! - Provide stable CRUD entry points for core callers.
//! - Delegate persistence to repository implementations.
//!
//! # Invariants
//! - Service APIs never bypass repository validation/persistence contracts.
//! - Service layer remains storage-agnostic.
//! - Log events carry ids and status only, never field values.

use crate::model::registration::{Registration, RegistrationId};
use crate::repo::registration_repo::{RegistrationRepository, RepoError, RepoResult};
use log::{debug, info, warn};

/// Use-case service wrapper for registration CRUD operations.
pub struct RegistrationService<R: RegistrationRepository> {
    repo: R,
}

impl<R: RegistrationRepository> RegistrationService<R> {
    /// Creates a service using the provided repository implementation.
    pub fn new(repo: R) -> Self {
        Self { repo }
    }

    /// Lists every stored registration.
    pub fn list_registrations(&self) -> RepoResult<Vec<Registration>> {
        let registrations = self.repo.list_registrations()?;
        debug!(
            "event=registration_list module=service status=ok count={}",
            registrations.len()
        );
        Ok(registrations)
    }

    /// Gets one registration by id.
    pub fn get_registration(&self, id: RegistrationId) -> RepoResult<Option<Registration>> {
        self.repo.get_registration(id)
    }

    /// Persists a new registration and returns it with its assigned id.
    pub fn create_registration(&self, registration: &Registration) -> RepoResult<Registration> {
        let created = self.repo.create_registration(registration)?;
        info!(
            "event=registration_create module=service status=ok id={}",
            created.id
        );
        Ok(created)
    }

    /// Replaces the stored data of an existing registration.
    ///
    /// Returns repository-level not-found, conflict or validation errors unchanged.
    pub fn update_registration(&self, registration: &Registration) -> RepoResult<()> {
        match self.repo.update_registration(registration) {
            Ok(()) => {
                info!(
                    "event=registration_update module=service status=ok id={}",
                    registration.id
                );
                Ok(())
            }
            Err(err @ RepoError::Conflict(_)) => {
                warn!(
                    "event=registration_update module=service status=error error_code=conflict id={}",
                    registration.id
                );
                Err(err)
            }
            Err(err) => Err(err),
        }
    }

    /// Deletes a registration by id.
    pub fn delete_registration(&self, id: RegistrationId) -> RepoResult<()> {
        self.repo.delete_registration(id)?;
        info!("event=registration_delete module=service status=ok id={id}");
        Ok(())
    }
}
