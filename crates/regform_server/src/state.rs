//! Shared store handle passed explicitly into every handler.
//!
//! # Invariants
//! - One SQLite connection per process; each store operation holds the lock
//!   for its whole duration on a blocking worker thread.
//! - Repository and service are rebuilt per operation over the borrowed
//!   connection.

use std::sync::{Arc, Mutex};

use regform_core::{RegistrationService, RepoResult, SqliteRegistrationRepository};
use rusqlite::Connection;

use crate::http::problem::{ApiProblem, ApiResult};

pub type StoreService<'conn> = RegistrationService<SqliteRegistrationRepository<'conn>>;

#[derive(Clone)]
pub struct AppState {
    conn: Arc<Mutex<Connection>>,
}

impl AppState {
    /// Takes ownership of a migrated connection.
    pub fn new(conn: Connection) -> Self {
        Self {
            conn: Arc::new(Mutex::new(conn)),
        }
    }

    /// Runs one store operation against a per-request service.
    ///
    /// Repository errors are translated into problem responses here so
    /// handlers only deal with the happy path.
    pub async fn run<T, F>(&self, operation: F) -> ApiResult<T>
    where
        T: Send + 'static,
        F: for<'conn> FnOnce(&StoreService<'conn>) -> RepoResult<T> + Send + 'static,
    {
        let conn = Arc::clone(&self.conn);
        let joined = tokio::task::spawn_blocking(move || -> ApiResult<T> {
            let guard = conn
                .lock()
                .map_err(|_| ApiProblem::internal("registration store lock is poisoned"))?;
            let repo =
                SqliteRegistrationRepository::try_new(&guard).map_err(ApiProblem::from_repo)?;
            let service = RegistrationService::new(repo);
            operation(&service).map_err(ApiProblem::from_repo)
        })
        .await;

        match joined {
            Ok(result) => result,
            Err(err) => Err(ApiProblem::internal(format!(
                "registration store worker failed: {err}"
            ))),
        }
    }
}
