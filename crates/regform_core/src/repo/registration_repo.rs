//! Registration repository contracts and SQLite implementation.
//!
//! # Responsibility
//! - Provide CRUD APIs over the `registrations` table.
//! - Keep SQL details inside the core persistence boundary.
//! - Translate lock contention on writes into `NotFound` or `Conflict`.
//!
//! # Invariants
//! - Write paths call `Registration::validate()` before SQL mutations.
//! - Read paths reject invalid persisted state instead of masking it.
//! - Updates and deletes are keyed by `id`; there is no change tracking.

use crate::db::migrations::{current_user_version, latest_version};
use crate::db::DbError;
use crate::model::registration::{Registration, RegistrationId, RegistrationValidationError};
use rusqlite::{params, Connection, Row};
use std::error::Error;
use std::fmt::{Display, Formatter};

const REGISTRATION_TABLE: &str = "registrations";
const REGISTRATION_COLUMNS: [&str; 5] = ["id", "name", "email", "phone", "age"];

const REGISTRATION_SELECT_SQL: &str = "SELECT
    id,
    name,
    email,
    phone,
    age
FROM registrations";

pub type RepoResult<T> = Result<T, RepoError>;

/// Repository error for registration persistence and query operations.
#[derive(Debug)]
pub enum RepoError {
    Validation(RegistrationValidationError),
    Db(DbError),
    NotFound(RegistrationId),
    /// The write was rejected by lock contention while the row still exists.
    Conflict(RegistrationId),
    InvalidData(String),
    UninitializedConnection {
        expected_version: u32,
        actual_version: u32,
    },
    MissingRequiredTable(&'static str),
    MissingRequiredColumn {
        table: &'static str,
        column: &'static str,
    },
}

impl Display for RepoError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Validation(err) => write!(f, "{err}"),
            Self::Db(err) => write!(f, "{err}"),
            Self::NotFound(id) => write!(f, "registration not found: {id}"),
            Self::Conflict(id) => write!(
                f,
                "registration {id} was modified concurrently and could not be updated"
            ),
            Self::InvalidData(message) => {
                write!(f, "invalid persisted registration data: {message}")
            }
            Self::UninitializedConnection {
                expected_version,
                actual_version,
            } => write!(
                f,
                "connection schema version {actual_version} does not match expected {expected_version}; open it with `open_db`"
            ),
            Self::MissingRequiredTable(table) => write!(f, "missing required table `{table}`"),
            Self::MissingRequiredColumn { table, column } => {
                write!(f, "missing required column `{table}.{column}`")
            }
        }
    }
}

impl Error for RepoError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Validation(err) => Some(err),
            Self::Db(err) => Some(err),
            _ => None,
        }
    }
}

impl From<RegistrationValidationError> for RepoError {
    fn from(value: RegistrationValidationError) -> Self {
        Self::Validation(value)
    }
}

impl From<DbError> for RepoError {
    fn from(value: DbError) -> Self {
        Self::Db(value)
    }
}

impl From<rusqlite::Error> for RepoError {
    fn from(value: rusqlite::Error) -> Self {
        Self::Db(DbError::Sqlite(value))
    }
}

/// Repository interface for registration CRUD operations.
pub trait RegistrationRepository {
    /// Inserts a new row and returns it with the store-assigned id.
    ///
    /// The incoming `id` is ignored.
    fn create_registration(&self, registration: &Registration) -> RepoResult<Registration>;
    fn get_registration(&self, id: RegistrationId) -> RepoResult<Option<Registration>>;
    fn list_registrations(&self) -> RepoResult<Vec<Registration>>;
    /// Replaces every field of the row identified by `registration.id`.
    fn update_registration(&self, registration: &Registration) -> RepoResult<()>;
    fn delete_registration(&self, id: RegistrationId) -> RepoResult<()>;
    fn registration_exists(&self, id: RegistrationId) -> RepoResult<bool>;
}

/// SQLite-backed registration repository.
pub struct SqliteRegistrationRepository<'conn> {
    conn: &'conn Connection,
}

impl<'conn> SqliteRegistrationRepository<'conn> {
    /// Constructs a repository from a migrated connection.
    ///
    /// # Errors
    /// - `UninitializedConnection` when migrations were not applied.
    /// - `MissingRequiredTable` / `MissingRequiredColumn` when the schema
    ///   does not carry the `registrations` shape.
    pub fn try_new(conn: &'conn Connection) -> RepoResult<Self> {
        ensure_connection_ready(conn)?;
        Ok(Self { conn })
    }
}

impl RegistrationRepository for SqliteRegistrationRepository<'_> {
    fn create_registration(&self, registration: &Registration) -> RepoResult<Registration> {
        registration.validate()?;

        self.conn.execute(
            "INSERT INTO registrations (name, email, phone, age)
             VALUES (?1, ?2, ?3, ?4);",
            params![
                registration.name.as_str(),
                registration.email.as_str(),
                registration.phone.as_str(),
                registration.age,
            ],
        )?;

        Ok(registration.clone().with_id(self.conn.last_insert_rowid()))
    }

    fn get_registration(&self, id: RegistrationId) -> RepoResult<Option<Registration>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{REGISTRATION_SELECT_SQL} WHERE id = ?1;"))?;

        let mut rows = stmt.query([id])?;
        if let Some(row) = rows.next()? {
            return Ok(Some(parse_registration_row(row)?));
        }

        Ok(None)
    }

    fn list_registrations(&self) -> RepoResult<Vec<Registration>> {
        let mut stmt = self
            .conn
            .prepare(&format!("{REGISTRATION_SELECT_SQL} ORDER BY id ASC;"))?;
        let mut rows = stmt.query([])?;
        let mut registrations = Vec::new();

        while let Some(row) = rows.next()? {
            registrations.push(parse_registration_row(row)?);
        }

        Ok(registrations)
    }

    fn update_registration(&self, registration: &Registration) -> RepoResult<()> {
        registration.validate()?;
        let id = registration.id;

        let result = self.conn.execute(
            "UPDATE registrations
             SET
                name = ?1,
                email = ?2,
                phone = ?3,
                age = ?4
             WHERE id = ?5;",
            params![
                registration.name.as_str(),
                registration.email.as_str(),
                registration.phone.as_str(),
                registration.age,
                id,
            ],
        );

        match result {
            Ok(0) => Err(RepoError::NotFound(id)),
            Ok(_) => Ok(()),
            Err(err) => {
                let err = DbError::from(err);
                if !err.is_busy() {
                    return Err(err.into());
                }
                // Only a vanished row is recoverable; anything else stays fatal.
                if self.registration_exists(id)? {
                    Err(RepoError::Conflict(id))
                } else {
                    Err(RepoError::NotFound(id))
                }
            }
        }
    }

    fn delete_registration(&self, id: RegistrationId) -> RepoResult<()> {
        let changed = self
            .conn
            .execute("DELETE FROM registrations WHERE id = ?1;", [id])?;

        if changed == 0 {
            return Err(RepoError::NotFound(id));
        }

        Ok(())
    }

    fn registration_exists(&self, id: RegistrationId) -> RepoResult<bool> {
        let exists: i64 = self.conn.query_row(
            "SELECT EXISTS(SELECT 1 FROM registrations WHERE id = ?1);",
            [id],
            |row| row.get(0),
        )?;
        Ok(exists == 1)
    }
}

fn parse_registration_row(row: &Row<'_>) -> RepoResult<Registration> {
    let id: RegistrationId = row.get("id")?;
    if id <= 0 {
        return Err(RepoError::InvalidData(format!(
            "invalid id value `{id}` in registrations.id"
        )));
    }

    let registration = Registration {
        id,
        name: row.get("name")?,
        email: row.get("email")?,
        phone: row.get("phone")?,
        age: row.get("age")?,
    };
    registration
        .validate()
        .map_err(|err| RepoError::InvalidData(format!("row {id}: {err}")))?;
    Ok(registration)
}

fn ensure_connection_ready(conn: &Connection) -> RepoResult<()> {
    let expected_version = latest_version();
    let actual_version = current_user_version(conn)?;
    if actual_version != expected_version {
        return Err(RepoError::UninitializedConnection {
            expected_version,
            actual_version,
        });
    }

    if !table_exists(conn, REGISTRATION_TABLE)? {
        return Err(RepoError::MissingRequiredTable(REGISTRATION_TABLE));
    }

    for column in REGISTRATION_COLUMNS {
        if !table_has_column(conn, REGISTRATION_TABLE, column)? {
            return Err(RepoError::MissingRequiredColumn {
                table: REGISTRATION_TABLE,
                column,
            });
        }
    }

    Ok(())
}

fn table_exists(conn: &Connection, table: &str) -> RepoResult<bool> {
    let exists: i64 = conn.query_row(
        "SELECT EXISTS(
            SELECT 1
            FROM sqlite_master
            WHERE type = 'table' AND name = ?1
        );",
        [table],
        |row| row.get(0),
    )?;
    Ok(exists == 1)
}

fn table_has_column(conn: &Connection, table: &str, column: &str) -> RepoResult<bool> {
    let mut stmt = conn.prepare(&format!("PRAGMA table_info({table});"))?;
    let mut rows = stmt.query([])?;
    while let Some(row) = rows.next()? {
        let current: String = row.get(1)?;
        if current == column {
            return Ok(true);
        }
    }
    Ok(false)
}
