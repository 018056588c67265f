//! Registration domain model.
//!
//! # Responsibility
//! - Define the sign-up record shared by the store and the HTTP surface.
//! - Provide the binding checks applied before every write.
//!
//! # Invariants
//! - `id` is assigned by the store and never reused for another row.
//! - `name`, `email` and `phone` are non-blank; their shape is not checked.
//! - `age` carries no range constraint.

use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Store-assigned row identifier.
pub type RegistrationId = i64;

/// Binding failure for a registration payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistrationValidationError {
    /// A required text field is empty or whitespace-only.
    BlankField(&'static str),
}

impl Display for RegistrationValidationError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::BlankField(field) => write!(f, "the {field} field is required"),
        }
    }
}

impl Error for RegistrationValidationError {}

/// A person's sign-up record.
///
/// `id` and `age` default to `0` when absent from an incoming payload, the
/// text fields do not.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Registration {
    /// Zero until the store assigns one.
    #[serde(default)]
    pub id: RegistrationId,
    pub name: String,
    pub email: String,
    pub phone: String,
    #[serde(default)]
    pub age: i32,
}

impl Registration {
    /// Creates an unsaved registration (`id == 0`).
    pub fn new(
        name: impl Into<String>,
        email: impl Into<String>,
        phone: impl Into<String>,
        age: i32,
    ) -> Self {
        Self {
            id: 0,
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            age,
        }
    }

    /// Returns a copy of this record carrying `id`.
    pub fn with_id(mut self, id: RegistrationId) -> Self {
        self.id = id;
        self
    }

    /// Checks required-field presence.
    ///
    /// # Errors
    /// - `BlankField` naming the first empty or whitespace-only text field,
    ///   checked in `name`, `email`, `phone` order.
    pub fn validate(&self) -> Result<(), RegistrationValidationError> {
        for (field, value) in [
            ("name", self.name.as_str()),
            ("email", self.email.as_str()),
            ("phone", self.phone.as_str()),
        ] {
            if value.trim().is_empty() {
                return Err(RegistrationValidationError::BlankField(field));
            }
        }
        Ok(())
    }

    /// Returns whether the store has assigned an id to this record.
    pub fn is_persisted(&self) -> bool {
        self.id > 0
    }
}
