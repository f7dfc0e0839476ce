//! Common error types shared across crates.

use thiserror::Error;

use crate::student::FieldError;

/// Message returned when a registration collides with an existing email.
pub const DUPLICATE_EMAIL_MESSAGE: &str = "Student with this email already exists";

/// A storage-layer fault: connectivity, timeout, or a failed query.
///
/// Carries only a description; the driver error itself stays inside the
/// store implementation.
#[derive(Debug, Clone, Error)]
#[error("{0}")]
pub struct StorageError(pub String);

impl StorageError {
    pub fn new(message: impl Into<String>) -> Self {
        Self(message.into())
    }
}

/// Outcome of a failed registry operation.
///
/// Variants map to HTTP status codes returned to callers:
/// - [`RegistryError::Validation`] → 400
/// - [`RegistryError::Duplicate`] → 400
/// - [`RegistryError::Storage`] → 500
#[derive(Debug, Error)]
pub enum RegistryError {
    /// One or more request fields were rejected. Never empty.
    #[error("validation failed on {} field(s)", .0.len())]
    Validation(Vec<FieldError>),

    /// A record with the same normalized email already exists.
    #[error("Student with this email already exists")]
    Duplicate,

    /// The backing store could not complete the operation.
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

impl RegistryError {
    /// Returns the HTTP status code that should be sent for this error.
    pub fn http_status(&self) -> u16 {
        match self {
            RegistryError::Validation(_) => 400,
            RegistryError::Duplicate => 400,
            RegistryError::Storage(_) => 500,
        }
    }

    /// Field names rejected by validation; empty for other variants.
    pub fn failed_fields(&self) -> Vec<&str> {
        match self {
            RegistryError::Validation(errors) => errors.iter().map(|e| e.field.as_str()).collect(),
            _ => Vec::new(),
        }
    }
}
