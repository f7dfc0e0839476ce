//! Common types, response envelopes, and errors shared across `student-registry` crates.

pub mod error;
pub mod protocol;
pub mod student;

pub use error::{RegistryError, StorageError};
pub use student::{FieldError, Student};
