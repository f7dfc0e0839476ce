//! Persistence seam for student records.
//!
//! [`StudentStore`] is what the registry talks to. Two backends exist:
//! - [`MongoStudentStore`]: the production backend. A unique index on `email`
//!   is the authoritative guard of the uniqueness invariant.
//! - [`MemoryStudentStore`]: used by tests and for running without a database.
//!
//! Both must return listings newest first and must refuse a second record with
//! the same email at insert time, independent of any lookup done beforehand.

pub mod memory;
pub mod mongo;

pub use memory::MemoryStudentStore;
pub use mongo::MongoStudentStore;

use async_trait::async_trait;
use common::{Student, StorageError};
use thiserror::Error;

/// Why an insert was refused.
#[derive(Debug, Error)]
pub enum InsertError {
    /// The store already holds a record with this email.
    #[error("duplicate email")]
    DuplicateEmail,

    #[error(transparent)]
    Storage(#[from] StorageError),
}

pub type StoreResult<T> = Result<T, StorageError>;

/// Backend holding the student collection.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait StudentStore: Send + Sync + 'static {
    /// Look up a record by its normalized email.
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Student>>;

    /// Persist a new record.
    ///
    /// # Errors
    ///
    /// [`InsertError::DuplicateEmail`] if the email is taken, even when a
    /// concurrent writer claimed it after the caller's lookup.
    async fn insert(&self, student: &Student) -> Result<(), InsertError>;

    /// All records ordered by `created_at` descending, most recent insert
    /// first on ties.
    async fn list_newest_first(&self) -> StoreResult<Vec<Student>>;

    /// Round-trip to the backend to confirm it is reachable.
    async fn ping(&self) -> StoreResult<()>;
}
