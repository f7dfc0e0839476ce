//! In-memory storage implementation for testing and local runs.

use async_trait::async_trait;
use common::Student;
use tokio::sync::RwLock;
use tracing::instrument;

use super::{InsertError, StoreResult, StudentStore};

/// In-memory implementation of [`StudentStore`].
///
/// Records live in insertion order inside a single `RwLock<Vec<_>>`. The
/// uniqueness check and the push happen under the same write lock, so
/// concurrent inserts of one email cannot both succeed.
#[derive(Debug, Default)]
pub struct MemoryStudentStore {
    students: RwLock<Vec<Student>>,
}

impl MemoryStudentStore {
    /// Creates a new, empty store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of stored records.
    #[allow(dead_code)]
    pub async fn len(&self) -> usize {
        self.students.read().await.len()
    }
}

#[async_trait]
impl StudentStore for MemoryStudentStore {
    #[instrument(skip_all)]
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Student>> {
        let students = self.students.read().await;
        Ok(students.iter().find(|s| s.email == email).cloned())
    }

    #[instrument(skip_all, fields(student_id = %student.id))]
    async fn insert(&self, student: &Student) -> Result<(), InsertError> {
        let mut students = self.students.write().await;
        if students.iter().any(|s| s.email == student.email) {
            return Err(InsertError::DuplicateEmail);
        }
        students.push(student.clone());
        Ok(())
    }

    #[instrument(skip_all)]
    async fn list_newest_first(&self) -> StoreResult<Vec<Student>> {
        let students = self.students.read().await;
        let mut listed = students.clone();
        // Ids are time-ordered, so they break timestamp ties by insertion.
        listed.sort_by(|a, b| (b.created_at, &b.id).cmp(&(a.created_at, &a.id)));
        Ok(listed)
    }

    async fn ping(&self) -> StoreResult<()> {
        Ok(())
    }
}
