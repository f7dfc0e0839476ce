//! The student registry: registration with uniqueness enforcement, and
//! newest-first listing.
//!
//! # Invariants
//!
//! - Nothing reaches the store unless it passed [`validation::validate`].
//! - No two records share a normalized email. The lookup before insert only
//!   produces the friendly error early; the store's own insert-time check is
//!   the guard, and its refusal is reported the same way.

use std::sync::Arc;

use common::protocol::RegisterStudentRequest;
use common::{RegistryError, Student};
use tracing::{debug, info, instrument};

use crate::store::{InsertError, StudentStore};
use crate::validation;

/// Registration and listing over a [`StudentStore`].
///
/// Cheap to clone; clones share the same store.
#[derive(Clone)]
pub struct StudentRegistry {
    store: Arc<dyn StudentStore>,
}

impl StudentRegistry {
    pub fn new(store: Arc<dyn StudentStore>) -> Self {
        Self { store }
    }

    /// Validate `req` and persist it as a new student.
    ///
    /// # Errors
    ///
    /// - [`RegistryError::Validation`] with every rejected field; nothing is
    ///   read or written.
    /// - [`RegistryError::Duplicate`] if the normalized email is taken.
    /// - [`RegistryError::Storage`] if the store fails.
    #[instrument(skip_all)]
    pub async fn register(&self, req: &RegisterStudentRequest) -> Result<Student, RegistryError> {
        let candidate = validation::validate(req)?;

        if self.store.find_by_email(&candidate.email).await?.is_some() {
            debug!("registration rejected: email already registered");
            return Err(RegistryError::Duplicate);
        }

        let student = Student::new(candidate.name, candidate.email, candidate.phone);
        match self.store.insert(&student).await {
            Ok(()) => {}
            Err(InsertError::DuplicateEmail) => {
                debug!("registration lost insert race on email");
                return Err(RegistryError::Duplicate);
            }
            Err(InsertError::Storage(e)) => return Err(e.into()),
        }

        info!(student_id = %student.id, "student registered");
        Ok(student)
    }

    /// Every student, most recently created first.
    ///
    /// # Errors
    ///
    /// [`RegistryError::Storage`] if the store fails.
    #[instrument(skip_all)]
    pub async fn list_all(&self) -> Result<Vec<Student>, RegistryError> {
        Ok(self.store.list_newest_first().await?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::{MemoryStudentStore, MockStudentStore};
    use common::StorageError;

    fn memory_registry() -> (StudentRegistry, Arc<MemoryStudentStore>) {
        let store = Arc::new(MemoryStudentStore::new());
        (StudentRegistry::new(store.clone()), store)
    }

    #[tokio::test]
    async fn registers_valid_student_with_normalized_email() {
        let (registry, store) = memory_registry();
        let req = RegisterStudentRequest::new("Ann Lee", "Ann.Lee@Example.com", "5551234567");

        let student = registry.register(&req).await.unwrap();

        assert_eq!(student.name, "Ann Lee");
        assert_eq!(student.email, "ann.lee@example.com");
        assert_eq!(student.phone, "5551234567");
        assert!(!student.id.is_empty());
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn normalized_duplicate_is_rejected() {
        let (registry, store) = memory_registry();
        registry
            .register(&RegisterStudentRequest::new(
                "Ann Lee",
                "Ann.Lee@Example.com",
                "5551234567",
            ))
            .await
            .unwrap();

        let err = registry
            .register(&RegisterStudentRequest::new(
                "Ann L2",
                "ann.lee@example.com",
                "5559999999",
            ))
            .await
            .unwrap_err();

        assert!(matches!(err, RegistryError::Duplicate));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn distinct_yahoo_mailboxes_both_register() {
        let (registry, store) = memory_registry();
        for email in ["john@yahoo.com", "john-smith@yahoo.com"] {
            let req = RegisterStudentRequest::new("John Smith", email, "5551234567");
            assert!(registry.register(&req).await.is_ok(), "email: {email}");
        }
        assert_eq!(store.len().await, 2);

        let tagged = RegisterStudentRequest::new("John Smith", "john-smith-news@yahoo.com", "5551234567");
        assert!(matches!(
            registry.register(&tagged).await,
            Err(RegistryError::Duplicate)
        ));
    }

    #[tokio::test]
    async fn same_email_twice() {
        let (registry, store) = memory_registry();
        let req = RegisterStudentRequest::new("Ann Lee", "a@example.com", "5551234567");
        assert!(registry.register(&req).await.is_ok());
        assert!(matches!(
            registry.register(&req).await,
            Err(RegistryError::Duplicate)
        ));
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn invalid_input_persists_nothing() {
        let (registry, store) = memory_registry();
        let req = RegisterStudentRequest::new("  Al ", "a@example.com", "5551234567");

        let err = registry.register(&req).await.unwrap_err();

        assert_eq!(err.failed_fields(), vec!["name"]);
        assert_eq!(store.len().await, 0);
    }

    #[tokio::test]
    async fn invalid_input_never_touches_the_store() {
        // No expectations set: any store call would panic.
        let registry = StudentRegistry::new(Arc::new(MockStudentStore::new()));
        let req = RegisterStudentRequest::new("Ann Lee", "a@example.com", "12345");
        let err = registry.register(&req).await.unwrap_err();
        assert_eq!(err.failed_fields(), vec!["phone"]);
    }

    #[tokio::test]
    async fn lookup_failure_aborts_without_insert() {
        let mut store = MockStudentStore::new();
        store
            .expect_find_by_email()
            .returning(|_| Err(StorageError::new("connection reset")));
        store.expect_insert().never();

        let registry = StudentRegistry::new(Arc::new(store));
        let req = RegisterStudentRequest::new("Ann Lee", "a@example.com", "5551234567");

        let err = registry.register(&req).await.unwrap_err();
        assert!(matches!(err, RegistryError::Storage(_)));
    }

    #[tokio::test]
    async fn insert_time_unique_violation_is_a_duplicate() {
        let mut store = MockStudentStore::new();
        store.expect_find_by_email().returning(|_| Ok(None));
        store
            .expect_insert()
            .times(1)
            .returning(|_| Err(InsertError::DuplicateEmail));

        let registry = StudentRegistry::new(Arc::new(store));
        let req = RegisterStudentRequest::new("Ann Lee", "a@example.com", "5551234567");

        let err = registry.register(&req).await.unwrap_err();
        assert!(matches!(err, RegistryError::Duplicate));
    }

    #[tokio::test]
    async fn insert_storage_failure_surfaces() {
        let mut store = MockStudentStore::new();
        store.expect_find_by_email().returning(|_| Ok(None));
        store
            .expect_insert()
            .returning(|_| Err(InsertError::Storage(StorageError::new("timed out"))));

        let registry = StudentRegistry::new(Arc::new(store));
        let req = RegisterStudentRequest::new("Ann Lee", "a@example.com", "5551234567");

        match registry.register(&req).await {
            Err(RegistryError::Storage(e)) => assert!(e.to_string().contains("timed out")),
            other => panic!("expected storage error, got {other:?}"),
        }
    }

    #[tokio::test]
    async fn concurrent_registrations_keep_one_record() {
        let (registry, store) = memory_registry();
        let req = RegisterStudentRequest::new("Ann Lee", "race@example.com", "5551234567");

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let registry = registry.clone();
                let req = req.clone();
                tokio::spawn(async move { registry.register(&req).await })
            })
            .collect();

        let mut successes = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(_) => successes += 1,
                Err(RegistryError::Duplicate) => {}
                Err(other) => panic!("unexpected error: {other:?}"),
            }
        }
        assert_eq!(successes, 1);
        assert_eq!(store.len().await, 1);
    }

    #[tokio::test]
    async fn list_on_empty_registry() {
        let (registry, _) = memory_registry();
        assert!(registry.list_all().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn lists_most_recent_first() {
        let (registry, _) = memory_registry();
        for (name, email) in [
            ("First One", "t1@example.com"),
            ("Second Two", "t2@example.com"),
            ("Third Three", "t3@example.com"),
        ] {
            registry
                .register(&RegisterStudentRequest::new(name, email, "5551234567"))
                .await
                .unwrap();
            tokio::time::sleep(std::time::Duration::from_millis(5)).await;
        }

        let emails: Vec<String> = registry
            .list_all()
            .await
            .unwrap()
            .into_iter()
            .map(|s| s.email)
            .collect();
        assert_eq!(emails, ["t3@example.com", "t2@example.com", "t1@example.com"]);
    }

    #[tokio::test]
    async fn list_failure_surfaces_as_storage_error() {
        let mut store = MockStudentStore::new();
        store
            .expect_list_newest_first()
            .returning(|| Err(StorageError::new("server selection timeout")));
        let registry = StudentRegistry::new(Arc::new(store));
        assert!(matches!(
            registry.list_all().await,
            Err(RegistryError::Storage(_))
        ));
    }
}
