//! MongoDB-backed [`StudentStore`].
//!
//! Records live in the `students` collection, keyed by the record id in
//! `_id`. On connect the store ensures:
//! - a unique index on `email`, which turns a racing second insert into a
//!   duplicate-key write error (code 11000) instead of a second record;
//! - a descending index on `createdAt` for the newest-first listing.

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use common::{Student, StorageError};
use mongodb::bson::{doc, DateTime as BsonDateTime};
use mongodb::error::{Error as MongoError, ErrorKind, WriteFailure};
use mongodb::options::{FindOptions, IndexOptions};
use mongodb::{Client, Collection, Database, IndexModel};
use serde::{Deserialize, Serialize};
use tracing::{debug, info, instrument};

use super::{InsertError, StoreResult, StudentStore};

/// Collection holding student documents.
pub const COLLECTION: &str = "students";

/// Server error code for a unique index violation.
const DUPLICATE_KEY_CODE: i32 = 11000;

/// On-disk shape of a student record.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct StudentDocument {
    #[serde(rename = "_id")]
    id: String,
    name: String,
    email: String,
    phone: String,
    #[serde(rename = "createdAt")]
    created_at: BsonDateTime,
}

impl From<&Student> for StudentDocument {
    fn from(s: &Student) -> Self {
        Self {
            id: s.id.clone(),
            name: s.name.clone(),
            email: s.email.clone(),
            phone: s.phone.clone(),
            created_at: BsonDateTime::from_millis(s.created_at.timestamp_millis()),
        }
    }
}

impl TryFrom<StudentDocument> for Student {
    type Error = StorageError;

    fn try_from(d: StudentDocument) -> Result<Self, Self::Error> {
        let millis = d.created_at.timestamp_millis();
        let created_at = DateTime::<Utc>::from_timestamp_millis(millis).ok_or_else(|| {
            StorageError::new(format!("student {} has out-of-range createdAt {millis}", d.id))
        })?;
        Ok(Student {
            id: d.id,
            name: d.name,
            email: d.email,
            phone: d.phone,
            created_at,
        })
    }
}

/// [`StudentStore`] over a MongoDB collection.
///
/// Cheap to clone; the driver [`Client`] pools connections internally.
#[derive(Clone, Debug)]
pub struct MongoStudentStore {
    db: Database,
    students: Collection<StudentDocument>,
}

impl MongoStudentStore {
    /// Connect, verify the server is reachable, and ensure indexes exist.
    ///
    /// The database named in `uri` wins; `fallback_db` is used when the URI
    /// does not name one.
    ///
    /// # Errors
    ///
    /// Returns an error if the URI cannot be parsed, the server does not answer
    /// a ping, or index creation fails.
    pub async fn connect(uri: &str, fallback_db: &str) -> Result<Self> {
        let client = Client::with_uri_str(uri)
            .await
            .context("failed to parse MongoDB connection string")?;
        let db = client
            .default_database()
            .unwrap_or_else(|| client.database(fallback_db));

        let store = Self {
            students: db.collection::<StudentDocument>(COLLECTION),
            db,
        };
        store
            .ping()
            .await
            .context("MongoDB did not answer ping")?;
        store.ensure_indexes().await?;

        info!(database = store.db.name(), collection = COLLECTION, "MongoDB store ready");
        Ok(store)
    }

    async fn ensure_indexes(&self) -> Result<()> {
        let unique_email = IndexModel::builder()
            .keys(doc! { "email": 1 })
            .options(
                IndexOptions::builder()
                    .name("email_unique".to_string())
                    .unique(true)
                    .build(),
            )
            .build();
        let newest_first = IndexModel::builder()
            .keys(doc! { "createdAt": -1, "_id": -1 })
            .options(
                IndexOptions::builder()
                    .name("created_at_desc".to_string())
                    .build(),
            )
            .build();

        self.students
            .create_indexes([unique_email, newest_first])
            .await
            .context("failed to create student indexes")?;
        debug!("student indexes ensured");
        Ok(())
    }
}

#[async_trait]
impl StudentStore for MongoStudentStore {
    #[instrument(skip_all)]
    async fn find_by_email(&self, email: &str) -> StoreResult<Option<Student>> {
        let found = self
            .students
            .find_one(doc! { "email": email })
            .await
            .map_err(|e| storage_error("find student by email", &e))?;
        found.map(Student::try_from).transpose()
    }

    #[instrument(skip_all, fields(student_id = %student.id))]
    async fn insert(&self, student: &Student) -> Result<(), InsertError> {
        self.students
            .insert_one(StudentDocument::from(student))
            .await
            .map(|_| ())
            .map_err(insert_error)
    }

    #[instrument(skip_all)]
    async fn list_newest_first(&self) -> StoreResult<Vec<Student>> {
        let options = FindOptions::builder()
            .sort(doc! { "createdAt": -1, "_id": -1 })
            .build();

        let mut cursor = self
            .students
            .find(doc! {})
            .with_options(options)
            .await
            .map_err(|e| storage_error("query students", &e))?;

        let mut students = Vec::new();
        while cursor
            .advance()
            .await
            .map_err(|e| storage_error("advance student cursor", &e))?
        {
            let document = cursor
                .deserialize_current()
                .map_err(|e| storage_error("read student document", &e))?;
            students.push(Student::try_from(document)?);
        }
        debug!(count = students.len(), "listed students");
        Ok(students)
    }

    async fn ping(&self) -> StoreResult<()> {
        self.db
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|e| storage_error("ping", &e))?;
        Ok(())
    }
}

fn storage_error(operation: &str, err: &MongoError) -> StorageError {
    StorageError::new(format!("MongoDB {operation} failed: {err}"))
}

fn insert_error(err: MongoError) -> InsertError {
    if is_duplicate_key(&err) {
        InsertError::DuplicateEmail
    } else {
        storage_error("insert student", &err).into()
    }
}

fn is_duplicate_key(err: &MongoError) -> bool {
    matches!(
        err.kind.as_ref(),
        ErrorKind::Write(WriteFailure::WriteError(write_error))
            if write_error.code == DUPLICATE_KEY_CODE
    )
}
