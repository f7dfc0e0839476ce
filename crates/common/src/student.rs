//! The student record and the per-field validation failure it can produce.

use chrono::{DateTime, SubsecRound, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A registered student.
///
/// Records are created once through registration and never mutated. The
/// `email` field holds the normalized address and is unique across the
/// registry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Student {
    /// UUID v7 assigned at creation; sorts in creation order.
    pub id: String,
    /// Trimmed display name, at least three characters.
    pub name: String,
    /// Normalized email address.
    pub email: String,
    /// Ten ASCII digits.
    pub phone: String,
    /// Creation time in UTC, millisecond precision.
    pub created_at: DateTime<Utc>,
}

impl Student {
    /// Build a new record with a fresh id, stamped with the current time.
    ///
    /// The timestamp is truncated to milliseconds, the precision the document
    /// store keeps, so a record reads back exactly as it was returned.
    ///
    /// Callers are expected to pass values that already went through
    /// validation and normalization.
    pub fn new(name: impl Into<String>, email: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7().to_string(),
            name: name.into(),
            email: email.into(),
            phone: phone.into(),
            created_at: Utc::now().trunc_subsecs(3),
        }
    }
}

/// A single rejected input field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FieldError {
    /// Name of the offending request field (`"name"`, `"email"`, `"phone"`).
    pub field: String,
    /// Human-readable reason.
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }
}
