//! Request and response bodies for the public HTTP API.
//!
//! Every `/api/v1` response is wrapped in an envelope carrying a `success`
//! flag. Transport-level responses (health, unknown route, panics) use a
//! `status` string instead.

use serde::{Deserialize, Serialize};

use crate::student::{FieldError, Student};

/// Message sent with a successful registration.
pub const REGISTERED_MESSAGE: &str = "Student registered successfully";

// ---------------------------------------------------------------------------
// Student endpoints
// ---------------------------------------------------------------------------

/// Request body for `POST /api/v1/students`.
///
/// Every field is optional at the wire level so that a missing field is
/// reported as a validation failure rather than a deserialisation error.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegisterStudentRequest {
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub email: Option<String>,
    #[serde(default)]
    pub phone: Option<String>,
}

impl RegisterStudentRequest {
    /// Convenience constructor with all three fields present.
    pub fn new(name: impl Into<String>, email: impl Into<String>, phone: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            email: Some(email.into()),
            phone: Some(phone.into()),
        }
    }
}

/// `201 Created` body for `POST /api/v1/students`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentCreatedResponse {
    pub success: bool,
    pub data: Student,
    pub message: String,
}

impl StudentCreatedResponse {
    pub fn new(student: Student) -> Self {
        Self {
            success: true,
            data: student,
            message: REGISTERED_MESSAGE.into(),
        }
    }
}

/// `200 OK` body for `GET /api/v1/students`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StudentListResponse {
    pub success: bool,
    /// Number of entries in `data`.
    pub count: usize,
    pub data: Vec<Student>,
}

impl StudentListResponse {
    pub fn new(students: Vec<Student>) -> Self {
        Self {
            success: true,
            count: students.len(),
            data: students,
        }
    }
}

// ---------------------------------------------------------------------------
// Error envelopes
// ---------------------------------------------------------------------------

/// `400` body listing every rejected field.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ValidationErrorResponse {
    pub success: bool,
    pub errors: Vec<FieldError>,
}

impl ValidationErrorResponse {
    pub fn new(errors: Vec<FieldError>) -> Self {
        Self {
            success: false,
            errors,
        }
    }
}

/// Failure body for duplicate, malformed-body, and storage errors.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FailureResponse {
    pub success: bool,
    /// Human-readable description safe to expose to callers.
    pub message: String,
    /// Underlying error detail. Only populated outside production.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl FailureResponse {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: message.into(),
            error: None,
        }
    }

    /// Attach internal error detail.
    pub fn with_detail(mut self, detail: impl Into<String>) -> Self {
        self.error = Some(detail.into());
        self
    }
}

// ---------------------------------------------------------------------------
// Transport-level responses
// ---------------------------------------------------------------------------

/// Body for unmatched routes and unhandled failures: `{status:"error", message}`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatusResponse {
    pub status: String,
    pub message: String,
}

impl StatusResponse {
    pub fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error".into(),
            message: message.into(),
        }
    }
}

/// Response body for `GET /health`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    /// Always `"success"` while the process is serving requests.
    pub status: String,
    pub message: String,
    /// RFC 3339 time the response was produced.
    pub timestamp: String,
}

impl HealthResponse {
    pub fn running(timestamp: impl Into<String>) -> Self {
        Self {
            status: "success".into(),
            message: "Server is running".into(),
            timestamp: timestamp.into(),
        }
    }
}
