//! Boundary adapter from registry errors to HTTP responses.
//!
//! | Error | Status | Body |
//! |---|---|---|
//! | validation | 400 | `{success:false, errors:[{field,message}]}` |
//! | duplicate | 400 | `{success:false, message}` |
//! | storage | 500 | `{success:false, message:"Server error"}` |

use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use common::error::DUPLICATE_EMAIL_MESSAGE;
use common::protocol::{FailureResponse, ValidationErrorResponse};
use common::RegistryError;
use tracing::error;

/// Client-facing message for storage faults.
pub const SERVER_ERROR_MESSAGE: &str = "Server error";

/// A [`RegistryError`] on its way out of a handler.
#[derive(Debug)]
pub struct ApiError {
    error: RegistryError,
    expose_detail: bool,
}

impl ApiError {
    pub fn new(error: RegistryError, expose_detail: bool) -> Self {
        Self {
            error,
            expose_detail,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = StatusCode::from_u16(self.error.http_status())
            .unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);

        match self.error {
            RegistryError::Validation(errors) => {
                (status, Json(ValidationErrorResponse::new(errors))).into_response()
            }
            RegistryError::Duplicate => {
                (status, Json(FailureResponse::new(DUPLICATE_EMAIL_MESSAGE))).into_response()
            }
            RegistryError::Storage(e) => {
                error!(error = %e, "storage failure while handling request");
                let mut body = FailureResponse::new(SERVER_ERROR_MESSAGE);
                if self.expose_detail {
                    body = body.with_detail(e.to_string());
                }
                (status, Json(body)).into_response()
            }
        }
    }
}
