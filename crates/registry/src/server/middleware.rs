//! Axum middleware layers applied to the router.
//!
//! Includes request tracing, timeout enforcement, response compression, CORS,
//! security headers, and a panic guard that answers with a JSON 500.

use std::any::Any;

use axum::{
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use common::protocol::StatusResponse;
use tracing::{error, warn};

/// Response headers set on every response that does not already carry them.
pub fn security_headers() -> [(HeaderName, HeaderValue); 4] {
    [
        (header::X_CONTENT_TYPE_OPTIONS, HeaderValue::from_static("nosniff")),
        (header::X_FRAME_OPTIONS, HeaderValue::from_static("SAMEORIGIN")),
        (header::REFERRER_POLICY, HeaderValue::from_static("no-referrer")),
        (header::X_DNS_PREFETCH_CONTROL, HeaderValue::from_static("off")),
    ]
}

/// Body returned when a handler panics.
pub const PANIC_MESSAGE: &str = "Something went wrong!";

/// Body returned when a request exceeds the configured timeout.
pub const TIMEOUT_MESSAGE: &str = "Request timed out";

/// Give the bare 408 produced by the timeout layer a JSON body.
pub async fn timeout_envelope(resp: Response) -> Response {
    if resp.status() != StatusCode::REQUEST_TIMEOUT {
        return resp;
    }
    warn!("request timed out");
    (
        StatusCode::REQUEST_TIMEOUT,
        Json(StatusResponse::error(TIMEOUT_MESSAGE)),
    )
        .into_response()
}

/// Turn a caught handler panic into a JSON 500.
///
/// The panic payload is logged, never returned.
pub fn panic_response(panic: Box<dyn Any + Send + 'static>) -> Response {
    let detail = panic
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| panic.downcast_ref::<&str>().copied())
        .unwrap_or("unknown panic payload");
    error!(panic = detail, "request handler panicked");

    (
        StatusCode::INTERNAL_SERVER_ERROR,
        Json(StatusResponse::error(PANIC_MESSAGE)),
    )
        .into_response()
}
