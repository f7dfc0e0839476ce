//! Axum request handlers for all service endpoints.

use axum::{
    extract::{rejection::JsonRejection, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use chrono::{SecondsFormat, Utc};
use common::protocol::{
    FailureResponse, HealthResponse, RegisterStudentRequest, StatusResponse,
    StudentCreatedResponse, StudentListResponse,
};
use tracing::debug;

use super::state::AppState;

/// `POST /api/v1/students`: validate and register a student.
///
/// A body that is not a JSON object is answered with 400 and the rejection
/// text, before validation runs.
pub async fn register_student(
    State(state): State<AppState>,
    payload: Result<Json<RegisterStudentRequest>, JsonRejection>,
) -> Response {
    let Json(req) = match payload {
        Ok(p) => p,
        Err(rejection) => {
            debug!(reason = %rejection.body_text(), "rejected request body");
            let err = FailureResponse::new(rejection.body_text());
            return (StatusCode::BAD_REQUEST, Json(err)).into_response();
        }
    };

    match state.registry.register(&req).await {
        Ok(student) => {
            (StatusCode::CREATED, Json(StudentCreatedResponse::new(student))).into_response()
        }
        Err(e) => state.api_error(e).into_response(),
    }
}

/// `GET /api/v1/students`: every student, newest first.
pub async fn list_students(State(state): State<AppState>) -> Response {
    match state.registry.list_all().await {
        Ok(students) => (StatusCode::OK, Json(StudentListResponse::new(students))).into_response(),
        Err(e) => state.api_error(e).into_response(),
    }
}

/// `GET /health`: liveness check. Does not touch the store.
pub async fn health() -> impl IntoResponse {
    let timestamp = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
    (StatusCode::OK, Json(HealthResponse::running(timestamp)))
}

/// Catch-all 404 handler.
pub async fn not_found() -> impl IntoResponse {
    (
        StatusCode::NOT_FOUND,
        Json(StatusResponse::error("Route not found")),
    )
}
