//! Axum router construction.

use std::time::Duration;

use axum::{routing::get, Router};
use tower_http::{
    catch_panic::CatchPanicLayer, compression::CompressionLayer, cors::CorsLayer,
    set_header::SetResponseHeaderLayer, timeout::TimeoutLayer, trace::TraceLayer,
};

use super::{handlers, middleware, state::AppState};

/// Build the application [`Router`] with all routes and middleware attached.
pub fn build(state: AppState, request_timeout: Duration) -> Router {
    with_middleware(routes(), state, request_timeout)
}

fn routes() -> Router<AppState> {
    Router::new()
        .route(
            "/api/v1/students",
            get(handlers::list_students).post(handlers::register_student),
        )
        .route("/health", get(handlers::health))
        .fallback(handlers::not_found)
}

fn with_middleware(router: Router<AppState>, state: AppState, request_timeout: Duration) -> Router {
    let router = router.layer(CatchPanicLayer::custom(middleware::panic_response));

    let router = middleware::security_headers()
        .into_iter()
        .fold(router, |router, (name, value)| {
            router.layer(SetResponseHeaderLayer::if_not_present(name, value))
        });

    router
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
        .layer(TimeoutLayer::new(request_timeout))
        .layer(axum::middleware::map_response(middleware::timeout_envelope))
        .layer(CompressionLayer::new())
        .with_state(state)
}
