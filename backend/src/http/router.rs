//! Router configuration for the HTTP API.

use axum::{
    extract::DefaultBodyLimit,
    routing::{get, post, put},
    Router,
};
use tower_http::{
    compression::CompressionLayer,
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};

use super::handlers;
use super::state::AppState;

/// Request bodies are small JSON documents.
const MAX_BODY_BYTES: usize = 1024 * 1024;

/// Create the main application router with all routes and middleware.
pub fn create_router(state: AppState) -> Router {
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_v1 = Router::new()
        // Administration
        .route("/admin/subject-codes", get(handlers::fetch_all_subject_codes))
        .route(
            "/admin/exam-settings",
            get(handlers::get_all_subject_exam_settings),
        )
        .route(
            "/admin/exam-settings/bulk",
            post(handlers::bulk_update_exam_times),
        )
        .route(
            "/admin/exam-settings/{code}",
            put(handlers::update_subject_exam_time),
        )
        .route("/admin/subject-dates", post(handlers::update_subject_dates))
        // Students and staff
        .route(
            "/subjects/{code}/exam-window",
            get(handlers::exam_window_status),
        );

    Router::new()
        .route("/health", get(handlers::health_check))
        .nest("/v1", api_v1)
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .layer(cors)
        .with_state(state)
}
