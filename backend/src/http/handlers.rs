//! HTTP handlers for the REST API.
//!
//! Each handler builds the caller's `RequestContext` from the bearer token
//! and delegates to the exam schedule coordinator.

use axum::{
    extract::{rejection::JsonRejection, Path, State},
    Json,
};
use chrono::Utc;

use super::dto::{
    BulkExamTimeUpdate, ExamWindowStatus, HealthResponse, SubjectCodeList, SubjectDatesInput,
    SubjectExamTimeUpdate, SubjectSettingsMap, UpdateOutcome,
};
use super::error::AppError;
use super::state::AppState;
use crate::db::services as db_services;
use crate::services::RequestContext;

/// Result type for handlers.
pub type HandlerResult<T> = Result<Json<T>, AppError>;

/// Body extractor that leaves the rejection to the handler, so that the
/// caller is authorized before the body shape is reported.
type JsonBody<T> = Result<Json<T>, JsonRejection>;

// =============================================================================
// Health Check
// =============================================================================

/// GET /health
pub async fn health_check(State(state): State<AppState>) -> HandlerResult<HealthResponse> {
    let db_status = match db_services::health_check(state.repository.as_ref()).await {
        Ok(true) => "connected".to_string(),
        Ok(false) => "disconnected".to_string(),
        Err(e) => {
            tracing::warn!(error = %e, "Health check failed");
            "error".to_string()
        }
    };

    Ok(Json(HealthResponse {
        status: "ok".to_string(),
        version: "v1".to_string(),
        database: db_status,
    }))
}

// =============================================================================
// Admin Reads
// =============================================================================

/// GET /v1/admin/subject-codes
pub async fn fetch_all_subject_codes(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> HandlerResult<SubjectCodeList> {
    Ok(Json(state.coordinator.fetch_all_subject_codes(&ctx)?))
}

/// GET /v1/admin/exam-settings
///
/// Every catalog code, with defaults for codes that have no stored rows.
pub async fn get_all_subject_exam_settings(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> HandlerResult<SubjectSettingsMap> {
    let settings = state.coordinator.get_all_subject_exam_settings(&ctx).await?;
    Ok(Json(settings))
}

// =============================================================================
// Admin Writes
// =============================================================================

/// POST /v1/admin/exam-settings/bulk
pub async fn bulk_update_exam_times(
    State(state): State<AppState>,
    ctx: RequestContext,
    body: JsonBody<Vec<BulkExamTimeUpdate>>,
) -> HandlerResult<UpdateOutcome> {
    ctx.require_admin()?;
    let Json(updates) = body?;

    let outcome = state
        .coordinator
        .bulk_update_exam_times(&ctx, &updates)
        .await?;
    Ok(Json(outcome))
}

/// PUT /v1/admin/exam-settings/{code}
pub async fn update_subject_exam_time(
    State(state): State<AppState>,
    Path(code): Path<String>,
    ctx: RequestContext,
    body: JsonBody<SubjectExamTimeUpdate>,
) -> HandlerResult<UpdateOutcome> {
    ctx.require_admin()?;
    let Json(update) = body?;

    let outcome = state
        .coordinator
        .update_subject_exam_time(&ctx, &code, &update)
        .await?;
    Ok(Json(outcome))
}

/// POST /v1/admin/subject-dates
pub async fn update_subject_dates(
    State(state): State<AppState>,
    ctx: RequestContext,
    body: JsonBody<SubjectDatesInput>,
) -> HandlerResult<UpdateOutcome> {
    ctx.require_admin()?;
    let Json(input) = body?;

    let outcome = state.coordinator.update_subject_dates(&ctx, &input).await?;
    Ok(Json(outcome))
}

// =============================================================================
// Exam Window
// =============================================================================

/// GET /v1/subjects/{code}/exam-window
pub async fn exam_window_status(
    State(state): State<AppState>,
    Path(code): Path<String>,
    ctx: RequestContext,
) -> HandlerResult<ExamWindowStatus> {
    let status = state
        .coordinator
        .exam_window_status(&ctx, &code, Utc::now())
        .await?;
    Ok(Json(status))
}
