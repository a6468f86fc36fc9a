//! HTTP surface tests: status codes, error bodies and bearer sessions.

#![cfg(feature = "http-server")]

mod support;

use std::sync::Arc;

use axum::{
    body::{to_bytes, Body},
    http::{header, Method, Request, StatusCode},
    Router,
};
use exam_schedule::db::{LocalRepository, SubjectSettingsRepository};
use exam_schedule::http::{create_router, ApiError, AppState, StaticSessions};
use exam_schedule::models::{SastClock, SubjectCode};
use exam_schedule::services::{Identity, Role};
use serde_json::{json, Value};
use tower::ServiceExt;

use support::{seeded_repo, utc, RevalidationLog};

const ADMIN_TOKEN: &str = "admin-token";
const STUDENT_TOKEN: &str = "student-token";

struct TestApp {
    router: Router,
    repo: LocalRepository,
    revalidation: RevalidationLog,
}

fn app(rows: &[(SubjectCode, usize)]) -> TestApp {
    let repo = seeded_repo(rows);
    let sessions = StaticSessions::new();
    sessions.insert(ADMIN_TOKEN, Identity::new("admin-1", Role::Admin));
    sessions.insert(STUDENT_TOKEN, Identity::new("student-1", Role::Student));

    let revalidation = RevalidationLog::new();
    let state = AppState::new(
        Arc::new(repo.clone()),
        Arc::new(sessions),
        SastClock::default(),
        Arc::new(revalidation.clone()),
    );
    TestApp {
        router: create_router(state),
        repo,
        revalidation,
    }
}

async fn send(
    router: &Router,
    method: Method,
    uri: &str,
    token: Option<&str>,
    body: Option<String>,
) -> (StatusCode, Value) {
    let mut builder = Request::builder().method(method).uri(uri);
    if let Some(token) = token {
        builder = builder.header(header::AUTHORIZATION, format!("Bearer {}", token));
    }
    let request = match body {
        Some(body) => builder
            .header(header::CONTENT_TYPE, "application/json")
            .body(Body::from(body))
            .unwrap(),
        None => builder.body(Body::empty()).unwrap(),
    };

    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let value = serde_json::from_slice(&bytes).unwrap_or(Value::Null);
    (status, value)
}

fn error_body(value: Value) -> ApiError {
    serde_json::from_value(value).unwrap()
}

fn subject_dates(start: &str, due: &str) -> String {
    json!({
        "subjectCodes": ["MATH101"],
        "examDate": "2025-05-10",
        "startingTime": start,
        "dueTime": due,
    })
    .to_string()
}

// =============================================================================
// Health
// =============================================================================

#[tokio::test]
async fn test_health() {
    let app = app(&[]);
    let (status, body) = send(&app.router, Method::GET, "/health", None, None).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["status"], "ok");
    assert_eq!(body["database"], "connected");

    app.repo.set_healthy(false);
    let (_, body) = send(&app.router, Method::GET, "/health", None, None).await;
    assert_eq!(body["database"], "disconnected");
}

// =============================================================================
// Sessions
// =============================================================================

#[tokio::test]
async fn test_missing_or_unknown_token_is_unauthorized() {
    let app = app(&[]);

    let (status, body) =
        send(&app.router, Method::GET, "/v1/admin/subject-codes", None, None).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
    assert_eq!(
        error_body(body),
        ApiError::new("UNAUTHENTICATED", "Authentication required")
    );

    let (status, _) = send(
        &app.router,
        Method::GET,
        "/v1/admin/subject-codes",
        Some("forged"),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

#[tokio::test]
async fn test_student_is_forbidden_from_admin_routes() {
    let app = app(&[(SubjectCode::Math101, 1)]);

    let (status, body) = send(
        &app.router,
        Method::POST,
        "/v1/admin/subject-dates",
        Some(STUDENT_TOKEN),
        Some(subject_dates("09:00", "11:00")),
    )
    .await;
    assert_eq!(status, StatusCode::FORBIDDEN);
    assert_eq!(error_body(body).code, "FORBIDDEN");
}

#[tokio::test]
async fn test_auth_checked_before_body_shape() {
    let app = app(&[]);
    let (status, _) = send(
        &app.router,
        Method::POST,
        "/v1/admin/exam-settings/bulk",
        None,
        Some("not json".to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}

// =============================================================================
// Admin routes
// =============================================================================

#[tokio::test]
async fn test_subject_codes() {
    let app = app(&[]);
    let (status, body) = send(
        &app.router,
        Method::GET,
        "/v1/admin/subject-codes",
        Some(ADMIN_TOKEN),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let codes = body["subjectCodes"].as_array().unwrap();
    assert_eq!(codes.len(), 20);
    assert_eq!(codes[0]["code"], "MATH101");
}

#[tokio::test]
async fn test_exam_settings_cover_catalog() {
    let app = app(&[(SubjectCode::Math101, 2)]);
    let (status, body) = send(
        &app.router,
        Method::GET,
        "/v1/admin/exam-settings",
        Some(ADMIN_TOKEN),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let settings = body["settings"].as_object().unwrap();
    assert_eq!(settings.len(), 20);
    assert_eq!(settings["MATH101"]["startingTime"], "2025-04-01T08:00:00Z");
    assert_eq!(settings["MATH101"]["isExamSubjectActive"], false);
    assert!(settings["MATH101"]["updatedAt"].is_string());
    assert!(settings["HIST101"].get("updatedAt").is_none());
}

#[tokio::test]
async fn test_subject_dates_update() {
    let app = app(&[(SubjectCode::Math101, 3)]);

    let (status, body) = send(
        &app.router,
        Method::POST,
        "/v1/admin/subject-dates",
        Some(ADMIN_TOKEN),
        Some(subject_dates("09:00", "11:00")),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, json!({ "success": true, "updatedCount": 3 }));

    let rows = app
        .repo
        .fetch_settings_for_code(SubjectCode::Math101)
        .await
        .unwrap();
    assert!(rows.iter().all(|r| r.starting_time == utc(2025, 5, 10, 7, 0)));
    assert_eq!(app.revalidation.paths().len(), 2);
}

#[tokio::test]
async fn test_validation_errors_are_bad_requests() {
    let app = app(&[(SubjectCode::Math101, 1)]);

    let (status, body) = send(
        &app.router,
        Method::POST,
        "/v1/admin/subject-dates",
        Some(ADMIN_TOKEN),
        Some(subject_dates("07:30", "10:00")),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(
        error_body(body),
        ApiError::new("VALIDATION", "Exam times must be between 08:00 and 18:00 SAST.")
    );

    let (status, body) = send(
        &app.router,
        Method::PUT,
        "/v1/admin/exam-settings/NOPE101",
        Some(ADMIN_TOKEN),
        Some(
            json!({
                "examDate": "2025-05-10",
                "startingTime": "09:00",
                "dueTime": "10:00",
                "isExamSubjectActive": true,
            })
            .to_string(),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(error_body(body).error, "Unknown subject code: NOPE101.");
    assert!(app.revalidation.paths().is_empty());
}

#[tokio::test]
async fn test_malformed_body_is_bad_request() {
    let app = app(&[(SubjectCode::Math101, 1)]);
    let (status, body) = send(
        &app.router,
        Method::POST,
        "/v1/admin/exam-settings/bulk",
        Some(ADMIN_TOKEN),
        Some(json!([{ "subjectCode": "MATH101" }]).to_string()),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let err = error_body(body);
    assert_eq!(err.code, "VALIDATION");
    assert!(err.error.starts_with("Invalid request: "));
}

#[tokio::test]
async fn test_bulk_update_accepts_rfc3339_dates() {
    let app = app(&[(SubjectCode::Phys101, 1)]);
    let (status, body) = send(
        &app.router,
        Method::POST,
        "/v1/admin/exam-settings/bulk",
        Some(ADMIN_TOKEN),
        Some(
            json!([{
                "subjectCode": "PHYS101",
                "examDate": "2025-05-10T00:00:00.000Z",
                "startingTime": "10:00",
                "dueTime": "12:00",
                "isExamSubjectActive": true,
            }])
            .to_string(),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["updatedCount"], 1);
}

#[tokio::test]
async fn test_stale_write_is_conflict() {
    let app = app(&[(SubjectCode::Math101, 1)]);
    let token = app.repo.all_settings()[0].updated_at;

    send(
        &app.router,
        Method::POST,
        "/v1/admin/subject-dates",
        Some(ADMIN_TOKEN),
        Some(subject_dates("09:00", "10:00")),
    )
    .await;

    let (status, body) = send(
        &app.router,
        Method::POST,
        "/v1/admin/subject-dates",
        Some(ADMIN_TOKEN),
        Some(
            json!({
                "subjectCodes": ["MATH101"],
                "examDate": "2025-05-10",
                "startingTime": "13:00",
                "dueTime": "14:00",
                "ifUnmodifiedSince": token,
            })
            .to_string(),
        ),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(error_body(body).code, "CONFLICT");
}

#[tokio::test]
async fn test_storage_failure_is_internal_error() {
    let app = app(&[(SubjectCode::Math101, 1)]);
    app.repo.set_healthy(false);

    let (status, body) = send(
        &app.router,
        Method::GET,
        "/v1/admin/exam-settings",
        Some(ADMIN_TOKEN),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(
        error_body(body),
        ApiError::new("PERSISTENCE", "Something went wrong. Please try again.")
    );
}

// =============================================================================
// Exam window
// =============================================================================

#[tokio::test]
async fn test_exam_window_for_students() {
    let app = app(&[(SubjectCode::Math101, 1)]);

    let (status, body) = send(
        &app.router,
        Method::GET,
        "/v1/subjects/MATH101/exam-window",
        Some(STUDENT_TOKEN),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["subjectCode"], "MATH101");
    assert_eq!(body["state"], "INACTIVE");
    assert_eq!(body["window"]["localStartingTime"], "10:00");

    let (status, body) = send(
        &app.router,
        Method::GET,
        "/v1/subjects/GEOG101/exam-window",
        Some(STUDENT_TOKEN),
        None,
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["state"], "NOT_SCHEDULED");

    let (status, _) = send(
        &app.router,
        Method::GET,
        "/v1/subjects/MATH101/exam-window",
        None,
        None,
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
}
