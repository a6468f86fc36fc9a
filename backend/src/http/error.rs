//! HTTP error handling and response types.

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};

use crate::services::{ScheduleError, ValidationError};

/// API error response body.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ApiError {
    /// Human-readable error message
    pub error: String,
    /// Error kind for programmatic handling
    pub code: String,
}

impl ApiError {
    pub fn new(code: impl Into<String>, error: impl Into<String>) -> Self {
        Self {
            error: error.into(),
            code: code.into(),
        }
    }
}

/// Application error type for HTTP handlers.
#[derive(Debug)]
pub enum AppError {
    Schedule(ScheduleError),
    /// Unexpected failure outside the coordinator
    Internal(String),
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::Schedule(e) => match e {
                ScheduleError::Unauthenticated => StatusCode::UNAUTHORIZED,
                ScheduleError::Forbidden => StatusCode::FORBIDDEN,
                ScheduleError::Validation(_) => StatusCode::BAD_REQUEST,
                ScheduleError::Conflict(_) => StatusCode::CONFLICT,
                ScheduleError::Persistence { .. } => StatusCode::INTERNAL_SERVER_ERROR,
            },
            AppError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let body = match self {
            AppError::Schedule(e) => ApiError::new(e.kind(), e.to_string()),
            AppError::Internal(msg) => {
                tracing::error!(error = %msg, "Internal error");
                ApiError::new("INTERNAL", crate::services::error::SOMETHING_WENT_WRONG)
            }
        };

        (status, Json(body)).into_response()
    }
}

impl From<ScheduleError> for AppError {
    fn from(err: ScheduleError) -> Self {
        AppError::Schedule(err)
    }
}

impl From<ValidationError> for AppError {
    fn from(err: ValidationError) -> Self {
        AppError::Schedule(err.into())
    }
}

/// A body that is not valid JSON of the expected shape is a validation error.
impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        ValidationError::MalformedRequest(rejection.body_text()).into()
    }
}

impl From<anyhow::Error> for AppError {
    fn from(err: anyhow::Error) -> Self {
        AppError::Internal(err.to_string())
    }
}
