//! Data Transfer Objects for the HTTP API.
//!
//! Operation payloads live in `crate::routes` and are re-exported here.

use serde::{Deserialize, Serialize};

pub use crate::routes::exam_times::{
    BulkExamTimeUpdate, SubjectDatesInput, SubjectExamTimeUpdate, UpdateOutcome,
};
pub use crate::routes::exam_window::{ExamWindow, ExamWindowState, ExamWindowStatus};
pub use crate::routes::settings::{SubjectSchedule, SubjectSettingsMap};
pub use crate::routes::subjects::{SubjectCodeInfo, SubjectCodeList};

/// Health check response.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
    /// "connected", "disconnected", or "error"
    pub database: String,
}
