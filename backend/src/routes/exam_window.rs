use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::SubjectCode;

/// Whether a subject's exam is accessible right now.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ExamWindowState {
    /// No stored row for the code.
    NotScheduled,
    /// Scheduled, but the access gate is closed.
    Inactive,
    Upcoming,
    Open,
    Closed,
}

/// The exam window in UTC and as SAST `HH:MM`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamWindow {
    pub exam_date: DateTime<Utc>,
    pub starting_time: DateTime<Utc>,
    pub due_time: DateTime<Utc>,
    pub local_starting_time: String,
    pub local_due_time: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ExamWindowStatus {
    pub subject_code: SubjectCode,
    pub title: String,
    pub state: ExamWindowState,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub window: Option<ExamWindow>,
}

pub const GET_EXAM_WINDOW_STATUS: &str = "get_exam_window_status";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_wire_names() {
        assert_eq!(
            serde_json::to_value(ExamWindowState::NotScheduled).unwrap(),
            "NOT_SCHEDULED"
        );
        assert_eq!(serde_json::to_value(ExamWindowState::Open).unwrap(), "OPEN");
    }
}
