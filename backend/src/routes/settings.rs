use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::db::SubjectExamSetting;
use crate::models::SubjectCode;

/// Exam window of one subject as stored (UTC).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectSchedule {
    pub exam_date: DateTime<Utc>,
    pub starting_time: DateTime<Utc>,
    pub due_time: DateTime<Utc>,
    pub is_exam_subject_active: bool,
    /// Concurrency token to echo back as `ifUnmodifiedSince`. Absent for
    /// synthesized defaults.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<DateTime<Utc>>,
}

impl From<&SubjectExamSetting> for SubjectSchedule {
    fn from(row: &SubjectExamSetting) -> Self {
        Self {
            exam_date: row.exam_date,
            starting_time: row.starting_time,
            due_time: row.due_time,
            is_exam_subject_active: row.is_exam_subject_active,
            updated_at: Some(row.updated_at),
        }
    }
}

/// Schedule for every catalog code.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectSettingsMap {
    pub settings: BTreeMap<SubjectCode, SubjectSchedule>,
}

pub const GET_ALL_SUBJECT_EXAM_SETTINGS: &str = "get_all_subject_exam_settings";

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_default_schedule_omits_token() {
        let day = Utc.with_ymd_and_hms(2025, 6, 1, 0, 0, 0).unwrap();
        let schedule = SubjectSchedule {
            exam_date: day,
            starting_time: day,
            due_time: day,
            is_exam_subject_active: false,
            updated_at: None,
        };
        let json = serde_json::to_value(&schedule).unwrap();
        assert!(json.get("updatedAt").is_none());
        assert_eq!(json["isExamSubjectActive"], false);
        assert_eq!(json["examDate"], "2025-06-01T00:00:00Z");
    }
}
