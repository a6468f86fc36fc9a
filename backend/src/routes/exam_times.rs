use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// One record of a bulk update. Times are SAST `HH:MM`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BulkExamTimeUpdate {
    pub subject_code: String,
    #[serde(with = "exam_date")]
    pub exam_date: NaiveDate,
    pub starting_time: String,
    pub due_time: String,
    pub is_exam_subject_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub if_unmodified_since: Option<DateTime<Utc>>,
}

/// Body of a single-subject update; the code comes from the path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectExamTimeUpdate {
    #[serde(with = "exam_date")]
    pub exam_date: NaiveDate,
    pub starting_time: String,
    pub due_time: String,
    pub is_exam_subject_active: bool,
}

/// Shared date and times applied to several subjects at once.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SubjectDatesInput {
    pub subject_codes: Vec<String>,
    #[serde(with = "exam_date")]
    pub exam_date: NaiveDate,
    pub starting_time: String,
    pub due_time: String,
    /// `None` keeps each subject's stored flag.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_exam_subject_active: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub if_unmodified_since: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateOutcome {
    pub success: bool,
    pub updated_count: usize,
}

impl UpdateOutcome {
    pub fn updated(count: usize) -> Self {
        Self {
            success: true,
            updated_count: count,
        }
    }
}

pub const BULK_UPDATE_EXAM_TIMES: &str = "bulk_update_exam_times";
pub const UPDATE_SUBJECT_EXAM_TIME: &str = "update_subject_exam_time";
pub const UPDATE_SUBJECT_DATES: &str = "update_subject_dates";

/// `examDate` on the wire: `YYYY-MM-DD`, or an RFC 3339 timestamp whose
/// calendar date is taken as written.
pub(crate) mod exam_date {
    use chrono::{DateTime, NaiveDate};
    use serde::{de, Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(date: &NaiveDate, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&date.format("%Y-%m-%d"))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<NaiveDate, D::Error> {
        let raw = String::deserialize(deserializer)?;
        parse(&raw).ok_or_else(|| de::Error::custom(format!("Invalid exam date: {}", raw)))
    }

    pub fn parse(raw: &str) -> Option<NaiveDate> {
        let raw = raw.trim();
        NaiveDate::parse_from_str(raw, "%Y-%m-%d")
            .ok()
            .or_else(|| DateTime::parse_from_rfc3339(raw).ok().map(|dt| dt.date_naive()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bulk_record_from_json() {
        let json = r#"{
            "subjectCode": "MATH101",
            "examDate": "2025-05-10",
            "startingTime": "09:00",
            "dueTime": "11:00",
            "isExamSubjectActive": true
        }"#;
        let record: BulkExamTimeUpdate = serde_json::from_str(json).unwrap();
        assert_eq!(record.exam_date, NaiveDate::from_ymd_opt(2025, 5, 10).unwrap());
        assert!(record.if_unmodified_since.is_none());
    }

    #[test]
    fn test_exam_date_accepts_rfc3339() {
        assert_eq!(
            exam_date::parse("2025-05-10T00:00:00.000Z"),
            NaiveDate::from_ymd_opt(2025, 5, 10)
        );
        assert_eq!(exam_date::parse("10/05/2025"), None);
    }

    #[test]
    fn test_subject_dates_active_is_optional() {
        let json = r#"{
            "subjectCodes": ["MATH101", "PHYS101"],
            "examDate": "2025-05-10",
            "startingTime": "09:00",
            "dueTime": "11:00"
        }"#;
        let input: SubjectDatesInput = serde_json::from_str(json).unwrap();
        assert_eq!(input.subject_codes.len(), 2);
        assert_eq!(input.is_exam_subject_active, None);
    }

    #[test]
    fn test_outcome_json() {
        let json = serde_json::to_value(UpdateOutcome::updated(3)).unwrap();
        assert_eq!(json, serde_json::json!({"success": true, "updatedCount": 3}));
    }
}
