//! Storage records for subject exam settings.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::SubjectCode;

crate::define_id_type!(i64, SettingId);

/// One stored subject/student pairing with its exam window.
///
/// Many rows may share a subject code; every coordinator write updates all
/// rows of a code together.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SubjectExamSetting {
    pub id: SettingId,
    pub subject_code: SubjectCode,
    pub title: String,
    pub user_id: Option<String>,
    /// Calendar date at UTC midnight.
    pub exam_date: DateTime<Utc>,
    pub starting_time: DateTime<Utc>,
    pub due_time: DateTime<Utc>,
    pub is_exam_subject_active: bool,
    pub created_at: DateTime<Utc>,
    /// Set on every write; compared against `ScheduleChange::if_unmodified_since`.
    pub updated_at: DateTime<Utc>,
}

/// A row to insert when seeding storage.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewSubjectExamSetting {
    pub subject_code: SubjectCode,
    pub title: String,
    pub user_id: Option<String>,
    pub exam_date: DateTime<Utc>,
    pub starting_time: DateTime<Utc>,
    pub due_time: DateTime<Utc>,
    pub is_exam_subject_active: bool,
}

impl NewSubjectExamSetting {
    /// Build a seed row titled from the catalog.
    pub fn for_code(
        subject_code: SubjectCode,
        exam_date: DateTime<Utc>,
        starting_time: DateTime<Utc>,
        due_time: DateTime<Utc>,
    ) -> Self {
        Self {
            subject_code,
            title: subject_code.title().to_string(),
            user_id: None,
            exam_date,
            starting_time,
            due_time,
            is_exam_subject_active: false,
        }
    }

    pub fn with_user(mut self, user_id: impl Into<String>) -> Self {
        self.user_id = Some(user_id.into());
        self
    }

    pub fn active(mut self, active: bool) -> Self {
        self.is_exam_subject_active = active;
        self
    }
}

/// An already validated and converted update for every row of one code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleChange {
    pub subject_code: SubjectCode,
    /// UTC midnight of the exam date.
    pub exam_date: DateTime<Utc>,
    pub starting_time: DateTime<Utc>,
    pub due_time: DateTime<Utc>,
    /// `None` leaves the stored flag unchanged.
    pub is_exam_subject_active: Option<bool>,
    pub if_unmodified_since: Option<DateTime<Utc>>,
}

impl ScheduleChange {
    /// Message used by both the validator and the storage-side re-check.
    pub fn due_before_start_message(&self) -> String {
        format!(
            "Due time must be after starting time for {}.",
            self.subject_code
        )
    }

    pub fn conflict_message(&self) -> String {
        format!(
            "Exam settings for {} were modified by another user. Reload and try again.",
            self.subject_code
        )
    }
}
