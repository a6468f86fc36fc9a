use chrono::{DateTime, Utc};
use diesel::prelude::*;

use super::schema::subject_exam_settings;
use crate::db::models::{NewSubjectExamSetting, ScheduleChange, SettingId, SubjectExamSetting};
use crate::models::SubjectCode;

#[derive(Debug, Clone, Queryable, Selectable)]
#[diesel(table_name = subject_exam_settings)]
#[diesel(check_for_backend(diesel::pg::Pg))]
pub struct SubjectExamSettingRow {
    pub id: i64,
    pub subject_code: String,
    pub title: String,
    pub user_id: Option<String>,
    pub exam_date: DateTime<Utc>,
    pub starting_time: DateTime<Utc>,
    pub due_time: DateTime<Utc>,
    pub is_exam_subject_active: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl SubjectExamSettingRow {
    /// `None` when the stored code is not in the catalog.
    pub fn into_setting(self) -> Option<SubjectExamSetting> {
        let subject_code = self.subject_code.parse::<SubjectCode>().ok()?;
        Some(SubjectExamSetting {
            id: SettingId(self.id),
            subject_code,
            title: self.title,
            user_id: self.user_id,
            exam_date: self.exam_date,
            starting_time: self.starting_time,
            due_time: self.due_time,
            is_exam_subject_active: self.is_exam_subject_active,
            created_at: self.created_at,
            updated_at: self.updated_at,
        })
    }
}

#[derive(Debug, Clone, Insertable)]
#[diesel(table_name = subject_exam_settings)]
pub struct NewSubjectExamSettingRow {
    pub subject_code: String,
    pub title: String,
    pub user_id: Option<String>,
    pub exam_date: DateTime<Utc>,
    pub starting_time: DateTime<Utc>,
    pub due_time: DateTime<Utc>,
    pub is_exam_subject_active: bool,
}

impl From<NewSubjectExamSetting> for NewSubjectExamSettingRow {
    fn from(setting: NewSubjectExamSetting) -> Self {
        Self {
            subject_code: setting.subject_code.as_str().to_string(),
            title: setting.title,
            user_id: setting.user_id,
            exam_date: setting.exam_date,
            starting_time: setting.starting_time,
            due_time: setting.due_time,
            is_exam_subject_active: setting.is_exam_subject_active,
        }
    }
}

/// Columns written by a schedule change. A `None` active flag is skipped.
#[derive(Debug, Clone, AsChangeset)]
#[diesel(table_name = subject_exam_settings)]
pub struct ScheduleChangeset {
    pub exam_date: DateTime<Utc>,
    pub starting_time: DateTime<Utc>,
    pub due_time: DateTime<Utc>,
    pub is_exam_subject_active: Option<bool>,
    pub updated_at: DateTime<Utc>,
}

impl ScheduleChangeset {
    pub fn from_change(change: &ScheduleChange, updated_at: DateTime<Utc>) -> Self {
        Self {
            exam_date: change.exam_date,
            starting_time: change.starting_time,
            due_time: change.due_time,
            is_exam_subject_active: change.is_exam_subject_active,
            updated_at,
        }
    }
}
