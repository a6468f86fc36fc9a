//! In-memory local repository implementation.
//!
//! Stores subject exam settings in a `Vec` behind a lock. Bulk changes are
//! staged on a copy of the rows and swapped in only when every change
//! succeeds, which gives the same all-or-nothing behaviour as a database
//! transaction.

use async_trait::async_trait;
use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::RwLock;
use std::collections::BTreeMap;
use std::sync::Arc;

use crate::db::models::{NewSubjectExamSetting, ScheduleChange, SettingId, SubjectExamSetting};
use crate::db::repository::{
    ErrorContext, ExamScheduleRepository, RepositoryError, RepositoryResult,
    SubjectSettingsRepository,
};
use crate::models::SubjectCode;

/// In-memory local repository.
///
/// # Example
/// ```
/// use chrono::{TimeZone, Utc};
/// use exam_schedule::db::repositories::LocalRepository;
/// use exam_schedule::db::NewSubjectExamSetting;
/// use exam_schedule::models::SubjectCode;
///
/// let repo = LocalRepository::new();
/// let day = Utc.with_ymd_and_hms(2025, 5, 10, 0, 0, 0).unwrap();
/// repo.insert_setting_impl(NewSubjectExamSetting::for_code(
///     SubjectCode::Math101,
///     day,
///     Utc.with_ymd_and_hms(2025, 5, 10, 7, 0, 0).unwrap(),
///     Utc.with_ymd_and_hms(2025, 5, 10, 9, 0, 0).unwrap(),
/// ));
/// assert_eq!(repo.len(), 1);
/// ```
#[derive(Clone)]
pub struct LocalRepository {
    data: Arc<RwLock<LocalData>>,
}

struct LocalData {
    rows: Vec<SubjectExamSetting>,
    next_id: i64,
    last_write: Option<DateTime<Utc>>,
    is_healthy: bool,
}

impl Default for LocalData {
    fn default() -> Self {
        Self {
            rows: Vec::new(),
            next_id: 1,
            last_write: None,
            is_healthy: true,
        }
    }
}

impl LocalData {
    /// Write timestamp, strictly increasing across writes.
    fn stamp(&mut self) -> DateTime<Utc> {
        let now = Utc::now();
        let stamp = match self.last_write {
            Some(last) if now <= last => last + TimeDelta::microseconds(1),
            _ => now,
        };
        self.last_write = Some(stamp);
        stamp
    }
}

impl LocalRepository {
    /// Create a new empty local repository.
    pub fn new() -> Self {
        Self {
            data: Arc::new(RwLock::new(LocalData::default())),
        }
    }

    /// Insert a row synchronously. Returns the assigned id.
    pub fn insert_setting_impl(&self, setting: NewSubjectExamSetting) -> SettingId {
        let mut data = self.data.write();
        let id = SettingId::new(data.next_id);
        data.next_id += 1;
        let now = data.stamp();

        data.rows.push(SubjectExamSetting {
            id,
            subject_code: setting.subject_code,
            title: setting.title,
            user_id: setting.user_id,
            exam_date: setting.exam_date,
            starting_time: setting.starting_time,
            due_time: setting.due_time,
            is_exam_subject_active: setting.is_exam_subject_active,
            created_at: now,
            updated_at: now,
        });
        id
    }

    /// Snapshot of every stored row, by id.
    pub fn all_settings(&self) -> Vec<SubjectExamSetting> {
        self.data.read().rows.clone()
    }

    pub fn len(&self) -> usize {
        self.data.read().rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Set the health status. An unhealthy repository fails every operation.
    pub fn set_healthy(&self, healthy: bool) {
        self.data.write().is_healthy = healthy;
    }

    /// Clear all data from the repository.
    pub fn clear(&self) {
        let mut data = self.data.write();
        *data = LocalData {
            is_healthy: data.is_healthy,
            ..Default::default()
        };
    }

    fn check_health(data: &LocalData, operation: &str) -> RepositoryResult<()> {
        if !data.is_healthy {
            return Err(RepositoryError::connection_with_context(
                "Database is not healthy",
                ErrorContext::new(operation),
            ));
        }
        Ok(())
    }

    fn apply_change(
        rows: &mut [SubjectExamSetting],
        change: &ScheduleChange,
        stamp: DateTime<Utc>,
    ) -> usize {
        let mut updated = 0;
        for row in rows
            .iter_mut()
            .filter(|r| r.subject_code == change.subject_code)
        {
            row.exam_date = change.exam_date;
            row.starting_time = change.starting_time;
            row.due_time = change.due_time;
            if let Some(active) = change.is_exam_subject_active {
                row.is_exam_subject_active = active;
            }
            row.updated_at = stamp;
            updated += 1;
        }
        updated
    }
}

impl Default for LocalRepository {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl SubjectSettingsRepository for LocalRepository {
    async fn health_check(&self) -> RepositoryResult<bool> {
        Ok(self.data.read().is_healthy)
    }

    async fn fetch_representative_settings(&self) -> RepositoryResult<Vec<SubjectExamSetting>> {
        let data = self.data.read();
        Self::check_health(&data, "fetch_representative_settings")?;

        let mut by_code: BTreeMap<&'static str, SubjectExamSetting> = BTreeMap::new();
        for row in &data.rows {
            by_code
                .entry(row.subject_code.as_str())
                .and_modify(|current| {
                    let latest = current.updated_at.max(row.updated_at);
                    if row.id < current.id {
                        *current = row.clone();
                    }
                    current.updated_at = latest;
                })
                .or_insert_with(|| row.clone());
        }
        Ok(by_code.into_values().collect())
    }

    async fn fetch_settings_for_code(
        &self,
        code: SubjectCode,
    ) -> RepositoryResult<Vec<SubjectExamSetting>> {
        let data = self.data.read();
        Self::check_health(&data, "fetch_settings_for_code")?;

        let mut rows: Vec<SubjectExamSetting> = data
            .rows
            .iter()
            .filter(|r| r.subject_code == code)
            .cloned()
            .collect();
        rows.sort_by_key(|r| r.id);
        Ok(rows)
    }

    async fn insert_setting(&self, setting: NewSubjectExamSetting) -> RepositoryResult<SettingId> {
        Self::check_health(&self.data.read(), "insert_setting")?;
        Ok(self.insert_setting_impl(setting))
    }
}

#[async_trait]
impl ExamScheduleRepository for LocalRepository {
    async fn apply_schedule_changes(&self, changes: &[ScheduleChange]) -> RepositoryResult<usize> {
        let mut data = self.data.write();
        Self::check_health(&data, "apply_schedule_changes")?;

        let stamp = data.stamp();
        let mut staged = data.rows.clone();
        let mut total = 0;

        for change in changes {
            if change.due_time <= change.starting_time {
                return Err(RepositoryError::validation_with_context(
                    change.due_before_start_message(),
                    ErrorContext::new("apply_schedule_changes")
                        .with_entity("subject_exam_setting")
                        .with_entity_id(change.subject_code),
                ));
            }

            if let Some(token) = change.if_unmodified_since {
                let stale = staged
                    .iter()
                    .any(|r| r.subject_code == change.subject_code && r.updated_at > token);
                if stale {
                    return Err(RepositoryError::conflict_with_context(
                        change.conflict_message(),
                        ErrorContext::new("apply_schedule_changes")
                            .with_entity("subject_exam_setting")
                            .with_entity_id(change.subject_code)
                            .with_details(format!("if_unmodified_since={}", token.to_rfc3339())),
                    ));
                }
            }

            total += Self::apply_change(&mut staged, change, stamp);
        }

        data.rows = staged;
        Ok(total)
    }

    async fn update_schedule_for_code(&self, change: &ScheduleChange) -> RepositoryResult<usize> {
        let mut data = self.data.write();
        Self::check_health(&data, "update_schedule_for_code")?;

        let stamp = data.stamp();
        Ok(Self::apply_change(&mut data.rows, change, stamp))
    }
}
