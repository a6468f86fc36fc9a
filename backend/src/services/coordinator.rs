//! Exam schedule coordinator.
//!
//! Every operation runs the same pipeline: authorize the caller, validate
//! the SAST input, convert to UTC, persist through the repository, then
//! invalidate the cached exam views. Views are only invalidated once a write
//! has committed.

use chrono::{DateTime, TimeDelta, Utc};
use std::collections::BTreeMap;
use std::sync::Arc;
use tracing::info;

use super::auth::RequestContext;
use super::error::{ScheduleError, BULK_UPDATE_FAILED, SOMETHING_WENT_WRONG};
use super::revalidation::{invalidate_exam_views, ViewInvalidator};
use super::validation::{
    validate_exam_times, validate_shared_times, ExamTimeInput, ValidationError,
};
use crate::db::{self, FullRepository, ScheduleChange, SubjectExamSetting};
use crate::models::{utc_midnight_after, SastClock, SubjectCode};
use crate::routes::exam_times::{
    BulkExamTimeUpdate, SubjectDatesInput, SubjectExamTimeUpdate, UpdateOutcome,
    BULK_UPDATE_EXAM_TIMES, UPDATE_SUBJECT_DATES, UPDATE_SUBJECT_EXAM_TIME,
};
use crate::routes::exam_window::{
    ExamWindow, ExamWindowState, ExamWindowStatus, GET_EXAM_WINDOW_STATUS,
};
use crate::routes::settings::{SubjectSchedule, SubjectSettingsMap, GET_ALL_SUBJECT_EXAM_SETTINGS};
use crate::routes::subjects::SubjectCodeList;

/// Days ahead of today used for the default exam date.
pub const DEFAULT_EXAM_DAYS_AHEAD: i64 = 30;
/// Default start, hours after UTC midnight of the default date.
pub const DEFAULT_START_HOUR_UTC: i64 = 9;
/// Default due, hours after UTC midnight of the default date.
pub const DEFAULT_DUE_HOUR_UTC: i64 = 12;

pub type ScheduleResult<T> = Result<T, ScheduleError>;

/// Schedule for a catalog code with nothing stored.
pub fn default_schedule(now: DateTime<Utc>) -> SubjectSchedule {
    let exam_date = utc_midnight_after(now, DEFAULT_EXAM_DAYS_AHEAD);
    SubjectSchedule {
        exam_date,
        starting_time: exam_date + TimeDelta::hours(DEFAULT_START_HOUR_UTC),
        due_time: exam_date + TimeDelta::hours(DEFAULT_DUE_HOUR_UTC),
        is_exam_subject_active: false,
        updated_at: None,
    }
}

/// Classify a stored exam window at `now`.
pub fn window_state(setting: &SubjectExamSetting, now: DateTime<Utc>) -> ExamWindowState {
    if !setting.is_exam_subject_active {
        ExamWindowState::Inactive
    } else if now < setting.starting_time {
        ExamWindowState::Upcoming
    } else if now < setting.due_time {
        ExamWindowState::Open
    } else {
        ExamWindowState::Closed
    }
}

#[derive(Clone)]
pub struct ExamScheduleCoordinator {
    repo: Arc<dyn FullRepository>,
    clock: SastClock,
    invalidator: Arc<dyn ViewInvalidator>,
}

impl ExamScheduleCoordinator {
    pub fn new(
        repo: Arc<dyn FullRepository>,
        clock: SastClock,
        invalidator: Arc<dyn ViewInvalidator>,
    ) -> Self {
        Self {
            repo,
            clock,
            invalidator,
        }
    }

    pub fn repository(&self) -> &Arc<dyn FullRepository> {
        &self.repo
    }

    pub fn clock(&self) -> SastClock {
        self.clock
    }

    // =========================================================================
    // Reads
    // =========================================================================

    /// The subject catalog. Admin only.
    pub fn fetch_all_subject_codes(&self, ctx: &RequestContext) -> ScheduleResult<SubjectCodeList> {
        ctx.require_admin()?;
        Ok(SubjectCodeList::catalog())
    }

    /// Schedule for every catalog code, with defaults for codes not stored.
    pub async fn get_all_subject_exam_settings(
        &self,
        ctx: &RequestContext,
    ) -> ScheduleResult<SubjectSettingsMap> {
        self.get_all_subject_exam_settings_at(ctx, Utc::now()).await
    }

    /// [`Self::get_all_subject_exam_settings`] with an explicit `now`.
    pub async fn get_all_subject_exam_settings_at(
        &self,
        ctx: &RequestContext,
        now: DateTime<Utc>,
    ) -> ScheduleResult<SubjectSettingsMap> {
        ctx.require_admin()?;

        let stored = db::services::representative_settings(self.repo.as_ref())
            .await
            .map_err(|e| {
                ScheduleError::from_repository(e, GET_ALL_SUBJECT_EXAM_SETTINGS, SOMETHING_WENT_WRONG)
            })?;

        let fallback = default_schedule(now);
        let settings: BTreeMap<SubjectCode, SubjectSchedule> = SubjectCode::ALL
            .iter()
            .map(|code| {
                let schedule = stored
                    .get(code)
                    .map(SubjectSchedule::from)
                    .unwrap_or_else(|| fallback.clone());
                (*code, schedule)
            })
            .collect();

        Ok(SubjectSettingsMap { settings })
    }

    /// Whether `code`'s exam is accessible at `now`. Any authenticated caller.
    pub async fn exam_window_status(
        &self,
        ctx: &RequestContext,
        code: &str,
        now: DateTime<Utc>,
    ) -> ScheduleResult<ExamWindowStatus> {
        ctx.require_authenticated()?;
        let code: SubjectCode = code.parse().map_err(ValidationError::from)?;

        let setting = db::services::representative_setting_for_code(self.repo.as_ref(), code)
            .await
            .map_err(|e| {
                ScheduleError::from_repository(e, GET_EXAM_WINDOW_STATUS, SOMETHING_WENT_WRONG)
            })?;

        let status = match setting {
            None => ExamWindowStatus {
                subject_code: code,
                title: code.title().to_string(),
                state: ExamWindowState::NotScheduled,
                window: None,
            },
            Some(setting) => ExamWindowStatus {
                subject_code: code,
                title: setting.title.clone(),
                state: window_state(&setting, now),
                window: Some(ExamWindow {
                    exam_date: setting.exam_date,
                    starting_time: setting.starting_time,
                    due_time: setting.due_time,
                    local_starting_time: self.clock.local_hhmm(setting.starting_time),
                    local_due_time: self.clock.local_hhmm(setting.due_time),
                }),
            },
        };
        Ok(status)
    }

    // =========================================================================
    // Writes
    // =========================================================================

    /// Apply per-subject records in one transaction. Admin only.
    pub async fn bulk_update_exam_times(
        &self,
        ctx: &RequestContext,
        updates: &[BulkExamTimeUpdate],
    ) -> ScheduleResult<UpdateOutcome> {
        let admin = ctx.require_admin()?;

        let inputs: Vec<ExamTimeInput<'_>> = updates
            .iter()
            .map(|u| ExamTimeInput {
                subject_code: &u.subject_code,
                exam_date: u.exam_date,
                starting_time: &u.starting_time,
                due_time: &u.due_time,
            })
            .collect();
        let validated = validate_exam_times(&inputs)?;

        let changes: Vec<ScheduleChange> = validated
            .iter()
            .zip(updates)
            .map(|(v, u)| {
                v.to_change(&self.clock, Some(u.is_exam_subject_active), u.if_unmodified_since)
            })
            .collect();

        let updated = db::services::apply_schedule_changes(self.repo.as_ref(), &changes)
            .await
            .map_err(|e| {
                ScheduleError::from_repository(e, BULK_UPDATE_EXAM_TIMES, BULK_UPDATE_FAILED)
            })?;

        self.committed(BULK_UPDATE_EXAM_TIMES, &admin.user_id, updated);
        Ok(UpdateOutcome::updated(updated))
    }

    /// Update one subject with a single write. Admin only.
    pub async fn update_subject_exam_time(
        &self,
        ctx: &RequestContext,
        subject_code: &str,
        update: &SubjectExamTimeUpdate,
    ) -> ScheduleResult<UpdateOutcome> {
        let admin = ctx.require_admin()?;

        let validated = validate_exam_times(&[ExamTimeInput {
            subject_code,
            exam_date: update.exam_date,
            starting_time: &update.starting_time,
            due_time: &update.due_time,
        }])?;
        let change = validated[0].to_change(&self.clock, Some(update.is_exam_subject_active), None);

        let updated = db::services::update_schedule_for_code(self.repo.as_ref(), &change)
            .await
            .map_err(|e| {
                ScheduleError::from_repository(e, UPDATE_SUBJECT_EXAM_TIME, SOMETHING_WENT_WRONG)
            })?;

        self.committed(UPDATE_SUBJECT_EXAM_TIME, &admin.user_id, updated);
        Ok(UpdateOutcome::updated(updated))
    }

    /// Apply one date and time pair to several subjects. Admin only.
    pub async fn update_subject_dates(
        &self,
        ctx: &RequestContext,
        input: &SubjectDatesInput,
    ) -> ScheduleResult<UpdateOutcome> {
        let admin = ctx.require_admin()?;

        let validated = validate_shared_times(
            &input.subject_codes,
            input.exam_date,
            &input.starting_time,
            &input.due_time,
        )?;
        let changes: Vec<ScheduleChange> = validated
            .iter()
            .map(|v| v.to_change(&self.clock, input.is_exam_subject_active, input.if_unmodified_since))
            .collect();

        let updated = db::services::apply_schedule_changes(self.repo.as_ref(), &changes)
            .await
            .map_err(|e| {
                ScheduleError::from_repository(e, UPDATE_SUBJECT_DATES, SOMETHING_WENT_WRONG)
            })?;

        self.committed(UPDATE_SUBJECT_DATES, &admin.user_id, updated);
        Ok(UpdateOutcome::updated(updated))
    }

    fn committed(&self, operation: &str, user_id: &str, updated: usize) {
        invalidate_exam_views(self.invalidator.as_ref());
        info!(operation, user_id, updated, "Exam schedule updated");
    }
}
