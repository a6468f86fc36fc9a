//! Exam time validation shared by every update entry point.
//!
//! Rules are applied in order and the first failure rejects the whole batch:
//!
//! 1. At least one subject code, none empty, all in the catalog, no repeats.
//! 2. Both times match `HH:MM`.
//! 3. Start and due, added to local midnight of the exam date, stay on that date.
//! 4. The hour of start and due lies in `[8, 18]`.
//! 5. Due is strictly after start.

use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, TimeDelta, Timelike, Utc};
use regex::Regex;
use std::collections::BTreeSet;
use std::sync::LazyLock;

use crate::db::ScheduleChange;
use crate::models::{utc_midnight, SastClock, SubjectCode, UnknownSubjectCode};

/// First hour (inclusive) of the exam business-hours window.
pub const BUSINESS_HOURS_START: u32 = 8;
/// Last hour (inclusive) of the exam business-hours window.
pub const BUSINESS_HOURS_END: u32 = 18;

static TIME_PATTERN: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\d{2}:\d{2}$").expect("time pattern is valid"));

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("At least one subject code is required.")]
    NoSubjectCodes,

    #[error("Subject code must not be empty.")]
    EmptySubjectCode,

    #[error(transparent)]
    UnknownSubjectCode(#[from] UnknownSubjectCode),

    #[error("Subject code {0} appears more than once.")]
    DuplicateSubjectCode(SubjectCode),

    #[error("Time must be in HH:MM format: {0}")]
    BadTimeFormat(String),

    #[error("Exam times must be on the same day as the exam date.")]
    NotSameDay,

    #[error("Exam times must be between 08:00 and 18:00 SAST.")]
    OutsideBusinessHours,

    #[error("Due time must be after starting time for {0}.")]
    DueBeforeStart(SubjectCode),

    /// Request body did not have the expected shape.
    #[error("Invalid request: {0}")]
    MalformedRequest(String),

    /// A record rejected by the storage-side re-check, message verbatim.
    #[error("{0}")]
    Rejected(String),
}

/// Raw exam time fields as entered by an administrator.
#[derive(Debug, Clone, Copy)]
pub struct ExamTimeInput<'a> {
    pub subject_code: &'a str,
    pub exam_date: NaiveDate,
    pub starting_time: &'a str,
    pub due_time: &'a str,
}

/// A record that passed every rule, still in SAST civil time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ValidatedExamTime {
    pub subject_code: SubjectCode,
    pub exam_date: NaiveDate,
    pub local_start: NaiveDateTime,
    pub local_due: NaiveDateTime,
}

impl ValidatedExamTime {
    /// Convert to the stored UTC form.
    pub fn to_change(
        &self,
        clock: &SastClock,
        is_exam_subject_active: Option<bool>,
        if_unmodified_since: Option<DateTime<Utc>>,
    ) -> ScheduleChange {
        ScheduleChange {
            subject_code: self.subject_code,
            exam_date: utc_midnight(self.exam_date),
            starting_time: clock.local_to_utc(self.local_start),
            due_time: clock.local_to_utc(self.local_due),
            is_exam_subject_active,
            if_unmodified_since,
        }
    }
}

/// Parse `HH:MM` into minutes past midnight.
///
/// Values are not range-checked: "09:75" is 615 minutes and "24:30" rolls
/// past midnight, which rule 3 then rejects.
pub fn parse_hhmm(raw: &str) -> Result<i64, ValidationError> {
    if !TIME_PATTERN.is_match(raw) {
        return Err(ValidationError::BadTimeFormat(raw.to_string()));
    }
    let (hours, minutes) = raw
        .split_once(':')
        .ok_or_else(|| ValidationError::BadTimeFormat(raw.to_string()))?;
    let hours: i64 = hours
        .parse()
        .map_err(|_| ValidationError::BadTimeFormat(raw.to_string()))?;
    let minutes: i64 = minutes
        .parse()
        .map_err(|_| ValidationError::BadTimeFormat(raw.to_string()))?;
    Ok(hours * 60 + minutes)
}

/// Local civil time `minutes` after midnight of `date`.
pub fn combine(date: NaiveDate, minutes: i64) -> NaiveDateTime {
    date.and_time(NaiveTime::MIN) + TimeDelta::minutes(minutes)
}

fn within_business_hours(local: NaiveDateTime) -> bool {
    (BUSINESS_HOURS_START..=BUSINESS_HOURS_END).contains(&local.hour())
}

fn check_codes<'a>(codes: impl IntoIterator<Item = &'a str>) -> Result<Vec<SubjectCode>, ValidationError> {
    let mut parsed = Vec::new();
    let mut seen = BTreeSet::new();
    for raw in codes {
        if raw.trim().is_empty() {
            return Err(ValidationError::EmptySubjectCode);
        }
        let code = raw.parse::<SubjectCode>()?;
        if !seen.insert(code) {
            return Err(ValidationError::DuplicateSubjectCode(code));
        }
        parsed.push(code);
    }
    if parsed.is_empty() {
        return Err(ValidationError::NoSubjectCodes);
    }
    Ok(parsed)
}

fn check_times(
    code: SubjectCode,
    exam_date: NaiveDate,
    starting_time: &str,
    due_time: &str,
) -> Result<ValidatedExamTime, ValidationError> {
    let start_minutes = parse_hhmm(starting_time)?;
    let due_minutes = parse_hhmm(due_time)?;

    let local_start = combine(exam_date, start_minutes);
    let local_due = combine(exam_date, due_minutes);

    if local_start.date() != exam_date || local_due.date() != exam_date {
        return Err(ValidationError::NotSameDay);
    }

    if !within_business_hours(local_start) || !within_business_hours(local_due) {
        return Err(ValidationError::OutsideBusinessHours);
    }

    if local_due <= local_start {
        return Err(ValidationError::DueBeforeStart(code));
    }

    Ok(ValidatedExamTime {
        subject_code: code,
        exam_date,
        local_start,
        local_due,
    })
}

/// Validate a batch of per-subject records.
pub fn validate_exam_times(
    inputs: &[ExamTimeInput<'_>],
) -> Result<Vec<ValidatedExamTime>, ValidationError> {
    let codes = check_codes(inputs.iter().map(|i| i.subject_code))?;

    codes
        .into_iter()
        .zip(inputs)
        .map(|(code, input)| check_times(code, input.exam_date, input.starting_time, input.due_time))
        .collect()
}

/// Validate one shared date and time pair applied to several codes.
///
/// An ordering failure names the first code.
pub fn validate_shared_times(
    subject_codes: &[String],
    exam_date: NaiveDate,
    starting_time: &str,
    due_time: &str,
) -> Result<Vec<ValidatedExamTime>, ValidationError> {
    let inputs: Vec<ExamTimeInput<'_>> = subject_codes
        .iter()
        .map(|code| ExamTimeInput {
            subject_code: code,
            exam_date,
            starting_time,
            due_time,
        })
        .collect();
    validate_exam_times(&inputs)
}
