//! Property tests for exam time validation.

use chrono::{NaiveDate, Timelike};
use exam_schedule::models::{SastClock, SubjectCode};
use exam_schedule::services::validation::{
    validate_exam_times, ExamTimeInput, ValidationError, BUSINESS_HOURS_END, BUSINESS_HOURS_START,
};
use proptest::prelude::*;

fn hhmm(minutes: u32) -> String {
    format!("{:02}:{:02}", minutes / 60, minutes % 60)
}

fn validate(date: NaiveDate, start: &str, due: &str) -> Result<(), ValidationError> {
    validate_exam_times(&[ExamTimeInput {
        subject_code: "STAT101",
        exam_date: date,
        starting_time: start,
        due_time: due,
    }])
    .map(|_| ())
}

fn exam_dates() -> impl Strategy<Value = NaiveDate> {
    (0i64..3650).prop_map(|offset| {
        NaiveDate::from_ymd_opt(2024, 1, 1).unwrap() + chrono::TimeDelta::days(offset)
    })
}

proptest! {
    #[test]
    fn ordered_times_within_hours_are_accepted(
        date in exam_dates(),
        start in (BUSINESS_HOURS_START * 60)..((BUSINESS_HOURS_END + 1) * 60 - 1),
        gap in 1u32..600,
    ) {
        let due = (start + gap).min((BUSINESS_HOURS_END + 1) * 60 - 1);
        prop_assume!(due > start);

        let validated = validate_exam_times(&[ExamTimeInput {
            subject_code: "STAT101",
            exam_date: date,
            starting_time: &hhmm(start),
            due_time: &hhmm(due),
        }]).unwrap();

        let change = validated[0].to_change(&SastClock::default(), None, None);
        prop_assert_eq!(change.subject_code, SubjectCode::Stat101);
        prop_assert!(change.due_time > change.starting_time);
        prop_assert_eq!(change.exam_date.date_naive(), date);
    }

    #[test]
    fn hours_outside_window_are_rejected(
        date in exam_dates(),
        hour in prop_oneof![0u32..BUSINESS_HOURS_START, (BUSINESS_HOURS_END + 1)..24],
        minute in 0u32..60,
    ) {
        let early_or_late = hhmm(hour * 60 + minute);
        let (start, due) = if hour < BUSINESS_HOURS_START {
            (early_or_late, "12:00".to_string())
        } else {
            ("12:00".to_string(), early_or_late)
        };
        prop_assert_eq!(
            validate(date, &start, &due),
            Err(ValidationError::OutsideBusinessHours)
        );
    }

    #[test]
    fn due_not_after_start_is_rejected(
        date in exam_dates(),
        start in (BUSINESS_HOURS_START * 60)..((BUSINESS_HOURS_END + 1) * 60),
        back in 0u32..120,
    ) {
        let due = start.saturating_sub(back).max(BUSINESS_HOURS_START * 60);
        prop_assert_eq!(
            validate(date, &hhmm(start), &hhmm(due)),
            Err(ValidationError::DueBeforeStart(SubjectCode::Stat101))
        );
    }

    #[test]
    fn stored_start_is_two_hours_before_local(
        date in exam_dates(),
        start in (BUSINESS_HOURS_START * 60)..(BUSINESS_HOURS_END * 60),
    ) {
        let validated = validate_exam_times(&[ExamTimeInput {
            subject_code: "STAT101",
            exam_date: date,
            starting_time: &hhmm(start),
            due_time: &hhmm(start + 30),
        }]).unwrap();
        let change = validated[0].to_change(&SastClock::default(), None, None);
        let utc_minutes = change.starting_time.hour() * 60 + change.starting_time.minute();
        prop_assert_eq!(utc_minutes + 120, start);
    }
}
