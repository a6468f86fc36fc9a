//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::{Arc, Mutex};

use chrono::{DateTime, NaiveDate, TimeZone, Utc};
use exam_schedule::db::{LocalRepository, NewSubjectExamSetting};
use exam_schedule::models::{SastClock, SubjectCode};
use exam_schedule::services::{
    ExamScheduleCoordinator, Identity, RequestContext, Role, ViewInvalidator,
};

static ENV_LOCK: Mutex<()> = Mutex::new(());

/// Runs `f` with environment variables temporarily modified.
///
/// This is panic-safe (restores variables on unwind) and also serializes access to
/// process-global env vars to avoid flaky tests when Rust runs tests in parallel.
///
/// `changes` is a list of `(key, value)` pairs:
/// - `Some(v)` sets the variable to `v`
/// - `None` removes the variable
pub fn with_scoped_env<F, R>(changes: &[(&str, Option<&str>)], f: F) -> R
where
    F: FnOnce() -> R,
{
    let _lock = ENV_LOCK.lock().expect("ENV_LOCK poisoned");
    let _guard = ScopedEnv::new(changes);
    f()
}

struct ScopedEnv {
    snapshot: Vec<(String, Option<String>)>,
}

impl ScopedEnv {
    fn new(changes: &[(&str, Option<&str>)]) -> Self {
        let keys: HashSet<&str> = changes.iter().map(|(k, _)| *k).collect();
        let snapshot = keys
            .into_iter()
            .map(|k| (k.to_string(), std::env::var(k).ok()))
            .collect::<Vec<_>>();

        for (k, v) in changes {
            match v {
                Some(val) => std::env::set_var(k, val),
                None => std::env::remove_var(k),
            }
        }

        Self { snapshot }
    }
}

impl Drop for ScopedEnv {
    fn drop(&mut self) {
        for (k, v) in self.snapshot.drain(..) {
            match v {
                Some(val) => std::env::set_var(&k, val),
                None => std::env::remove_var(&k),
            }
        }
    }
}

// =============================================================================
// Fixtures
// =============================================================================

/// Records invalidated view paths so tests can check what a write refreshed.
#[derive(Debug, Clone, Default)]
pub struct RevalidationLog {
    paths: Arc<parking_lot::Mutex<Vec<String>>>,
}

impl RevalidationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn paths(&self) -> Vec<String> {
        self.paths.lock().clone()
    }

    pub fn clear(&self) {
        self.paths.lock().clear();
    }
}

impl ViewInvalidator for RevalidationLog {
    fn invalidate(&self, path: &str) {
        self.paths.lock().push(path.to_string());
    }
}

/// 2025-05-10, the exam date used across the suite.
pub fn exam_day() -> NaiveDate {
    NaiveDate::from_ymd_opt(2025, 5, 10).unwrap()
}

pub fn utc(y: i32, m: u32, d: u32, h: u32, min: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(y, m, d, h, min, 0).unwrap()
}

/// Local repository with `count` rows per code, inactive, 08:00-10:00 UTC on
/// 2025-04-01.
pub fn seeded_repo(rows: &[(SubjectCode, usize)]) -> LocalRepository {
    let repo = LocalRepository::new();
    for (code, count) in rows {
        for n in 0..*count {
            repo.insert_setting_impl(
                NewSubjectExamSetting::for_code(
                    *code,
                    utc(2025, 4, 1, 0, 0),
                    utc(2025, 4, 1, 8, 0),
                    utc(2025, 4, 1, 10, 0),
                )
                .with_user(format!("student-{}", n + 1)),
            );
        }
    }
    repo
}

/// Coordinator over `repo` with the default clock, plus its invalidation log.
pub fn coordinator(repo: &LocalRepository) -> (ExamScheduleCoordinator, RevalidationLog) {
    coordinator_with_clock(repo, SastClock::default())
}

pub fn coordinator_with_clock(
    repo: &LocalRepository,
    clock: SastClock,
) -> (ExamScheduleCoordinator, RevalidationLog) {
    let log = RevalidationLog::new();
    let coordinator =
        ExamScheduleCoordinator::new(Arc::new(repo.clone()), clock, Arc::new(log.clone()));
    (coordinator, log)
}

pub fn admin() -> RequestContext {
    RequestContext::admin("admin-1")
}

pub fn student() -> RequestContext {
    RequestContext::authenticated(Identity::new("student-1", Role::Student))
}

pub fn anonymous() -> RequestContext {
    RequestContext::anonymous()
}
