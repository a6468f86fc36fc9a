//! Repository-agnostic database operations.
//!
//! These functions work with any [`FullRepository`] and add the logging and
//! shaping that should not differ between storage backends. The coordinator
//! in `crate::services` calls these rather than the traits directly.

use std::collections::BTreeMap;

use tracing::{debug, info};

use super::models::{ScheduleChange, SubjectExamSetting};
use super::repository::{FullRepository, RepositoryResult};
use crate::models::SubjectCode;

// ==================== Health & Connection ====================

/// Check if the storage backend is healthy.
pub async fn health_check<R: FullRepository + ?Sized>(repo: &R) -> RepositoryResult<bool> {
    repo.health_check().await
}

// ==================== Reads ====================

/// Representative row per stored subject code, keyed by code.
pub async fn representative_settings<R: FullRepository + ?Sized>(
    repo: &R,
) -> RepositoryResult<BTreeMap<SubjectCode, SubjectExamSetting>> {
    let rows = repo.fetch_representative_settings().await?;
    debug!(count = rows.len(), "Fetched representative exam settings");
    Ok(rows.into_iter().map(|r| (r.subject_code, r)).collect())
}

/// Representative row for one code, if any row is stored.
pub async fn representative_setting_for_code<R: FullRepository + ?Sized>(
    repo: &R,
    code: SubjectCode,
) -> RepositoryResult<Option<SubjectExamSetting>> {
    let rows = repo.fetch_settings_for_code(code).await?;
    Ok(rows.into_iter().min_by_key(|r| r.id))
}

// ==================== Writes ====================

/// Apply a batch of changes atomically. Returns total rows updated.
pub async fn apply_schedule_changes<R: FullRepository + ?Sized>(
    repo: &R,
    changes: &[ScheduleChange],
) -> RepositoryResult<usize> {
    if changes.is_empty() {
        return Ok(0);
    }
    let updated = repo.apply_schedule_changes(changes).await?;
    info!(
        subjects = changes.len(),
        rows = updated,
        "Applied exam schedule changes"
    );
    Ok(updated)
}

/// Apply one change without a transaction. Returns rows updated.
pub async fn update_schedule_for_code<R: FullRepository + ?Sized>(
    repo: &R,
    change: &ScheduleChange,
) -> RepositoryResult<usize> {
    let updated = repo.update_schedule_for_code(change).await?;
    info!(
        subject_code = %change.subject_code,
        rows = updated,
        "Updated exam schedule for subject"
    );
    Ok(updated)
}
