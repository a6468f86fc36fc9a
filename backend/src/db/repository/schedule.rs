//! Write side: applying exam time changes by subject code.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::db::models::ScheduleChange;

/// Repository trait for exam schedule updates.
#[async_trait]
pub trait ExamScheduleRepository: Send + Sync {
    /// Apply every change in order inside one transaction.
    ///
    /// For each change the implementation re-checks `due_time > starting_time`
    /// (returning `RepositoryError::ValidationError`) and, when
    /// `if_unmodified_since` is set, fails with `RepositoryError::ConflictError`
    /// if any row of the code was updated later. Either error, or any storage
    /// failure, leaves every row untouched.
    ///
    /// # Returns
    /// * `Ok(usize)` - Total number of rows updated across all changes
    async fn apply_schedule_changes(&self, changes: &[ScheduleChange]) -> RepositoryResult<usize>;

    /// Update every row of one code with a single statement, no transaction.
    ///
    /// Returns the number of rows updated, which is zero for an unknown code.
    async fn update_schedule_for_code(&self, change: &ScheduleChange) -> RepositoryResult<usize>;
}
