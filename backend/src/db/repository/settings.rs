//! Read side: stored exam settings per subject code.

use async_trait::async_trait;

use super::error::RepositoryResult;
use crate::db::models::{NewSubjectExamSetting, SettingId, SubjectExamSetting};
use crate::models::SubjectCode;

/// Repository trait for reading and seeding subject exam settings.
///
/// # Thread Safety
/// Implementations must be `Send + Sync` to work with async Rust.
#[async_trait]
pub trait SubjectSettingsRepository: Send + Sync {
    /// Check if the storage backend is reachable.
    async fn health_check(&self) -> RepositoryResult<bool>;

    /// One representative row per distinct stored subject code.
    ///
    /// The representative is the row with the lowest id, except that its
    /// `updated_at` is the latest `updated_at` of any row of that code, so it
    /// can be echoed back as `ifUnmodifiedSince`. Order is by subject code.
    async fn fetch_representative_settings(&self) -> RepositoryResult<Vec<SubjectExamSetting>>;

    /// All rows stored for a subject code, by ascending id. Empty if none.
    async fn fetch_settings_for_code(
        &self,
        code: SubjectCode,
    ) -> RepositoryResult<Vec<SubjectExamSetting>>;

    /// Insert a row. Used by the enrolment collaborator and test fixtures.
    async fn insert_setting(&self, setting: NewSubjectExamSetting) -> RepositoryResult<SettingId>;
}
