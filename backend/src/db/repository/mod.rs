//! Repository trait definitions for exam settings storage.
//!
//! - [`error`]: Error types for repository operations
//! - [`settings`]: Reading and seeding subject exam settings
//! - [`schedule`]: Bulk-by-code exam time updates
//!
//! Use the [`FullRepository`] bound when a service needs both sides:
//!
//! ```ignore
//! async fn reschedule<R: FullRepository + ?Sized>(repo: &R, changes: &[ScheduleChange]) -> RepositoryResult<usize> {
//!     let updated = repo.apply_schedule_changes(changes).await?;
//!     let rows = repo.fetch_representative_settings().await?;
//!     Ok(updated)
//! }
//! ```

pub mod error;
pub mod schedule;
pub mod settings;

pub use error::{ErrorContext, RepositoryError, RepositoryResult};

pub use schedule::ExamScheduleRepository;
pub use settings::SubjectSettingsRepository;

/// Composite trait bound for a complete repository implementation.
pub trait FullRepository: SubjectSettingsRepository + ExamScheduleRepository {}

// Blanket implementation: anything implementing both traits is a FullRepository
impl<T> FullRepository for T where T: SubjectSettingsRepository + ExamScheduleRepository {}
