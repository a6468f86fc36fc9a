use crate::db::RepositoryError;

use super::validation::ValidationError;

/// Generic message for a failed bulk write.
pub const BULK_UPDATE_FAILED: &str = "Failed to update exam times. Please try again.";
/// Generic message for every other storage failure.
pub const SOMETHING_WENT_WRONG: &str = "Something went wrong. Please try again.";

/// Errors returned by coordinator operations.
///
/// Every variant except `Persistence` displays a message meant for the
/// caller. `Persistence` displays only a generic message; the underlying
/// repository error is kept as the source for logging.
#[derive(Debug, thiserror::Error)]
pub enum ScheduleError {
    #[error("Authentication required")]
    Unauthenticated,

    #[error("Admin privileges required")]
    Forbidden,

    #[error(transparent)]
    Validation(#[from] ValidationError),

    #[error("{0}")]
    Conflict(String),

    #[error("{message}")]
    Persistence {
        message: &'static str,
        #[source]
        source: RepositoryError,
    },
}

impl ScheduleError {
    /// Stable machine-readable kind, used as the `code` of error bodies.
    pub fn kind(&self) -> &'static str {
        match self {
            Self::Unauthenticated => "UNAUTHENTICATED",
            Self::Forbidden => "FORBIDDEN",
            Self::Validation(_) => "VALIDATION",
            Self::Conflict(_) => "CONFLICT",
            Self::Persistence { .. } => "PERSISTENCE",
        }
    }

    /// Classify a repository failure from a write or read.
    ///
    /// Storage-side validation and conflict errors pass through with their
    /// message; anything else is logged in full and replaced by `fallback`.
    pub fn from_repository(source: RepositoryError, operation: &str, fallback: &'static str) -> Self {
        match source {
            RepositoryError::ValidationError { message, .. } => {
                Self::Validation(ValidationError::Rejected(message))
            }
            RepositoryError::ConflictError { message, context } => {
                tracing::warn!(operation, %context, "Exam settings write conflict");
                Self::Conflict(message)
            }
            source => {
                tracing::error!(operation, error = %source, "Exam settings storage failure");
                Self::Persistence {
                    message: fallback,
                    source,
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_persistence_hides_details() {
        let err = ScheduleError::from_repository(
            RepositoryError::connection("password authentication failed for user exams"),
            "bulk_update_exam_times",
            BULK_UPDATE_FAILED,
        );
        assert_eq!(err.to_string(), BULK_UPDATE_FAILED);
        assert_eq!(err.kind(), "PERSISTENCE");
        assert!(std::error::Error::source(&err).is_some());
    }

    #[test]
    fn test_storage_messages_pass_through() {
        let err = ScheduleError::from_repository(
            RepositoryError::validation("Due time must be after starting time for MATH101."),
            "bulk_update_exam_times",
            BULK_UPDATE_FAILED,
        );
        assert_eq!(err.kind(), "VALIDATION");
        assert_eq!(
            err.to_string(),
            "Due time must be after starting time for MATH101."
        );

        let err = ScheduleError::from_repository(
            RepositoryError::conflict("stale"),
            "update_subject_dates",
            SOMETHING_WENT_WRONG,
        );
        assert_eq!(err.kind(), "CONFLICT");
        assert_eq!(err.to_string(), "stale");
    }
}
