//! Public API surface.
//!
//! Payload types for every coordinator operation, and the domain types they
//! are built from.

pub use crate::db::{ScheduleChange, SettingId, SubjectExamSetting};
pub use crate::models::{OffsetConvention, SastClock, SubjectCode, UnknownSubjectCode};
pub use crate::routes::exam_times::{
    BulkExamTimeUpdate, SubjectDatesInput, SubjectExamTimeUpdate, UpdateOutcome,
};
pub use crate::routes::exam_window::{ExamWindow, ExamWindowState, ExamWindowStatus};
pub use crate::routes::settings::{SubjectSchedule, SubjectSettingsMap};
pub use crate::routes::subjects::{SubjectCodeInfo, SubjectCodeList};
pub use crate::services::{
    ExamScheduleCoordinator, Identity, RequestContext, Role, ScheduleError, ValidationError,
};
