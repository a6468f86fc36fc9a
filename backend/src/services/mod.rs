//! Service layer: authorization, validation and the exam schedule coordinator.
//!
//! Services sit between the HTTP handlers and the `db` module. They own the
//! business rules and never expose storage errors to callers.

pub mod auth;
pub mod coordinator;
pub mod error;
pub mod revalidation;
pub mod validation;

pub use auth::{Identity, RequestContext, Role};
pub use coordinator::{default_schedule, window_state, ExamScheduleCoordinator, ScheduleResult};
pub use error::ScheduleError;
pub use revalidation::{TracingInvalidator, ViewInvalidator};
pub use validation::ValidationError;
