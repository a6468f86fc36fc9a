//! Application state for the HTTP server.

use std::sync::Arc;

use super::session::SessionResolver;
use crate::db::FullRepository;
use crate::models::SastClock;
use crate::services::{ExamScheduleCoordinator, ViewInvalidator};

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    pub repository: Arc<dyn FullRepository>,
    pub coordinator: ExamScheduleCoordinator,
    pub sessions: Arc<dyn SessionResolver>,
}

impl AppState {
    /// `invalidator` receives the exam views to refresh after each committed
    /// write.
    pub fn new(
        repository: Arc<dyn FullRepository>,
        sessions: Arc<dyn SessionResolver>,
        clock: SastClock,
        invalidator: Arc<dyn ViewInvalidator>,
    ) -> Self {
        let coordinator = ExamScheduleCoordinator::new(repository.clone(), clock, invalidator);
        Self {
            repository,
            coordinator,
            sessions,
        }
    }
}
