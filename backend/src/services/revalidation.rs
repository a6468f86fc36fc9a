//! View cache invalidation after successful writes.

/// Admin subject list view.
pub const ADMIN_SUBJECTS_VIEW: &str = "/admin/subjects";
/// Student/staff dashboard view.
pub const DASHBOARD_VIEW: &str = "/dashboard";

/// Views whose cached renders depend on exam settings.
pub const EXAM_SETTING_VIEWS: [&str; 2] = [ADMIN_SUBJECTS_VIEW, DASHBOARD_VIEW];

/// Marks rendered views stale. Called only after a write commits.
pub trait ViewInvalidator: Send + Sync {
    fn invalidate(&self, path: &str);
}

/// Emits one `tracing` event per invalidated view.
///
/// The server renders no views itself; a fronting cache or page renderer
/// picks these events up from the log stream.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingInvalidator;

impl ViewInvalidator for TracingInvalidator {
    fn invalidate(&self, path: &str) {
        tracing::info!(path, "Invalidating view");
    }
}

/// Invalidate every view that renders exam settings.
pub fn invalidate_exam_views(invalidator: &dyn ViewInvalidator) {
    for path in EXAM_SETTING_VIEWS {
        invalidator.invalidate(path);
    }
}
