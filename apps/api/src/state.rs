use crate::acquisition::AcquisitionPlanner;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    /// Owns the `Arc<dyn ImageProvider>`; tests swap in an in-memory provider.
    pub planner: AcquisitionPlanner,
}
