//! Shared application state for axum handlers.

use cadence_app::Scheduler;

/// Application state shared across all axum handlers.
///
/// The scheduler handle only wraps a channel sender, so cloning the state
/// per request is cheap.
#[derive(Clone)]
pub struct AppState {
    pub scheduler: Scheduler,
}

impl AppState {
    pub fn new(scheduler: Scheduler) -> Self {
        Self { scheduler }
    }
}
