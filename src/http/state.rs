//! Application state for the HTTP server.

use std::sync::Arc;

use crate::db::repository::FullRepository;
use crate::services::SchedulingService;

/// Shared application state passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// Repository instance for direct administrative operations
    pub repository: Arc<dyn FullRepository>,
    /// Scheduling facade for slot listing and booking
    pub scheduling: SchedulingService,
}

impl AppState {
    /// Create a new application state with the given repository.
    pub fn new(repository: Arc<dyn FullRepository>) -> Self {
        let scheduling = SchedulingService::new(Arc::clone(&repository));
        Self {
            repository,
            scheduling,
        }
    }
}
