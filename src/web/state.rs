//! # Web API Application State
//!
//! Components are constructed once at bootstrap and shared by every request.

use std::sync::Arc;
use std::time::Duration;

use crate::database::ResultRepository;
use crate::orchestration::{FleetCommander, TaskDispatcher};

#[derive(Debug, Clone)]
pub struct AppState {
    pub dispatcher: Arc<TaskDispatcher>,
    pub commander: Arc<FleetCommander>,
    pub repository: Arc<ResultRepository>,
    /// Deadline for result queries and fleet supervisor calls
    pub request_timeout: Duration,
}

impl AppState {
    pub fn new(
        dispatcher: TaskDispatcher,
        commander: FleetCommander,
        repository: ResultRepository,
        request_timeout: Duration,
    ) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            commander: Arc::new(commander),
            repository: Arc::new(repository),
            request_timeout,
        }
    }
}
