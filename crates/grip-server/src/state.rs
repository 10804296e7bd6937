//! Application state shared across all handlers.

use chrono::{DateTime, Utc};
use grip_router::Dispatcher;
use std::sync::Arc;
use std::time::Instant;

/// Shared application state. Cheap to clone; the dispatcher is immutable.
#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub start_time: Instant,
    pub started_at: DateTime<Utc>,
}

impl AppState {
    pub fn new(dispatcher: Dispatcher) -> Self {
        Self {
            dispatcher: Arc::new(dispatcher),
            start_time: Instant::now(),
            started_at: Utc::now(),
        }
    }

    pub fn uptime_secs(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }
}
