//! Application State
//!
//! Shared state accessible by all handlers. It holds only the resolved
//! session configuration; every request loads the table afresh.

use crate::api::dto::ViewParams;
use crate::config::Config;
use std::sync::Arc;
use std::time::Instant;

/// Shared application state for all handlers
#[derive(Clone)]
pub struct AppState {
    /// Session configuration, resolved once at startup
    pub config: Arc<Config>,
    /// Server start time for uptime tracking
    pub start_time: Instant,
}

impl AppState {
    pub fn new(config: Config) -> Self {
        Self {
            config: Arc::new(config),
            start_time: Instant::now(),
        }
    }

    /// Get server uptime in seconds
    pub fn uptime_seconds(&self) -> u64 {
        self.start_time.elapsed().as_secs()
    }

    /// Session configuration with this request's database and table applied
    pub fn config_for(&self, params: &ViewParams) -> Config {
        let mut config = (*self.config).clone();
        config.source = config
            .source
            .with_request(params.db_path.as_deref(), params.table.as_deref());
        config
    }
}
