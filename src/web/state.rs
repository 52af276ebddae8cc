//! Application state shared across handlers

use crate::config::Settings;
use crate::search::SearchHandle;
use std::sync::Arc;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Global settings
    pub settings: Arc<Settings>,
    /// Handle to the search orchestrator
    pub search: SearchHandle,
}

impl AppState {
    /// Create new application state
    pub fn new(settings: Settings, search: SearchHandle) -> Self {
        Self {
            settings: Arc::new(settings),
            search,
        }
    }

    /// Get instance name
    pub fn instance_name(&self) -> &str {
        &self.settings.general.instance_name
    }
}
