//! Application state shared across handlers

use std::sync::Arc;

use application::DraftPipeline;
use infrastructure::AppConfig;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    /// Draft pipeline serving every request
    pub pipeline: Arc<DraftPipeline>,
    /// Application configuration
    pub config: Arc<AppConfig>,
}
