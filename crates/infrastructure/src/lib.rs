//! Infrastructure layer - Adapters for external systems
//!
//! Implements the application ports on top of `ai_core` and provides
//! configuration loading, retry and logging setup.

pub mod adapters;
pub mod config;
pub mod retry;
pub mod telemetry;

pub use adapters::*;
pub use config::{AppConfig, LogFormat, LoggingConfig, PipelineConfig, ServerConfig};
pub use retry::{RetryConfig, RetryOutcome, Retryable, with_retry};
pub use telemetry::{TelemetryError, init_logging};
