//! Application configuration
//!
//! Loaded once at startup from built-in defaults, an optional `config.toml`
//! in the working directory, and `OUTREACH__*` environment variables, in
//! increasing order of precedence.

mod server;

use std::fmt;

pub use ai_core::{InferenceConfig, InferenceProvider};
use config::{ConfigError, Environment, File, Map, Source};
use domain::SenderProfile;
use serde::{Deserialize, Serialize};
pub use server::ServerConfig;

use crate::retry::RetryConfig;

/// Prefix for environment variable overrides
pub const ENV_PREFIX: &str = "OUTREACH";

pub(crate) const fn default_true() -> bool {
    true
}

/// Draft pipeline settings
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Who the drafted emails are written on behalf of
    #[serde(default)]
    pub sender: SenderProfile,
}

/// Log output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LogFormat {
    /// Human-readable lines
    #[default]
    Text,
    /// One JSON object per line
    Json,
}

impl fmt::Display for LogFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Logging settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggingConfig {
    #[serde(default)]
    pub format: LogFormat,

    /// `EnvFilter` directive used when `RUST_LOG` is unset
    #[serde(default = "default_log_filter")]
    pub filter: String,
}

fn default_log_filter() -> String {
    "info,outreach_server=debug,tower_http=debug".to_string()
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            format: LogFormat::default(),
            filter: default_log_filter(),
        }
    }
}

/// Main application configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Server configuration
    #[serde(default)]
    pub server: ServerConfig,

    /// Text-generation backend
    #[serde(default)]
    pub inference: InferenceConfig,

    /// Retry policy for backend calls
    #[serde(default)]
    pub retry: RetryConfig,

    /// Draft pipeline configuration
    #[serde(default)]
    pub pipeline: PipelineConfig,

    /// Logging configuration
    #[serde(default)]
    pub logging: LoggingConfig,
}

impl AppConfig {
    /// Load configuration from `config.toml` (optional) and the environment
    ///
    /// Environment keys use `__` between path segments, e.g.
    /// `OUTREACH__SERVER__PORT=8080` or `OUTREACH__INFERENCE__API_KEY=sk-...`.
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(File::with_name("config").required(false), None)
    }

    /// Load from an explicit file source and, optionally, an explicit
    /// environment map instead of the process environment
    pub fn load_from<S>(file: S, env: Option<Map<String, String>>) -> Result<Self, ConfigError>
    where
        S: Source + Send + Sync + 'static,
    {
        config::Config::builder()
            .add_source(file)
            .add_source(
                Environment::with_prefix(ENV_PREFIX)
                    .separator("__")
                    .try_parsing(true)
                    .list_separator(",")
                    .with_list_parse_key("server.allowed_origins")
                    .source(env),
            )
            .build()?
            .try_deserialize()
    }
}
