//! Configuration for inference engines

use std::fmt;

use secrecy::SecretString;
use serde::{Deserialize, Serialize};

/// Which backend protocol to speak
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum InferenceProvider {
    /// Ollama-compatible `/api/chat`
    Ollama,
    /// OpenAI-compatible `/v1/chat/completions`
    #[default]
    #[serde(alias = "open_ai")]
    OpenAi,
}

impl InferenceProvider {
    /// Base URL used when none is configured
    pub const fn default_base_url(self) -> &'static str {
        match self {
            Self::Ollama => "http://localhost:11434",
            Self::OpenAi => "https://api.openai.com",
        }
    }
}

impl fmt::Display for InferenceProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ollama => write!(f, "ollama"),
            Self::OpenAi => write!(f, "openai"),
        }
    }
}

/// Configuration for the inference engine
#[derive(Clone, Serialize, Deserialize)]
pub struct InferenceConfig {
    /// Backend protocol
    #[serde(default)]
    pub provider: InferenceProvider,

    /// Base URL of the inference server, without the API path
    ///
    /// Empty means the provider's default.
    #[serde(default)]
    pub base_url: String,

    /// Default model to use
    #[serde(default = "default_model")]
    pub default_model: String,

    /// API key sent as a bearer token (OpenAI only)
    #[serde(default, skip_serializing)]
    pub api_key: Option<SecretString>,

    /// Request timeout in milliseconds
    #[serde(default = "default_timeout_ms")]
    pub timeout_ms: u64,

    /// Maximum tokens to generate
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Temperature for sampling (0.0 - 2.0)
    #[serde(default)]
    pub temperature: f32,

    /// Top-p (nucleus) sampling
    #[serde(default = "default_top_p")]
    pub top_p: f32,
}

impl fmt::Debug for InferenceConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InferenceConfig")
            .field("provider", &self.provider)
            .field("base_url", &self.base_url)
            .field("default_model", &self.default_model)
            .field(
                "api_key",
                &if self.api_key.is_some() {
                    Some("[REDACTED]")
                } else {
                    None
                },
            )
            .field("timeout_ms", &self.timeout_ms)
            .field("max_tokens", &self.max_tokens)
            .field("temperature", &self.temperature)
            .field("top_p", &self.top_p)
            .finish()
    }
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

const fn default_timeout_ms() -> u64 {
    60000 // 60 seconds
}

const fn default_max_tokens() -> u32 {
    1024
}

const fn default_top_p() -> f32 {
    1.0
}

impl Default for InferenceConfig {
    fn default() -> Self {
        Self {
            provider: InferenceProvider::default(),
            base_url: String::new(),
            default_model: default_model(),
            api_key: None,
            timeout_ms: default_timeout_ms(),
            max_tokens: default_max_tokens(),
            temperature: 0.0,
            top_p: default_top_p(),
        }
    }
}

impl InferenceConfig {
    /// Config for a local Ollama server
    pub fn ollama(model: impl Into<String>) -> Self {
        Self {
            provider: InferenceProvider::Ollama,
            default_model: model.into(),
            ..Default::default()
        }
    }

    /// Config for the OpenAI API with `gpt-4o-mini`
    pub fn openai(api_key: impl Into<String>) -> Self {
        Self {
            provider: InferenceProvider::OpenAi,
            api_key: Some(SecretString::from(api_key.into())),
            ..Default::default()
        }
    }

    /// Base URL with the provider default applied and trailing slashes removed
    pub fn resolved_base_url(&self) -> &str {
        let url = self.base_url.trim();
        if url.is_empty() {
            self.provider.default_base_url()
        } else {
            url.trim_end_matches('/')
        }
    }
}
