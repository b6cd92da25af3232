//! AI Core - Text-generation backend clients
//!
//! Provides the [`InferenceEngine`] abstraction with two HTTP clients: one
//! for Ollama-compatible servers and one for OpenAI-compatible APIs.

pub mod config;
pub mod error;
pub mod ollama;
pub mod openai;
pub mod ports;

pub use config::{InferenceConfig, InferenceProvider};
pub use error::InferenceError;
pub use ollama::OllamaInferenceEngine;
pub use openai::OpenAiInferenceEngine;
pub use ports::{InferenceEngine, InferenceMessage, InferenceRequest, InferenceResponse, TokenUsage};

/// Build the engine selected by `config.provider`
pub fn engine_from_config(config: InferenceConfig) -> Result<Box<dyn InferenceEngine>, InferenceError> {
    match config.provider {
        InferenceProvider::Ollama => Ok(Box::new(OllamaInferenceEngine::new(config)?)),
        InferenceProvider::OpenAi => Ok(Box::new(OpenAiInferenceEngine::new(config)?)),
    }
}
