//! Ollama-compatible inference engine implementation
//!
//! Connects to any server exposing Ollama's `/api/chat` and `/api/tags`
//! endpoints.

mod client;

pub use client::OllamaInferenceEngine;
