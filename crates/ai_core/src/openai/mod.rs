//! OpenAI-compatible inference engine implementation
//!
//! Talks to `/v1/chat/completions` with a bearer API key. Works with the
//! OpenAI API and any server that mirrors it.

mod client;

pub use client::OpenAiInferenceEngine;
