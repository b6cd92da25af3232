//! Infrastructure adapters
//!
//! Adapters connect application ports to concrete implementations.

mod inference_adapter;

pub use inference_adapter::InferenceAdapter;
