//! Application layer - Use cases and orchestration
//!
//! Contains the draft pipeline and the port it uses to reach a text-generation
//! backend. Adapters in the infrastructure layer implement the ports.

pub mod error;
pub mod ports;
pub mod services;

pub use error::ApplicationError;
pub use ports::*;
pub use services::*;
