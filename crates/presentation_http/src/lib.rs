//! Outreach HTTP presentation layer
//!
//! Serves the draft pipeline over HTTP: one-shot drafts as JSON, staged
//! drafts as server-sent events, plus liveness and readiness checks.

pub mod error;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod state;

pub use error::ApiError;
pub use middleware::{ValidatedJson, ValidationError};
pub use routes::{create_app, create_router};
pub use state::AppState;
