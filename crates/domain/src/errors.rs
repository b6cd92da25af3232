//! Domain-level errors

use thiserror::Error;

/// Errors that can occur in the domain layer
#[derive(Debug, Error)]
pub enum DomainError {
    /// Validation failed
    #[error("Validation failed: {0}")]
    ValidationError(String),

    /// A draft run tried to leave the stage state machine
    #[error("Invalid stage transition from {stage}: {reason}")]
    InvalidTransition { stage: String, reason: String },
}

impl DomainError {
    /// Create an invalid transition error
    pub fn invalid_transition(stage: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidTransition {
            stage: stage.into(),
            reason: reason.into(),
        }
    }
}
