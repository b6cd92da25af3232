//! Domain layer for the outreach drafter
//!
//! Contains the prospect, draft-state and email-draft model together with the
//! stage state machine that drives the draft pipeline.
//! This layer has no I/O and defines the ubiquitous language.

pub mod entities;
pub mod errors;
pub mod value_objects;

pub use entities::*;
pub use errors::DomainError;
pub use value_objects::*;
