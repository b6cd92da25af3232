//! HTTP request handlers

pub mod drafts;
pub mod health;
