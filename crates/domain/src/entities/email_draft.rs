//! Finished outreach email returned to callers

use serde::{Deserialize, Serialize};

use super::ProspectProfile;

/// Subject and body of a finished email
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmailContent {
    pub subject: String,
    pub content: String,
}

/// A drafted email together with the prospect it was written for
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmailDraft {
    pub prospect: ProspectProfile,
    pub email: EmailContent,
}
