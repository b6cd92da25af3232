//! Sender identity used to sign and frame outreach emails

use serde::{Deserialize, Serialize};

/// Who the outreach email comes from and what is being offered
///
/// Every field has a default so a partially configured profile still
/// produces complete prompts and fallback text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SenderProfile {
    /// Name used in the signature
    pub name: String,
    /// Job title used in the signature
    pub title: String,
    /// Vendor company
    pub company: String,
    /// One-line description of the offering
    pub solution: String,
    /// Subject used when no subject can be generated
    pub fallback_subject: String,
}

impl Default for SenderProfile {
    fn default() -> Self {
        Self {
            name: "[Your Name]".to_string(),
            title: "Sales Development Representative".to_string(),
            company: "Atlan".to_string(),
            solution: "data catalog and governance platform".to_string(),
            fallback_subject: "Simplify Your Data Governance with Atlan".to_string(),
        }
    }
}

impl SenderProfile {
    /// Multi-line signature block
    pub fn signature(&self) -> String {
        format!("{}\n{}\n{}", self.name, self.title, self.company)
    }
}
