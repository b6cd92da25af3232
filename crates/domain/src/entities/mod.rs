//! Domain entities - Records that flow through a draft run

mod draft_state;
mod email_draft;
mod prospect;

pub use draft_state::{DraftStage, DraftState, MAX_REFINE_ATTEMPTS};
pub use email_draft::{EmailContent, EmailDraft};
pub use prospect::{DEFAULT_ROLE, ProspectProfile};
