//! Working state of a single draft run and the stage state machine

use std::fmt;

use serde::{Deserialize, Serialize};

use super::{EmailContent, EmailDraft, ProspectProfile};
use crate::errors::DomainError;

/// Maximum number of refinement passes per draft run
pub const MAX_REFINE_ATTEMPTS: u32 = 2;

/// A step of the draft pipeline
///
/// ```text
/// CreateSubject -> BuildContent -> RefineContent -+-> CreateFinal -> done
///                                    ^            |
///                                    +------------+ (continue_refining)
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DraftStage {
    CreateSubject,
    BuildContent,
    RefineContent,
    CreateFinal,
}

impl DraftStage {
    /// Stage every run starts with
    pub const INITIAL: Self = Self::CreateSubject;

    /// Wire name of the stage
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::CreateSubject => "create_subject",
            Self::BuildContent => "build_content",
            Self::RefineContent => "refine_content",
            Self::CreateFinal => "create_final",
        }
    }
}

impl fmt::Display for DraftStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Mutable record owned by exactly one draft run
#[derive(Debug, Clone, PartialEq)]
pub struct DraftState {
    subject: String,
    content: String,
    refined_content: String,
    final_email: String,
    prospect: ProspectProfile,
    attempts: u32,
    continue_refining: bool,
}

impl DraftState {
    /// Fresh state for a (sanitized) prospect
    pub fn new(prospect: ProspectProfile) -> Self {
        Self {
            subject: String::new(),
            content: String::new(),
            refined_content: String::new(),
            final_email: String::new(),
            prospect,
            attempts: 0,
            continue_refining: true,
        }
    }

    pub fn subject(&self) -> &str {
        &self.subject
    }

    pub fn content(&self) -> &str {
        &self.content
    }

    pub fn refined_content(&self) -> &str {
        &self.refined_content
    }

    pub fn final_email(&self) -> &str {
        &self.final_email
    }

    pub const fn prospect(&self) -> &ProspectProfile {
        &self.prospect
    }

    /// Number of completed refinement passes
    pub const fn attempts(&self) -> u32 {
        self.attempts
    }

    pub const fn continue_refining(&self) -> bool {
        self.continue_refining
    }

    /// Latest body text: the refined version once one exists
    pub fn current_text(&self) -> &str {
        if self.refined_content.is_empty() {
            &self.content
        } else {
            &self.refined_content
        }
    }

    /// Value the given stage wrote
    pub fn field(&self, stage: DraftStage) -> &str {
        match stage {
            DraftStage::CreateSubject => &self.subject,
            DraftStage::BuildContent => &self.content,
            DraftStage::RefineContent => &self.refined_content,
            DraftStage::CreateFinal => &self.final_email,
        }
    }

    pub fn set_subject(&mut self, subject: impl Into<String>) {
        self.subject = subject.into();
    }

    pub fn set_content(&mut self, content: impl Into<String>) {
        self.content = content.into();
    }

    pub fn set_final_email(&mut self, final_email: impl Into<String>) {
        self.final_email = final_email.into();
    }

    /// Check that another refinement pass is allowed
    pub fn ensure_can_refine(&self) -> Result<(), DomainError> {
        if self.attempts >= MAX_REFINE_ATTEMPTS {
            return Err(DomainError::invalid_transition(
                DraftStage::RefineContent.as_str(),
                format!("refinement attempted after {MAX_REFINE_ATTEMPTS} passes"),
            ));
        }
        Ok(())
    }

    /// Store the outcome of one refinement pass
    ///
    /// The attempt counter is incremented before the loop decision, so the
    /// pass that reaches [`MAX_REFINE_ATTEMPTS`] always ends the loop.
    ///
    /// # Errors
    ///
    /// Returns [`DomainError::InvalidTransition`] if the cap was already
    /// reached before this pass.
    pub fn record_refinement(
        &mut self,
        refined_content: impl Into<String>,
        needs_another_iteration: bool,
    ) -> Result<(), DomainError> {
        self.ensure_can_refine()?;

        self.refined_content = refined_content.into();
        self.attempts += 1;
        self.continue_refining = needs_another_iteration && self.attempts < MAX_REFINE_ATTEMPTS;
        Ok(())
    }

    /// Stage to run after `completed`, or `None` when the run is finished
    pub const fn next_stage(&self, completed: DraftStage) -> Option<DraftStage> {
        match completed {
            DraftStage::CreateSubject => Some(DraftStage::BuildContent),
            DraftStage::BuildContent => Some(DraftStage::RefineContent),
            DraftStage::RefineContent if self.continue_refining => Some(DraftStage::RefineContent),
            DraftStage::RefineContent => Some(DraftStage::CreateFinal),
            DraftStage::CreateFinal => None,
        }
    }

    /// Consume the terminal state into the caller-facing draft
    pub fn into_draft(self) -> EmailDraft {
        EmailDraft {
            prospect: self.prospect,
            email: EmailContent {
                subject: self.subject,
                content: self.final_email,
            },
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state() -> DraftState {
        DraftState::new(ProspectProfile::new("Jane Doe", "Acme"))
    }

    #[test]
    fn new_state_is_empty() {
        let state = state();
        assert!(state.subject().is_empty());
        assert!(state.content().is_empty());
        assert!(state.refined_content().is_empty());
        assert!(state.final_email().is_empty());
        assert_eq!(state.attempts(), 0);
        assert!(state.continue_refining());
    }

    #[test]
    fn stage_wire_names() {
        assert_eq!(DraftStage::CreateSubject.as_str(), "create_subject");
        assert_eq!(DraftStage::BuildContent.to_string(), "build_content");
        assert_eq!(
            serde_json::to_string(&DraftStage::RefineContent).unwrap(),
            "\"refine_content\""
        );
        assert_eq!(DraftStage::INITIAL, DraftStage::CreateSubject);
    }

    #[test]
    fn linear_transitions() {
        let state = state();
        assert_eq!(
            state.next_stage(DraftStage::CreateSubject),
            Some(DraftStage::BuildContent)
        );
        assert_eq!(
            state.next_stage(DraftStage::BuildContent),
            Some(DraftStage::RefineContent)
        );
        assert_eq!(state.next_stage(DraftStage::CreateFinal), None);
    }

    #[test]
    fn converged_refinement_moves_to_final() {
        let mut state = state();
        state.record_refinement("better", false).unwrap();
        assert_eq!(state.attempts(), 1);
        assert!(!state.continue_refining());
        assert_eq!(
            state.next_stage(DraftStage::RefineContent),
            Some(DraftStage::CreateFinal)
        );
    }

    #[test]
    fn refinement_loops_until_cap() {
        let mut state = state();
        state.record_refinement("pass 1", true).unwrap();
        assert!(state.continue_refining());
        assert_eq!(
            state.next_stage(DraftStage::RefineContent),
            Some(DraftStage::RefineContent)
        );

        state.record_refinement("pass 2", true).unwrap();
        assert_eq!(state.attempts(), MAX_REFINE_ATTEMPTS);
        assert!(!state.continue_refining());
        assert_eq!(
            state.next_stage(DraftStage::RefineContent),
            Some(DraftStage::CreateFinal)
        );
    }

    #[test]
    fn refinement_past_cap_is_rejected() {
        let mut state = state();
        state.record_refinement("1", true).unwrap();
        state.record_refinement("2", true).unwrap();
        let err = state.record_refinement("3", true).unwrap_err();
        assert!(matches!(err, DomainError::InvalidTransition { .. }));
        assert_eq!(state.attempts(), MAX_REFINE_ATTEMPTS);
        assert_eq!(state.refined_content(), "2");
    }

    #[test]
    fn current_text_prefers_refined() {
        let mut state = state();
        state.set_content("draft");
        assert_eq!(state.current_text(), "draft");
        state.record_refinement("polished", true).unwrap();
        assert_eq!(state.current_text(), "polished");
    }

    #[test]
    fn field_maps_stage_to_output() {
        let mut state = state();
        state.set_subject("s");
        state.set_content("c");
        state.record_refinement("r", false).unwrap();
        state.set_final_email("f");
        assert_eq!(state.field(DraftStage::CreateSubject), "s");
        assert_eq!(state.field(DraftStage::BuildContent), "c");
        assert_eq!(state.field(DraftStage::RefineContent), "r");
        assert_eq!(state.field(DraftStage::CreateFinal), "f");
    }

    #[test]
    fn into_draft_uses_final_email() {
        let mut state = state();
        state.set_subject("Hello");
        state.set_content("body");
        state.set_final_email("Dear Jane,\n\nbody");
        let draft = state.into_draft();
        assert_eq!(draft.email.subject, "Hello");
        assert_eq!(draft.email.content, "Dear Jane,\n\nbody");
        assert_eq!(draft.prospect.author, "Jane Doe");
    }
}
