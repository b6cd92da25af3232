//! The four draft stages
//!
//! Each stage issues one inference call and writes exactly one field of the
//! state. Inference errors are logged and replaced by the stage fallback.

use domain::{DraftStage, DraftState};
use tracing::{debug, warn};

use super::{
    DraftPipeline,
    parsing::{
        ParseBranch, ParseOutcome, parse_content, parse_final_email, parse_refinement, parse_subject,
        unchanged_refinement,
    },
    prompts,
};
use crate::error::ApplicationError;

impl DraftPipeline {
    /// Run one inference call, logging instead of failing
    async fn generate(&self, stage: DraftStage, system_prompt: &str, message: &str) -> Option<String> {
        match self.inference.generate_with_system(system_prompt, message).await {
            Ok(result) => {
                debug!(
                    %stage,
                    model = %result.model,
                    latency_ms = result.latency_ms,
                    tokens = ?result.tokens_used,
                    "Stage inference completed"
                );
                Some(result.content)
            },
            Err(e) => {
                warn!(%stage, error = %e, "Stage inference failed, using fallback");
                None
            },
        }
    }

    pub(super) async fn create_subject(&self, state: &mut DraftState) -> ParseBranch {
        let message = prompts::subject_prompt(state.prospect(), &self.sender);
        let reply = self
            .generate(DraftStage::CreateSubject, prompts::SUBJECT_SYSTEM_PROMPT, &message)
            .await;

        let outcome = match reply {
            Some(response) => parse_subject(&response, &self.sender.fallback_subject),
            None => ParseOutcome::Fallback(self.sender.fallback_subject.clone()),
        };

        let branch = outcome.branch();
        state.set_subject(outcome.into_value());
        branch
    }

    pub(super) async fn build_content(&self, state: &mut DraftState) -> ParseBranch {
        let message = prompts::content_prompt(state.prospect(), &self.sender, state.subject());
        let reply = self
            .generate(DraftStage::BuildContent, prompts::CONTENT_SYSTEM_PROMPT, &message)
            .await;

        let fallback = || prompts::fallback_content(state.prospect(), &self.sender);
        let outcome = match reply {
            Some(response) => parse_content(&response, state.prospect(), fallback),
            None => ParseOutcome::Fallback(fallback()),
        };

        let branch = outcome.branch();
        state.set_content(outcome.into_value());
        branch
    }

    /// One refinement pass over the latest text
    ///
    /// # Errors
    ///
    /// Fails without calling the backend when the pass cap is already reached.
    pub(super) async fn refine_content(
        &self,
        state: &mut DraftState,
    ) -> Result<ParseBranch, ApplicationError> {
        state.ensure_can_refine()?;

        let message = prompts::refine_prompt(state.prospect(), state.subject(), state.current_text());
        let reply = self
            .generate(DraftStage::RefineContent, prompts::REFINE_SYSTEM_PROMPT, &message)
            .await;

        let outcome = match reply {
            Some(response) => parse_refinement(&response, state.current_text()),
            None => unchanged_refinement(state.current_text()),
        };

        let branch = outcome.branch();
        let refinement = outcome.into_value();
        state.record_refinement(refinement.refined_content, refinement.needs_another_iteration)?;

        debug!(
            attempts = state.attempts(),
            continue_refining = state.continue_refining(),
            "Refinement pass recorded"
        );
        Ok(branch)
    }

    pub(super) async fn create_final(&self, state: &mut DraftState) -> ParseBranch {
        let message = prompts::final_prompt(
            state.prospect(),
            &self.sender,
            state.subject(),
            state.refined_content(),
        );
        let reply = self
            .generate(DraftStage::CreateFinal, prompts::FINAL_SYSTEM_PROMPT, &message)
            .await;

        match reply.as_deref().and_then(parse_final_email) {
            Some(final_email) => {
                state.set_final_email(final_email);
                ParseBranch::Parsed
            },
            None => {
                let fallback = if state.refined_content().is_empty() {
                    state.content().to_string()
                } else {
                    state.refined_content().to_string()
                };
                state.set_final_email(fallback);
                ParseBranch::Fallback
            },
        }
    }
}
