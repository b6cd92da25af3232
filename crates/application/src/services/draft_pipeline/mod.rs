//! Draft pipeline - Turns a prospect profile into a finished outreach email
//!
//! Four stages run in order, each issuing one inference call and writing one
//! field of the [`DraftState`]:
//!
//! 1. `create_subject` - subject line
//! 2. `build_content` - first body draft
//! 3. `refine_content` - editing pass, repeated while the model asks for
//!    another one (at most [`MAX_REFINE_ATTEMPTS`] passes)
//! 4. `create_final` - greeted and signed plain-text email
//!
//! A stage whose inference call or reply parsing fails writes a deterministic
//! fallback instead, so a single bad reply never aborts the run. Only a broken
//! state-machine invariant escapes as an error.

mod parsing;
mod prompts;
mod stages;
mod streaming;
#[cfg(test)]
mod testing;

use std::{fmt, sync::Arc};

use domain::{DraftStage, DraftState, EmailDraft, MAX_REFINE_ATTEMPTS, ProspectProfile, SenderProfile};
use serde::Serialize;
use tracing::{error, info, instrument};

pub use parsing::{ParseBranch, ParseOutcome, Refinement};
pub use streaming::{DraftEvent, DraftEventStream};

use crate::{error::ApplicationError, ports::InferencePort};

/// What a single stage execution produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct StageReport {
    pub stage: DraftStage,
    pub branch: ParseBranch,
    /// Refinement passes completed after this stage
    pub attempts: u32,
}

/// Terminal state of a run plus the trace of executed stages
#[derive(Debug, Clone)]
pub struct DraftRun {
    pub state: DraftState,
    pub reports: Vec<StageReport>,
}

impl DraftRun {
    /// Number of refinement passes executed
    pub fn refine_visits(&self) -> usize {
        self.reports
            .iter()
            .filter(|r| r.stage == DraftStage::RefineContent)
            .count()
    }

    /// Branch taken by the first execution of `stage`
    pub fn branch_of(&self, stage: DraftStage) -> Option<ParseBranch> {
        self.reports
            .iter()
            .find(|r| r.stage == stage)
            .map(|r| r.branch)
    }

    pub fn into_draft(self) -> EmailDraft {
        self.state.into_draft()
    }
}

/// Service that drafts outreach emails through the inference port
#[derive(Clone)]
pub struct DraftPipeline {
    inference: Arc<dyn InferencePort>,
    sender: Arc<SenderProfile>,
}

impl fmt::Debug for DraftPipeline {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("DraftPipeline")
            .field("sender", &self.sender)
            .field("max_attempts", &MAX_REFINE_ATTEMPTS)
            .finish_non_exhaustive()
    }
}

impl DraftPipeline {
    /// Create a pipeline with the default sender profile
    pub fn new(inference: Arc<dyn InferencePort>) -> Self {
        Self::with_sender(inference, SenderProfile::default())
    }

    /// Create a pipeline that writes on behalf of `sender`
    pub fn with_sender(inference: Arc<dyn InferencePort>, sender: SenderProfile) -> Self {
        Self {
            inference,
            sender: Arc::new(sender),
        }
    }

    pub fn sender(&self) -> &SenderProfile {
        &self.sender
    }

    /// Cap on refinement passes per run
    pub const fn max_attempts(&self) -> u32 {
        MAX_REFINE_ATTEMPTS
    }

    /// Check if the underlying inference is healthy
    pub async fn is_healthy(&self) -> bool {
        self.inference.is_healthy().await
    }

    /// Get the current model name
    pub fn current_model(&self) -> String {
        self.inference.current_model()
    }

    /// Draft an email for `prospect`
    ///
    /// Always yields a complete draft unless a pipeline invariant breaks.
    #[instrument(skip(self, prospect), fields(company = %prospect.company))]
    pub async fn process(&self, prospect: ProspectProfile) -> Result<EmailDraft, ApplicationError> {
        self.run(prospect).await.map(DraftRun::into_draft)
    }

    /// Like [`process`](Self::process) but keeps the terminal state and stage trace
    pub async fn run(&self, prospect: ProspectProfile) -> Result<DraftRun, ApplicationError> {
        let state = DraftState::new(prospect.sanitized());
        self.run_from(DraftStage::INITIAL, state).await
    }

    async fn run_from(
        &self,
        first: DraftStage,
        mut state: DraftState,
    ) -> Result<DraftRun, ApplicationError> {
        let mut reports = Vec::new();
        let mut next = Some(first);

        while let Some(stage) = next {
            let report = self
                .execute_stage(stage, &mut state)
                .await
                .inspect_err(|e| error!(%stage, error = %e, "Draft pipeline failed"))?;
            reports.push(report);
            next = state.next_stage(stage);
        }

        info!(
            attempts = state.attempts(),
            stages = reports.len(),
            subject_len = state.subject().len(),
            "Draft completed"
        );

        Ok(DraftRun { state, reports })
    }

    /// Run one stage against `state`
    async fn execute_stage(
        &self,
        stage: DraftStage,
        state: &mut DraftState,
    ) -> Result<StageReport, ApplicationError> {
        let branch = match stage {
            DraftStage::CreateSubject => self.create_subject(state).await,
            DraftStage::BuildContent => self.build_content(state).await,
            DraftStage::RefineContent => self.refine_content(state).await?,
            DraftStage::CreateFinal => self.create_final(state).await,
        };

        Ok(StageReport {
            stage,
            branch,
            attempts: state.attempts(),
        })
    }
}
