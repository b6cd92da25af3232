//! Test doubles for the draft pipeline

use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use domain::{DraftStage, ProspectProfile};
use mockall::mock;
use parking_lot::Mutex;

use super::prompts;
use crate::{
    error::ApplicationError,
    ports::{InferencePort, InferenceResult},
};

mock! {
    pub Inference {}

    #[async_trait]
    impl InferencePort for Inference {
        async fn generate_with_system(
            &self,
            system_prompt: &str,
            message: &str,
        ) -> Result<InferenceResult, ApplicationError>;
        async fn is_healthy(&self) -> bool;
        fn current_model(&self) -> String;
    }
}

pub fn inference_result(content: &str) -> InferenceResult {
    InferenceResult {
        content: content.to_string(),
        model: "test-model".to_string(),
        tokens_used: Some(10),
        latency_ms: 5,
    }
}

pub fn jane() -> ProspectProfile {
    ProspectProfile::new("Jane Doe", "Acme")
        .with_role("Data Lead")
        .with_industry("retail")
        .with_pain_points(["lineage tracking"])
        .with_alignment_score(0.9)
}

/// Canned reply for one stage call
pub enum StageReply {
    Text(String),
    Fail(String),
}

impl StageReply {
    pub fn text(content: &str) -> Self {
        Self::Text(content.to_string())
    }

    pub fn fail(message: &str) -> Self {
        Self::Fail(message.to_string())
    }
}

type Script = Box<dyn Fn(DraftStage, &str) -> StageReply + Send + Sync>;

/// Inference stub that answers per stage and records every call
pub struct ScriptedInference {
    script: Script,
    calls: AtomicUsize,
    prompts: Mutex<Vec<(DraftStage, String)>>,
}

impl ScriptedInference {
    pub fn new<F>(script: F) -> Self
    where
        F: Fn(DraftStage, &str) -> StageReply + Send + Sync + 'static,
    {
        Self {
            script: Box::new(script),
            calls: AtomicUsize::new(0),
            prompts: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// User message of the first call made for `stage`
    pub fn prompt_for(&self, stage: DraftStage) -> Option<String> {
        self.prompts
            .lock()
            .iter()
            .find(|(s, _)| *s == stage)
            .map(|(_, prompt)| prompt.clone())
    }

    fn stage_of(system_prompt: &str) -> DraftStage {
        match system_prompt {
            prompts::SUBJECT_SYSTEM_PROMPT => DraftStage::CreateSubject,
            prompts::CONTENT_SYSTEM_PROMPT => DraftStage::BuildContent,
            prompts::REFINE_SYSTEM_PROMPT => DraftStage::RefineContent,
            _ => DraftStage::CreateFinal,
        }
    }
}

#[async_trait]
impl InferencePort for ScriptedInference {
    async fn generate_with_system(
        &self,
        system_prompt: &str,
        message: &str,
    ) -> Result<InferenceResult, ApplicationError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let stage = Self::stage_of(system_prompt);
        self.prompts.lock().push((stage, message.to_string()));

        match (self.script)(stage, message) {
            StageReply::Text(content) => Ok(inference_result(&content)),
            StageReply::Fail(message) => Err(ApplicationError::Inference(message)),
        }
    }

    async fn is_healthy(&self) -> bool {
        true
    }

    fn current_model(&self) -> String {
        "scripted".to_string()
    }
}
