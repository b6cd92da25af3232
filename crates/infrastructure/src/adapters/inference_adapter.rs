//! Inference adapter - Implements `InferencePort` over an `ai_core` engine
//!
//! Adds retry with backoff for transient failures and maps backend errors
//! into the application error taxonomy.

use std::{fmt, time::Instant};

use ai_core::{InferenceConfig, InferenceEngine, InferenceError, InferenceRequest, engine_from_config};
use application::{
    error::ApplicationError,
    ports::{InferencePort, InferenceResult},
};
use async_trait::async_trait;
use tracing::{debug, instrument, warn};

use crate::retry::{RetryConfig, with_retry};

/// Adapter for any `ai_core` inference engine
pub struct InferenceAdapter {
    engine: Box<dyn InferenceEngine>,
    retry: RetryConfig,
}

impl fmt::Debug for InferenceAdapter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("InferenceAdapter")
            .field("model", &self.engine.default_model())
            .field("retry", &self.retry)
            .finish_non_exhaustive()
    }
}

impl InferenceAdapter {
    /// Wrap an existing engine
    pub fn new(engine: Box<dyn InferenceEngine>, retry: RetryConfig) -> Self {
        Self { engine, retry }
    }

    /// Build the engine selected by the configuration
    pub fn from_config(config: InferenceConfig, retry: RetryConfig) -> Result<Self, ApplicationError> {
        let engine = engine_from_config(config).map_err(Self::map_error)?;
        Ok(Self::new(engine, retry))
    }

    /// Convert ai_core error to application error
    ///
    /// Transport-level failures become `ExternalService` so they are retried;
    /// malformed requests and responses are not.
    fn map_error(e: InferenceError) -> ApplicationError {
        match e {
            InferenceError::RateLimited => ApplicationError::RateLimited,
            InferenceError::ConnectionFailed(msg) => {
                ApplicationError::ExternalService(format!("Inference connection failed: {msg}"))
            },
            InferenceError::Timeout(ms) => {
                ApplicationError::ExternalService(format!("Inference timeout after {ms}ms"))
            },
            InferenceError::ServerError(msg) => {
                ApplicationError::ExternalService(format!("Inference server error: {msg}"))
            },
            InferenceError::Configuration(msg) => ApplicationError::Configuration(msg),
            other => ApplicationError::Inference(other.to_string()),
        }
    }
}

#[async_trait]
impl InferencePort for InferenceAdapter {
    #[instrument(skip(self, system_prompt, message), fields(message_len = message.len(), model = %self.engine.default_model()))]
    async fn generate_with_system(
        &self,
        system_prompt: &str,
        message: &str,
    ) -> Result<InferenceResult, ApplicationError> {
        let start = Instant::now();
        let request = InferenceRequest::with_system(system_prompt, message);

        let outcome = with_retry(&self.retry, || {
            let request = request.clone();
            async move { self.engine.generate(request).await.map_err(Self::map_error) }
        })
        .await;

        let attempts = outcome.attempts;
        let response = outcome.result?;

        #[allow(clippy::cast_possible_truncation)]
        let latency_ms = start.elapsed().as_millis() as u64;

        debug!(
            model = %response.model,
            tokens = ?response.usage.map(|u| u.total_tokens),
            latency_ms = latency_ms,
            attempts = attempts,
            "Inference completed"
        );

        Ok(InferenceResult {
            content: response.content,
            model: response.model,
            tokens_used: response.usage.map(|u| u.total_tokens),
            latency_ms,
        })
    }

    async fn is_healthy(&self) -> bool {
        match self.engine.health_check().await {
            Ok(healthy) => healthy,
            Err(e) => {
                warn!(error = %e, "Inference health check failed");
                false
            },
        }
    }

    fn current_model(&self) -> String {
        self.engine.default_model().to_string()
    }
}
