//! Text generation abstraction.

use std::sync::Arc;

use async_trait::async_trait;
use llm_service::{GenerationParams, LlmServiceProfiles};

use crate::error::GenerationError;

/// Provider interface for text generation.
///
/// Implement this trait to plug in another backend; the engine and task
/// helpers only ever talk to it.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    /// Generates a completion for `prompt`. `params` override the profile
    /// defaults per call.
    async fn generate(
        &self,
        prompt: &str,
        params: Option<GenerationParams>,
    ) -> Result<String, GenerationError>;

    /// Generates with the summarization profile when the backend has one.
    /// Defaults to the plain generation path.
    async fn generate_summary(
        &self,
        prompt: &str,
        params: Option<GenerationParams>,
    ) -> Result<String, GenerationError> {
        self.generate(prompt, params).await
    }
}

/// [`TextGenerator`] backed by the configured LLM profiles.
pub struct LlmGenerator {
    svc: Arc<LlmServiceProfiles>,
}

impl LlmGenerator {
    pub fn new(svc: Arc<LlmServiceProfiles>) -> Self {
        Self { svc }
    }
}

#[async_trait]
impl TextGenerator for LlmGenerator {
    async fn generate(
        &self,
        prompt: &str,
        params: Option<GenerationParams>,
    ) -> Result<String, GenerationError> {
        Ok(self.svc.generate(prompt, None, params).await?)
    }

    async fn generate_summary(
        &self,
        prompt: &str,
        params: Option<GenerationParams>,
    ) -> Result<String, GenerationError> {
        Ok(self.svc.generate_summary(prompt, None, params).await?)
    }
}
