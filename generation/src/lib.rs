//! Grounded answer generation over a [`rag_store::RagStore`].
//!
//! Public API: [`AnswerEngine`]. It retrieves top-K context for a question,
//! builds a grounded prompt with provenance citations, calls the configured
//! text generator, and cleans the raw output into a user-facing answer. The
//! plain inference tasks (generate, summarize, QA, chain) live in [`tasks`]
//! and reuse the same generator and postprocessor.

pub mod api_types;
pub mod error;
pub mod generator;
pub mod postprocess;
pub mod prompt;
pub mod tasks;

pub use api_types::{AskOptions, GenerationResult};
pub use error::GenerationError;
pub use generator::{LlmGenerator, TextGenerator};
pub use postprocess::ResponsePostProcessor;

use std::sync::Arc;

use llm_service::GenerationParams;
use rag_store::RagStore;
use tracing::debug;

/// Engine-level fallbacks for per-request options.
#[derive(Debug, Clone, Copy)]
pub struct EngineDefaults {
    pub k: usize,
    pub max_new_tokens: u32,
    pub temperature: f32,
    /// Char budget for the prompt's context block.
    pub max_ctx_chars: usize,
}

impl Default for EngineDefaults {
    fn default() -> Self {
        Self {
            k: 5,
            max_new_tokens: 256,
            temperature: 0.7,
            max_ctx_chars: 8500,
        }
    }
}

/// Retrieval-augmented answer pipeline: retrieve, prompt, generate, clean.
pub struct AnswerEngine {
    generator: Arc<dyn TextGenerator>,
    postprocess: ResponsePostProcessor,
    defaults: EngineDefaults,
}

impl AnswerEngine {
    pub fn new(
        generator: Arc<dyn TextGenerator>,
        postprocess: ResponsePostProcessor,
        defaults: EngineDefaults,
    ) -> Self {
        Self {
            generator,
            postprocess,
            defaults,
        }
    }

    /// Answers `query` grounded in chunks retrieved from `store`.
    ///
    /// # Errors
    /// Fails with [`GenerationError::EmptyQuery`] for blank queries and
    /// propagates retrieval or generation failures.
    pub async fn answer(
        &self,
        store: &RagStore,
        query: &str,
        opts: AskOptions,
    ) -> Result<GenerationResult, GenerationError> {
        if query.trim().is_empty() {
            return Err(GenerationError::EmptyQuery);
        }

        let k = opts.k.unwrap_or(self.defaults.k);
        let retrieval = store.retrieve(query, k).await?;
        debug!(k, hits = retrieval.results.len(), "retrieved context");

        let prompt = prompt::build_prompt(query, &retrieval.results, self.defaults.max_ctx_chars);
        let params = GenerationParams {
            max_tokens: Some(opts.max_new_tokens.unwrap_or(self.defaults.max_new_tokens)),
            temperature: Some(opts.temperature.unwrap_or(self.defaults.temperature)),
            top_p: None,
        };

        let raw = self.generator.generate(&prompt, Some(params)).await?;
        let answer = self.postprocess.clean(&raw);

        Ok(GenerationResult {
            query: query.trim().to_string(),
            answer,
            raw_generation: raw,
            used_contexts: retrieval.results,
        })
    }

    /// Free-form completion with this engine's generator and cleanup.
    pub async fn generate_text(&self, prompt: &str) -> Result<String, GenerationError> {
        tasks::generate_text(self.generator.as_ref(), &self.postprocess, prompt, None).await
    }

    /// One-paragraph summary via the summarization profile.
    pub async fn summarize(&self, text: &str) -> Result<String, GenerationError> {
        tasks::summarize(self.generator.as_ref(), &self.postprocess, text, None).await
    }

    /// QA over caller-supplied context.
    pub async fn answer_question(
        &self,
        question: &str,
        context: &str,
    ) -> Result<String, GenerationError> {
        tasks::answer_question(
            self.generator.as_ref(),
            &self.postprocess,
            question,
            context,
            None,
        )
        .await
    }

    /// Generate-then-QA chain; returns only the final answer.
    pub async fn chain(&self, query: &str) -> Result<String, GenerationError> {
        tasks::chain(self.generator.as_ref(), &self.postprocess, query, None).await
    }
}
