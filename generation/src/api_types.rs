//! Request options and result types for the answer engine.

use rag_store::RetrievalResult;
use serde::Serialize;

/// Per-request overrides for [`crate::AnswerEngine::answer`]. Unset fields
/// fall back to the engine defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct AskOptions {
    /// How many context chunks to retrieve.
    pub k: Option<usize>,
    /// Generation token cap.
    pub max_new_tokens: Option<u32>,
    /// Sampling temperature.
    pub temperature: Option<f32>,
}

/// A grounded answer with its provenance.
#[derive(Debug, Clone, Serialize)]
pub struct GenerationResult {
    pub query: String,
    /// The cleaned, user-facing answer.
    pub answer: String,
    /// The raw model output before postprocessing.
    pub raw_generation: String,
    /// Chunks the prompt was built from, closest first.
    pub used_contexts: Vec<RetrievalResult>,
}
