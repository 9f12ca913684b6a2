//! Typed error for the generation crate.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum GenerationError {
    /// The caller sent a blank query or prompt.
    #[error("Query cannot be empty.")]
    EmptyQuery,

    /// Errors from the underlying rag-store crate.
    #[error("RAG error: {0}")]
    Rag(#[from] rag_store::RagError),

    /// Errors from the LLM provider layer.
    #[error("LLM error: {0}")]
    Llm(#[from] llm_service::LlmError),
}
