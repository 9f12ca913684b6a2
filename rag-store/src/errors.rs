//! Unified error types for the crate.

use thiserror::Error;

/// Top-level error for rag-store operations.
#[derive(Debug, Error)]
pub enum RagError {
    /// I/O or filesystem errors.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Invalid or unsupported configuration.
    #[error("config error: {0}")]
    Config(String),

    /// A source that cannot be loaded: missing folder, unsupported kind,
    /// unreachable URL.
    #[error("invalid source: {0}")]
    InvalidSource(String),

    /// A source that loaded but whose text cannot be extracted.
    #[error("failed to extract text: {0}")]
    Extract(String),

    /// Blank retrieval or generation query.
    #[error("Query cannot be empty.")]
    EmptyQuery,

    /// An ingestion source produced no documents.
    #[error("{0}")]
    NoDocuments(String),

    /// The splitter produced no chunks from non-empty input.
    #[error("Splitter produced no chunks")]
    NoChunks,

    /// Mismatch in vector dimensionality across records.
    #[error("vector size mismatch: got {got}, want {want}")]
    VectorSizeMismatch { got: usize, want: usize },

    /// Embedding provider failure.
    #[error("embedding failed: {0}")]
    Embedding(#[from] llm_service::LlmError),

    /// Qdrant client errors (wrapped).
    #[error("qdrant error: {0}")]
    Qdrant(String),
}
