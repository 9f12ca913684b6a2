//! High-level RAG store: document ingestion + retrieval over a vector index.
//!
//! ```text
//! ingest:   loader -> splitter -> embedder -> index
//! retrieve: query  -> embedder -> index search
//! ```
//!
//! The default index is Qdrant ([`QdrantIndex`]); [`InMemoryIndex`] backs
//! per-request document sessions and tests. The design is flat (no deep
//! nesting) and splits responsibilities into focused modules.

pub mod config;
pub mod embed;
pub mod errors;
pub mod index;
pub mod ingest;
pub mod loader;
pub mod memory;
pub mod qdrant_facade;
pub mod record;
pub mod retrieve;
pub mod splitter;

pub use config::{DistanceKind, RagConfig, VectorSpace};
pub use embed::{Embedder, EmbeddingProvider, LlmEmbedder};
pub use errors::RagError;
pub use index::VectorIndex;
pub use loader::SourceKind;
pub use memory::InMemoryIndex;
pub use qdrant_facade::QdrantIndex;
pub use record::{
    Document, IndexEntry, IngestReport, META_CHUNK, META_PAGE, META_SOURCE, Metadata, Retrieval,
    RetrievalResult,
};
pub use splitter::Splitter;

use std::path::Path;
use std::sync::Arc;

use tracing::info;

/// High-level facade wiring configuration, embedder and index together.
///
/// This is the single entry point recommended for application code.
pub struct RagStore {
    cfg: RagConfig,
    embedder: Embedder,
    index: Arc<dyn VectorIndex>,
}

impl RagStore {
    /// Opens a store backed by the configured Qdrant collection.
    ///
    /// # Errors
    /// Returns `RagError::Config` for invalid configuration and
    /// `RagError::Qdrant` when the client cannot be initialized.
    pub fn open(
        cfg: RagConfig,
        provider: Arc<dyn EmbeddingProvider>,
    ) -> Result<Self, RagError> {
        cfg.validate()?;
        let index: Arc<dyn VectorIndex> = Arc::new(QdrantIndex::new(&cfg)?);
        Ok(Self::with_index(cfg, provider, index))
    }

    /// Builds a store over an arbitrary index backend.
    pub fn with_index(
        cfg: RagConfig,
        provider: Arc<dyn EmbeddingProvider>,
        index: Arc<dyn VectorIndex>,
    ) -> Self {
        let embedder = Embedder::new(
            provider,
            cfg.embed_batch,
            cfg.normalize,
            cfg.embedding_dim,
        );
        Self { cfg, embedder, index }
    }

    /// A fresh in-memory store sharing this store's config and embedder.
    /// Used for one-shot document sessions that must not touch the
    /// persistent collection.
    pub fn ephemeral(&self) -> Self {
        Self {
            cfg: self.cfg.clone(),
            embedder: self.embedder.clone(),
            index: Arc::new(InMemoryIndex::new()),
        }
    }

    /// Loads every PDF in `folder` and indexes it, with an upsert progress
    /// bar on stderr.
    ///
    /// # Errors
    /// Fails when the folder is unreadable, holds no loadable PDFs, or any
    /// pipeline stage fails.
    pub async fn ingest_folder(&self, folder: &Path) -> Result<IngestReport, RagError> {
        info!(folder = %folder.display(), "ingesting folder");
        let documents = loader::load_pdf_folder(folder).await?;
        ingest::ingest_documents(&self.cfg, &self.embedder, self.index.as_ref(), documents, true)
            .await
    }

    /// Indexes already-loaded documents (uploads, fetched pages).
    pub async fn ingest_documents(
        &self,
        documents: Vec<Document>,
    ) -> Result<IngestReport, RagError> {
        ingest::ingest_documents(&self.cfg, &self.embedder, self.index.as_ref(), documents, false)
            .await
    }

    /// Returns the `k` chunks most similar to `query`, closest first.
    pub async fn retrieve(&self, query: &str, k: usize) -> Result<Retrieval, RagError> {
        retrieve::retrieve(&self.embedder, self.index.as_ref(), query, k).await
    }

    /// Removes every indexed chunk.
    pub async fn delete_all(&self) -> Result<(), RagError> {
        self.index.delete_all().await
    }

    /// Best-effort count of indexed chunks.
    pub async fn count(&self) -> Option<u64> {
        self.index.count().await
    }

    pub fn config(&self) -> &RagConfig {
        &self.cfg
    }
}
