//! Vector index abstraction.

use async_trait::async_trait;

use crate::errors::RagError;
use crate::record::{IndexEntry, RetrievalResult};

/// Storage backend for embedded chunks.
///
/// Implementations must return search results ordered by ascending distance
/// (closest match first).
#[async_trait]
pub trait VectorIndex: Send + Sync {
    /// Adds entries to the index, returning how many were stored.
    async fn add(&self, entries: Vec<IndexEntry>) -> Result<usize, RagError>;

    /// Returns the `k` entries closest to `vector`, ascending by distance.
    async fn search(&self, vector: Vec<f32>, k: usize) -> Result<Vec<RetrievalResult>, RagError>;

    /// Removes every entry from the index.
    async fn delete_all(&self) -> Result<(), RagError>;

    /// Best-effort point count; `None` when the backend cannot tell.
    async fn count(&self) -> Option<u64>;
}
