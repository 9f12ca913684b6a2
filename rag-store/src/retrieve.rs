//! Query-time retrieval: embed the query, search the index.

use tracing::debug;

use crate::embed::Embedder;
use crate::errors::RagError;
use crate::index::VectorIndex;
use crate::record::Retrieval;

/// Embeds `query` and returns its `k` nearest chunks, closest first.
///
/// # Errors
/// Returns [`RagError::EmptyQuery`] for whitespace-only queries, otherwise
/// embedding or index failures.
pub(crate) async fn retrieve(
    embedder: &Embedder,
    index: &dyn VectorIndex,
    query: &str,
    k: usize,
) -> Result<Retrieval, RagError> {
    if query.trim().is_empty() {
        return Err(RagError::EmptyQuery);
    }

    let vector = embedder.embed_query(query).await?;
    let results = index.search(vector, k).await?;
    debug!(k, hits = results.len(), "retrieval complete");

    Ok(Retrieval {
        query: query.to_string(),
        k,
        results,
    })
}
