//! Runtime and collection configuration.

use crate::errors::RagError;

/// Distance function used for the vector space.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum DistanceKind {
    /// Cosine distance (recommended for most embeddings).
    Cosine,
    /// Dot product (useful for normalized vectors).
    Dot,
    /// Euclidean distance (L2).
    Euclid,
}

/// Describes the vector space of the collection.
#[derive(Clone, Copy, Debug)]
pub struct VectorSpace {
    /// Dimensionality of vectors.
    pub size: usize,
    /// Distance function.
    pub distance: DistanceKind,
}

/// Settings shared by every pipeline stage: chunking, embedding and the
/// vector index.
#[derive(Clone, Debug)]
pub struct RagConfig {
    /// Qdrant HTTP endpoint, e.g. `http://localhost:6334`.
    pub qdrant_url: String,
    /// Optional API key for Qdrant Cloud.
    pub qdrant_api_key: Option<String>,
    /// Target collection name.
    pub collection: String,
    /// Distance function (Cosine by default).
    pub distance: DistanceKind,
    /// Upsert batch size (typical range: 128..512).
    pub upsert_batch: usize,
    /// Exact search flag (false = HNSW ANN).
    pub exact_search: bool,

    /// Max characters per chunk.
    pub chunk_size: usize,
    /// Characters shared between consecutive chunks on hard cuts.
    pub chunk_overlap: usize,

    /// Texts per embedding batch.
    pub embed_batch: usize,
    /// L2-normalize vectors after embedding.
    pub normalize: bool,
    /// Expected vector width; checked against provider output when set.
    pub embedding_dim: Option<usize>,
}

impl RagConfig {
    /// Creates a sane default config for a given collection name and Qdrant endpoint.
    pub fn new_default(url: impl Into<String>, collection: impl Into<String>) -> Self {
        Self {
            qdrant_url: url.into(),
            qdrant_api_key: None,
            collection: collection.into(),
            distance: DistanceKind::Cosine,
            upsert_batch: 256,
            exact_search: false,
            chunk_size: 800,
            chunk_overlap: 100,
            embed_batch: 32,
            normalize: true,
            embedding_dim: None,
        }
    }

    /// Validates config values.
    ///
    /// # Errors
    /// Fails when names are blank or the chunking and batching settings
    /// cannot make forward progress.
    pub fn validate(&self) -> Result<(), RagError> {
        if self.qdrant_url.trim().is_empty() {
            return Err(RagError::Config("qdrant_url is empty".into()));
        }
        if self.collection.trim().is_empty() {
            return Err(RagError::Config("collection is empty".into()));
        }
        if self.upsert_batch == 0 {
            return Err(RagError::Config("upsert_batch must be > 0".into()));
        }
        if self.chunk_size == 0 {
            return Err(RagError::Config("chunk_size must be > 0".into()));
        }
        if self.chunk_overlap >= self.chunk_size {
            return Err(RagError::Config(format!(
                "chunk_overlap ({}) must be smaller than chunk_size ({})",
                self.chunk_overlap, self.chunk_size
            )));
        }
        if self.embed_batch == 0 {
            return Err(RagError::Config("embed_batch must be > 0".into()));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_validate() {
        assert!(RagConfig::new_default("http://localhost:6334", "docs").validate().is_ok());
    }

    #[test]
    fn overlap_must_stay_below_chunk_size() {
        let mut cfg = RagConfig::new_default("http://localhost:6334", "docs");
        cfg.chunk_overlap = cfg.chunk_size;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn blank_collection_is_rejected() {
        let cfg = RagConfig::new_default("http://localhost:6334", "   ");
        assert!(cfg.validate().is_err());
    }
}
