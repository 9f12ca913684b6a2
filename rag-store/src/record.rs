//! Core data models flowing through the pipeline.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// Metadata key for the originating file name or URL.
pub const META_SOURCE: &str = "source";
/// Metadata key for the 1-based page number of PDF sources.
pub const META_PAGE: &str = "page";
/// Metadata key for the 0-based chunk ordinal within one source document.
pub const META_CHUNK: &str = "chunk";

/// Arbitrary provenance fields carried alongside text.
pub type Metadata = BTreeMap<String, Value>;

/// One unit of raw text plus provenance, as produced by a loader.
///
/// Loaders emit one `Document` per PDF page; the splitter re-emits bounded
/// documents that inherit the source metadata.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    pub content: String,
    #[serde(default)]
    pub metadata: Metadata,
}

impl Document {
    pub fn new(content: impl Into<String>, metadata: Metadata) -> Self {
        Self { content: content.into(), metadata }
    }
}

/// One embedded chunk as stored in a vector index.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexEntry {
    /// Random v4 UUID. Never derived from store size, so re-ingesting the
    /// same source can never overwrite existing points.
    pub id: String,
    pub vector: Vec<f32>,
    pub text: String,
    #[serde(default)]
    pub metadata: Metadata,
}

impl IndexEntry {
    /// Pairs one embedded vector with the chunk it came from.
    pub fn from_pair(vector: Vec<f32>, chunk: Document) -> Self {
        Self {
            id: Uuid::new_v4().to_string(),
            vector,
            text: chunk.content,
            metadata: chunk.metadata,
        }
    }
}

/// One search hit.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetrievalResult {
    pub text: String,
    #[serde(default)]
    pub metadata: Metadata,
    /// Distance to the query vector; 0.0 is an exact match.
    pub distance: f32,
}

/// A full retrieval response echoing the query it answered.
#[derive(Debug, Clone, Serialize)]
pub struct Retrieval {
    pub query: String,
    pub k: usize,
    pub results: Vec<RetrievalResult>,
}

/// Counters reported after one ingestion run.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct IngestReport {
    pub pages_loaded: usize,
    pub chunks_created: usize,
    pub items_added: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn entries_from_identical_chunks_get_distinct_ids() {
        let chunk = Document::new("same text", Metadata::new());
        let a = IndexEntry::from_pair(vec![1.0], chunk.clone());
        let b = IndexEntry::from_pair(vec![1.0], chunk);
        assert_ne!(a.id, b.id);
    }

    #[test]
    fn entry_id_is_a_uuid() {
        let entry = IndexEntry::from_pair(vec![0.5], Document::new("t", Metadata::new()));
        assert!(Uuid::parse_str(&entry.id).is_ok());
    }
}
