//! In-memory vector index.
//!
//! Brute-force cosine scan over a `Vec`. Used for per-request document
//! sessions and in tests; nothing here survives a restart.

use async_trait::async_trait;
use tokio::sync::RwLock;

use crate::errors::RagError;
use crate::index::VectorIndex;
use crate::record::{IndexEntry, RetrievalResult};

#[derive(Default)]
pub struct InMemoryIndex {
    entries: RwLock<Vec<IndexEntry>>,
}

impl InMemoryIndex {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl VectorIndex for InMemoryIndex {
    async fn add(&self, entries: Vec<IndexEntry>) -> Result<usize, RagError> {
        let added = entries.len();
        self.entries.write().await.extend(entries);
        Ok(added)
    }

    async fn search(&self, vector: Vec<f32>, k: usize) -> Result<Vec<RetrievalResult>, RagError> {
        let entries = self.entries.read().await;
        let mut results: Vec<RetrievalResult> = entries
            .iter()
            .map(|entry| RetrievalResult {
                text: entry.text.clone(),
                metadata: entry.metadata.clone(),
                distance: 1.0 - cosine_similarity(&vector, &entry.vector),
            })
            .collect();
        results.sort_by(|a, b| a.distance.total_cmp(&b.distance));
        results.truncate(k);
        Ok(results)
    }

    async fn delete_all(&self) -> Result<(), RagError> {
        self.entries.write().await.clear();
        Ok(())
    }

    async fn count(&self) -> Option<u64> {
        Some(self.entries.read().await.len() as u64)
    }
}

/// Returns 0.0 for mismatched lengths or zero-norm inputs instead of NaN.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    if a.len() != b.len() || a.is_empty() {
        return 0.0;
    }
    let dot: f32 = a.iter().zip(b).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Metadata;

    fn entry(id: &str, vector: Vec<f32>, text: &str) -> IndexEntry {
        IndexEntry {
            id: id.to_string(),
            vector,
            text: text.to_string(),
            metadata: Metadata::new(),
        }
    }

    #[tokio::test]
    async fn search_orders_by_ascending_distance() {
        let index = InMemoryIndex::new();
        index
            .add(vec![
                entry("a", vec![0.0, 1.0], "orthogonal"),
                entry("b", vec![1.0, 0.0], "aligned"),
                entry("c", vec![1.0, 1.0], "diagonal"),
            ])
            .await
            .unwrap();

        let results = index.search(vec![1.0, 0.0], 3).await.unwrap();
        assert_eq!(results[0].text, "aligned");
        assert_eq!(results[1].text, "diagonal");
        assert_eq!(results[2].text, "orthogonal");
        assert!(results[0].distance <= results[1].distance);
        assert!(results[1].distance <= results[2].distance);
    }

    #[tokio::test]
    async fn k_caps_the_result_count() {
        let index = InMemoryIndex::new();
        index
            .add(vec![
                entry("a", vec![1.0, 0.0], "one"),
                entry("b", vec![0.9, 0.1], "two"),
                entry("c", vec![0.0, 1.0], "three"),
            ])
            .await
            .unwrap();

        let results = index.search(vec![1.0, 0.0], 2).await.unwrap();
        assert_eq!(results.len(), 2);
    }

    #[tokio::test]
    async fn delete_all_empties_the_index() {
        let index = InMemoryIndex::new();
        index.add(vec![entry("a", vec![1.0], "x")]).await.unwrap();
        index.delete_all().await.unwrap();
        assert_eq!(index.count().await, Some(0));
        assert!(index.search(vec![1.0], 5).await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn repeated_adds_accumulate() {
        let index = InMemoryIndex::new();
        index.add(vec![entry("a", vec![1.0], "x")]).await.unwrap();
        index.add(vec![entry("b", vec![0.5], "y")]).await.unwrap();
        assert_eq!(index.count().await, Some(2));
    }

    #[tokio::test]
    async fn zero_query_vector_is_harmless() {
        let index = InMemoryIndex::new();
        index.add(vec![entry("a", vec![1.0, 2.0], "x")]).await.unwrap();
        let results = index.search(vec![0.0, 0.0], 1).await.unwrap();
        assert_eq!(results.len(), 1);
        assert!(results[0].distance.is_finite());
    }
}
