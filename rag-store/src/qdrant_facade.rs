//! Qdrant-backed [`VectorIndex`].
//!
//! This facade concentrates all Qdrant interactions behind the index trait,
//! hiding away the verbose builder pattern and keeping the rest of the
//! application decoupled from `qdrant-client`.

use std::sync::atomic::{AtomicBool, Ordering};

use async_trait::async_trait;
use qdrant_client::Payload;
use qdrant_client::Qdrant;
use qdrant_client::qdrant::{
    CreateCollectionBuilder, DeletePointsBuilder, Distance, Filter, PointStruct,
    SearchParamsBuilder, SearchPointsBuilder, UpsertPointsBuilder, Value as QValue,
    VectorParamsBuilder,
};
use tracing::{debug, info, warn};

use crate::config::{DistanceKind, RagConfig, VectorSpace};
use crate::errors::RagError;
use crate::index::VectorIndex;
use crate::record::{IndexEntry, Metadata, RetrievalResult};

pub struct QdrantIndex {
    client: Qdrant,
    collection: String,
    distance: DistanceKind,
    exact_search: bool,
    ensured: AtomicBool,
}

impl QdrantIndex {
    /// Creates a new index handle from the given configuration.
    ///
    /// Uses the builder-based API of `qdrant-client` and supports optional
    /// API key authentication. The collection itself is created lazily on
    /// the first `add`, once the vector size is known.
    pub fn new(cfg: &RagConfig) -> Result<Self, RagError> {
        let mut builder = Qdrant::from_url(&cfg.qdrant_url);
        if let Some(key) = &cfg.qdrant_api_key {
            builder = builder.api_key(key.clone());
        }
        let client = builder
            .build()
            .map_err(|e| RagError::Qdrant(e.to_string()))?;

        Ok(Self {
            client,
            collection: cfg.collection.clone(),
            distance: cfg.distance,
            exact_search: cfg.exact_search,
            ensured: AtomicBool::new(false),
        })
    }

    /// Ensures that the collection exists in Qdrant.
    ///
    /// - If the collection already exists → no-op.
    /// - If missing → creates it with the given vector space configuration.
    async fn ensure_collection(&self, space: VectorSpace) -> Result<(), RagError> {
        if self.ensured.load(Ordering::Acquire) {
            return Ok(());
        }

        match self.client.collection_info(&self.collection).await {
            Ok(_) => {
                debug!("Collection '{}' already exists", self.collection);
                self.ensured.store(true, Ordering::Release);
                return Ok(());
            }
            Err(err) => {
                warn!(
                    "Collection '{}' not found, will be created (error={})",
                    self.collection, err
                );
            }
        }

        self.client
            .create_collection(
                CreateCollectionBuilder::new(&self.collection).vectors_config(
                    VectorParamsBuilder::new(space.size as u64, qdrant_distance(space.distance)),
                ),
            )
            .await
            .map_err(|e| RagError::Qdrant(e.to_string()))?;

        info!(
            "Collection '{}' created with size={} distance={:?}",
            self.collection, space.size, space.distance
        );
        self.ensured.store(true, Ordering::Release);
        Ok(())
    }
}

#[async_trait]
impl VectorIndex for QdrantIndex {
    async fn add(&self, entries: Vec<IndexEntry>) -> Result<usize, RagError> {
        let Some(first) = entries.first() else {
            debug!("No points provided for upsert");
            return Ok(0);
        };
        self.ensure_collection(VectorSpace {
            size: first.vector.len(),
            distance: self.distance,
        })
        .await?;

        let points: Vec<PointStruct> = entries
            .into_iter()
            .map(|entry| {
                let payload = entry_payload(&entry)?;
                Ok(PointStruct::new(entry.id, entry.vector, payload))
            })
            .collect::<Result<_, RagError>>()?;
        let added = points.len();

        self.client
            .upsert_points(UpsertPointsBuilder::new(&self.collection, points))
            .await
            .map_err(|e| RagError::Qdrant(e.to_string()))?;

        debug!("Upserted {} points into '{}'", added, self.collection);
        Ok(added)
    }

    async fn search(&self, vector: Vec<f32>, k: usize) -> Result<Vec<RetrievalResult>, RagError> {
        let mut builder =
            SearchPointsBuilder::new(&self.collection, vector, k as u64).with_payload(true);
        if self.exact_search {
            builder = builder.params(SearchParamsBuilder::default().exact(true));
        }

        let res = self
            .client
            .search_points(builder)
            .await
            .map_err(|e| RagError::Qdrant(e.to_string()))?;

        let mut out = Vec::with_capacity(res.result.len());
        for point in res.result {
            let (text, metadata) = split_payload(point.payload);
            out.push(RetrievalResult {
                text,
                metadata,
                distance: score_to_distance(self.distance, point.score),
            });
        }

        debug!("Search completed: {} hits returned", out.len());
        Ok(out)
    }

    async fn delete_all(&self) -> Result<(), RagError> {
        if self.client.collection_info(&self.collection).await.is_err() {
            // A missing collection counts as already empty.
            return Ok(());
        }

        // An empty filter selects every point.
        self.client
            .delete_points(
                DeletePointsBuilder::new(&self.collection)
                    .points(Filter::default())
                    .wait(true),
            )
            .await
            .map_err(|e| RagError::Qdrant(e.to_string()))?;

        info!("Cleared all points from '{}'", self.collection);
        Ok(())
    }

    async fn count(&self) -> Option<u64> {
        self.client
            .collection_info(&self.collection)
            .await
            .ok()
            .and_then(|info| info.result)
            .and_then(|r| r.points_count)
    }
}

fn qdrant_distance(kind: DistanceKind) -> Distance {
    match kind {
        DistanceKind::Cosine => Distance::Cosine,
        DistanceKind::Dot => Distance::Dot,
        DistanceKind::Euclid => Distance::Euclid,
    }
}

/// Qdrant scores run "higher is better" for Cosine and Dot; retrieval results
/// are ordered by ascending distance, so map the score accordingly.
fn score_to_distance(kind: DistanceKind, score: f32) -> f32 {
    match kind {
        DistanceKind::Cosine => 1.0 - score,
        DistanceKind::Dot => -score,
        DistanceKind::Euclid => score,
    }
}

/// Builds a flat payload: chunk text under `text`, metadata keys alongside.
fn entry_payload(entry: &IndexEntry) -> Result<Payload, RagError> {
    let mut map = serde_json::Map::new();
    map.insert("text".to_string(), serde_json::json!(entry.text));
    for (key, value) in &entry.metadata {
        if key == "text" {
            continue;
        }
        map.insert(key.clone(), value.clone());
    }
    Payload::try_from(serde_json::Value::Object(map))
        .map_err(|e| RagError::Qdrant(format!("unsupported payload value: {e}")))
}

/// Pulls the chunk text back out of a stored payload; everything else is
/// metadata. Values are `qdrant_client::qdrant::Value`; `into_json()` is the
/// supported way to read them.
fn split_payload(payload: std::collections::HashMap<String, QValue>) -> (String, Metadata) {
    let mut text = String::new();
    let mut metadata = Metadata::new();
    for (key, value) in payload {
        let json = value.into_json();
        if key == "text" {
            if let serde_json::Value::String(s) = json {
                text = s;
            }
        } else {
            metadata.insert(key, json);
        }
    }
    (text, metadata)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cosine_scores_invert_into_distances() {
        assert!(score_to_distance(DistanceKind::Cosine, 0.9) < score_to_distance(DistanceKind::Cosine, 0.2));
    }

    #[test]
    fn dot_scores_negate_into_distances() {
        assert!(score_to_distance(DistanceKind::Dot, 5.0) < score_to_distance(DistanceKind::Dot, 1.0));
    }

    #[test]
    fn euclid_scores_pass_through() {
        assert_eq!(score_to_distance(DistanceKind::Euclid, 0.7), 0.7);
    }

    #[test]
    fn payload_round_trips_text_and_metadata() {
        let mut metadata = Metadata::new();
        metadata.insert("source".into(), serde_json::json!("a.pdf"));
        metadata.insert("page".into(), serde_json::json!(2));
        let entry = IndexEntry {
            id: "id-1".into(),
            vector: vec![0.1],
            text: "chunk body".into(),
            metadata: metadata.clone(),
        };

        let payload = entry_payload(&entry).unwrap();
        let (text, meta) = split_payload(std::collections::HashMap::from(payload));
        assert_eq!(text, "chunk body");
        assert_eq!(meta, metadata);
    }
}
