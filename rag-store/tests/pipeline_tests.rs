//! Ingest-and-retrieve pipeline over the in-memory index.

use std::sync::Arc;

use async_trait::async_trait;
use rag_store::{
    Document, EmbeddingProvider, InMemoryIndex, Metadata, RagConfig, RagError, RagStore,
};
use serde_json::json;

/// Keyword bag embedder: one dimension per topic word, so cosine distance
/// behaves predictably in assertions.
struct KeywordEmbedder;

const TOPICS: [&str; 3] = ["paris", "rust", "cheese"];

#[async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, RagError> {
        let lower = text.to_lowercase();
        Ok(TOPICS
            .iter()
            .map(|topic| {
                if lower.contains(topic) {
                    1.0
                } else {
                    0.1
                }
            })
            .collect())
    }
}

fn store() -> RagStore {
    let cfg = RagConfig::new_default("http://unused:6334", "test");
    RagStore::with_index(cfg, Arc::new(KeywordEmbedder), Arc::new(InMemoryIndex::new()))
}

fn doc(text: &str, source: &str) -> Document {
    let mut meta = Metadata::new();
    meta.insert("source".into(), json!(source));
    Document::new(text, meta)
}

#[tokio::test]
async fn ingest_then_retrieve_finds_the_right_chunk() {
    let store = store();
    let report = store
        .ingest_documents(vec![
            doc("Paris is the capital of France.", "geo.pdf"),
            doc("Rust has a strict borrow checker.", "lang.pdf"),
            doc("Cheese pairs well with wine.", "food.pdf"),
        ])
        .await
        .unwrap();
    assert_eq!(report.pages_loaded, 3);
    assert_eq!(report.chunks_created, 3);
    assert_eq!(report.items_added, 3);

    let retrieval = store.retrieve("tell me about Rust", 1).await.unwrap();
    assert_eq!(retrieval.results.len(), 1);
    assert!(retrieval.results[0].text.contains("borrow checker"));
    assert_eq!(retrieval.results[0].metadata.get("source"), Some(&json!("lang.pdf")));
}

#[tokio::test]
async fn empty_query_is_rejected() {
    let store = store();
    store
        .ingest_documents(vec![doc("Paris again.", "geo.pdf")])
        .await
        .unwrap();

    let err = store.retrieve("   ", 3).await.unwrap_err();
    assert!(matches!(err, RagError::EmptyQuery));
}

#[tokio::test]
async fn whitespace_documents_fail_with_no_chunks() {
    let store = store();
    let err = store
        .ingest_documents(vec![doc("   \n ", "blank.pdf")])
        .await
        .unwrap_err();
    assert!(matches!(err, RagError::NoChunks));
}

#[tokio::test]
async fn reingesting_accumulates_instead_of_overwriting() {
    let store = store();
    store
        .ingest_documents(vec![doc("Paris one.", "a.pdf")])
        .await
        .unwrap();
    store
        .ingest_documents(vec![doc("Paris two.", "a.pdf")])
        .await
        .unwrap();
    assert_eq!(store.count().await, Some(2));
}

#[tokio::test]
async fn delete_all_resets_the_store() {
    let store = store();
    store
        .ingest_documents(vec![doc("Cheese facts.", "food.pdf")])
        .await
        .unwrap();

    store.delete_all().await.unwrap();
    assert_eq!(store.count().await, Some(0));
    let retrieval = store.retrieve("cheese", 5).await.unwrap();
    assert!(retrieval.results.is_empty());
}

#[tokio::test]
async fn ephemeral_store_is_isolated_from_its_parent() {
    let store = store();
    store
        .ingest_documents(vec![doc("Paris in the parent.", "a.pdf")])
        .await
        .unwrap();

    let session = store.ephemeral();
    assert_eq!(session.count().await, Some(0));

    session
        .ingest_documents(vec![doc("Rust in the session.", "upload.docx")])
        .await
        .unwrap();
    assert_eq!(session.count().await, Some(1));
    assert_eq!(store.count().await, Some(1));
}
