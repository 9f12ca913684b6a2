//! End-to-end answer flow with stubbed embedding and generation backends.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use generation::{
    AnswerEngine, AskOptions, EngineDefaults, GenerationError, ResponsePostProcessor,
    TextGenerator,
};
use llm_service::GenerationParams;
use rag_store::{
    Document, EmbeddingProvider, InMemoryIndex, Metadata, RagConfig, RagError, RagStore,
};
use serde_json::json;

struct KeywordEmbedder;

const TOPICS: [&str; 2] = ["paris", "rust"];

#[async_trait]
impl EmbeddingProvider for KeywordEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, RagError> {
        let lower = text.to_lowercase();
        Ok(TOPICS
            .iter()
            .map(|t| if lower.contains(t) { 1.0 } else { 0.1 })
            .collect())
    }
}

/// Replies with a fixed answer and records every prompt it was given.
struct RecordingGenerator {
    reply: String,
    prompts: Mutex<Vec<String>>,
}

impl RecordingGenerator {
    fn new(reply: &str) -> Arc<Self> {
        Arc::new(Self {
            reply: reply.to_string(),
            prompts: Mutex::new(Vec::new()),
        })
    }
}

#[async_trait]
impl TextGenerator for RecordingGenerator {
    async fn generate(
        &self,
        prompt: &str,
        _params: Option<GenerationParams>,
    ) -> Result<String, GenerationError> {
        self.prompts.lock().unwrap().push(prompt.to_string());
        Ok(self.reply.clone())
    }
}

fn store() -> RagStore {
    let cfg = RagConfig::new_default("http://unused:6334", "test");
    RagStore::with_index(cfg, Arc::new(KeywordEmbedder), Arc::new(InMemoryIndex::new()))
}

fn engine(generator: Arc<RecordingGenerator>) -> AnswerEngine {
    AnswerEngine::new(
        generator,
        ResponsePostProcessor::default_chat_markers(),
        EngineDefaults::default(),
    )
}

async fn seeded_store() -> RagStore {
    let store = store();
    let mut meta = Metadata::new();
    meta.insert("source".into(), json!("geo.pdf"));
    meta.insert("page".into(), json!(1));
    store
        .ingest_documents(vec![Document::new(
            "The capital of France is Paris.",
            meta,
        )])
        .await
        .unwrap();
    store
}

#[tokio::test]
async fn answer_grounds_in_the_retrieved_chunk() {
    let store = seeded_store().await;
    let generator = RecordingGenerator::new("Paris is the capital [1].");
    let engine = engine(generator.clone());

    let result = engine
        .answer(&store, "What is the capital of France?", AskOptions::default())
        .await
        .unwrap();

    assert!(result.answer.contains("Paris"));
    assert_eq!(result.used_contexts.len(), 1);
    assert!(result.used_contexts[0].text.contains("Paris"));

    let prompts = generator.prompts.lock().unwrap();
    assert!(prompts[0].contains("The capital of France is Paris."));
    assert!(prompts[0].contains("(geo.pdf, page 1)"));
    assert!(prompts[0].contains("What is the capital of France?"));
}

#[tokio::test]
async fn chat_markers_are_stripped_but_raw_is_kept() {
    let store = seeded_store().await;
    let generator = RecordingGenerator::new("echoed prompt Assistant: Paris.");
    let engine = engine(generator);

    let result = engine
        .answer(&store, "Capital of France?", AskOptions::default())
        .await
        .unwrap();
    assert_eq!(result.answer, "Paris.");
    assert_eq!(result.raw_generation, "echoed prompt Assistant: Paris.");
}

#[tokio::test]
async fn blank_question_fails_before_any_backend_call() {
    let store = seeded_store().await;
    let generator = RecordingGenerator::new("unused");
    let engine = engine(generator.clone());

    let err = engine
        .answer(&store, "   ", AskOptions::default())
        .await
        .unwrap_err();
    assert!(matches!(err, GenerationError::EmptyQuery));
    assert!(generator.prompts.lock().unwrap().is_empty());
}

#[tokio::test]
async fn k_option_limits_used_contexts() {
    let store = store();
    let docs = vec![
        Document::new("Paris fact one.", Metadata::new()),
        Document::new("Paris fact two.", Metadata::new()),
        Document::new("Rust fact.", Metadata::new()),
    ];
    store.ingest_documents(docs).await.unwrap();

    let engine = engine(RecordingGenerator::new("answer"));
    let result = engine
        .answer(
            &store,
            "Paris?",
            AskOptions {
                k: Some(2),
                ..AskOptions::default()
            },
        )
        .await
        .unwrap();
    assert_eq!(result.used_contexts.len(), 2);
}
