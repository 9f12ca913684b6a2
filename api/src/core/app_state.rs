//! Shared application state, built once at startup before any route is
//! served.

use std::path::PathBuf;
use std::sync::Arc;

use generation::{AnswerEngine, EngineDefaults, LlmGenerator, ResponsePostProcessor};
use llm_service::LlmServiceProfiles;
use rag_store::{DistanceKind, LlmEmbedder, RagConfig, RagStore};

use crate::error_handler::AppError;

/// Gateway knobs loaded from environment variables. Everything except
/// `SERVICE_TOKEN` has a default.
#[derive(Clone, Debug)]
pub struct GatewayConfig {
    /// Listen address, e.g. "0.0.0.0:8000".
    pub api_address: String,
    /// Shared secret required by mutating/generation endpoints.
    pub service_token: String,
    /// Folder scanned by `/add` for PDF files.
    pub source_folder: PathBuf,

    // Vector index
    pub qdrant_url: String,
    pub qdrant_api_key: Option<String>,
    pub collection: String,
    pub upsert_batch: usize,
    pub exact_search: bool,
    pub embedding_dim: Option<usize>,

    // Chunking / embedding
    pub chunk_size: usize,
    pub chunk_overlap: usize,
    pub embed_batch: usize,
    pub normalize: bool,

    // Answering
    pub top_k: usize,
    pub max_new_tokens: u32,
    pub temperature: f32,
    pub max_ctx_chars: usize,
    /// Extra postprocessing markers, comma-separated in `ANSWER_MARKERS`.
    pub answer_markers: Option<Vec<String>>,
}

impl GatewayConfig {
    /// Build from environment variables with defaults.
    ///
    /// # Errors
    /// Fails when `SERVICE_TOKEN` is unset; every other knob has a default.
    pub fn from_env() -> Result<Self, AppError> {
        let service_token =
            std::env::var("SERVICE_TOKEN").map_err(|_| AppError::MissingEnv("SERVICE_TOKEN"))?;

        let answer_markers = std::env::var("ANSWER_MARKERS").ok().map(|raw| {
            raw.split(',')
                .map(str::trim)
                .filter(|m| !m.is_empty())
                .map(str::to_string)
                .collect()
        });

        Ok(Self {
            api_address: env("API_ADDRESS", "0.0.0.0:8000"),
            service_token,
            source_folder: PathBuf::from(env("SOURCE_FOLDER", "data")),

            qdrant_url: env("QDRANT_URL", "http://localhost:6334"),
            qdrant_api_key: std::env::var("QDRANT_API_KEY").ok(),
            collection: env("QDRANT_COLLECTION", "rag_collection"),
            upsert_batch: parse("QDRANT_BATCH_SIZE", 256),
            exact_search: env("RAG_EXACT_SEARCH", "false") == "true",
            embedding_dim: std::env::var("EMBEDDING_DIM")
                .ok()
                .and_then(|s| s.parse().ok()),

            chunk_size: parse("CHUNK_SIZE", 800),
            chunk_overlap: parse("CHUNK_OVERLAP", 100),
            embed_batch: parse("EMBED_BATCH_SIZE", 32),
            normalize: env("EMBED_NORMALIZE", "true") == "true",

            top_k: parse("RAG_TOP_K", 5),
            max_new_tokens: parse("LLM_MAX_NEW_TOKENS", 256),
            temperature: parse("LLM_TEMPERATURE", 0.7f32),
            max_ctx_chars: parse("MAX_CTX_CHARS", 8500usize),
            answer_markers,
        })
    }

    /// Convert to a `rag_store::RagConfig` used by `RagStore`.
    pub fn rag_config(&self) -> RagConfig {
        RagConfig {
            qdrant_url: self.qdrant_url.clone(),
            qdrant_api_key: self.qdrant_api_key.clone(),
            collection: self.collection.clone(),
            distance: DistanceKind::Cosine,
            upsert_batch: self.upsert_batch,
            exact_search: self.exact_search,
            chunk_size: self.chunk_size,
            chunk_overlap: self.chunk_overlap,
            embed_batch: self.embed_batch,
            normalize: self.normalize,
            embedding_dim: self.embedding_dim,
        }
    }

    fn engine_defaults(&self) -> EngineDefaults {
        EngineDefaults {
            k: self.top_k,
            max_new_tokens: self.max_new_tokens,
            temperature: self.temperature,
            max_ctx_chars: self.max_ctx_chars,
        }
    }

    fn postprocessor(&self) -> ResponsePostProcessor {
        match &self.answer_markers {
            Some(markers) => ResponsePostProcessor::new(markers.clone()),
            None => ResponsePostProcessor::default_chat_markers(),
        }
    }
}

/// Shared state for all HTTP handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: GatewayConfig,
    /// LLM provider profiles (generation, summarization, embedding).
    pub svc: Arc<LlmServiceProfiles>,
    /// Persistent store over the configured Qdrant collection.
    pub store: Arc<RagStore>,
    /// RAG answer pipeline on top of `store`.
    pub answerer: Arc<AnswerEngine>,
}

impl AppState {
    /// Load config and construct every service, models before routes.
    ///
    /// # Errors
    /// Fails on missing/invalid environment or an unusable Qdrant URL.
    pub fn from_env() -> Result<Self, AppError> {
        let config = GatewayConfig::from_env()?;

        let svc = Arc::new(LlmServiceProfiles::from_env()?);
        let store = Arc::new(RagStore::open(
            config.rag_config(),
            Arc::new(LlmEmbedder::new(svc.clone())),
        )?);
        let answerer = Arc::new(AnswerEngine::new(
            Arc::new(LlmGenerator::new(svc.clone())),
            config.postprocessor(),
            config.engine_defaults(),
        ));

        Ok(Self {
            config,
            svc,
            store,
            answerer,
        })
    }
}

fn env(k: &str, dflt: &str) -> String {
    std::env::var(k).unwrap_or_else(|_| dflt.to_string())
}

fn parse<T: std::str::FromStr>(k: &str, dflt: T) -> T {
    std::env::var(k)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(dflt)
}
