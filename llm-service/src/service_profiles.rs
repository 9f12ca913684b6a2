//! Profile registry plus cached provider clients.
//!
//! One [`LlmServiceProfiles`] is built at startup and shared behind an
//! `Arc`. Concrete HTTP clients are created lazily per distinct
//! (endpoint, model, key, timeout) tuple and cached, so repeated calls reuse
//! connection pools instead of rebuilding clients.
//!
//! # Example
//! ```no_run
//! use llm_service::service_profiles::LlmServiceProfiles;
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let svc = LlmServiceProfiles::from_env()?;
//!     let text = svc.generate("Say hi.", None, None).await?;
//!     println!("{text}");
//!     Ok(())
//! }
//! ```

use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

use crate::config::default_config::{config_embedding, config_generation, config_summarization};
use crate::config::llm_model_config::{GenerationParams, LlmModelConfig};
use crate::config::llm_provider::LlmProvider;
use crate::error_handler::LlmError;
use crate::health_service::{HealthService, HealthStatus};
use crate::services::ollama_service::OllamaService;
use crate::services::open_ai_service::OpenAiService;

/* ------------------------------- client key ------------------------------ */

/// Cache key for a concrete provider client.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct ClientKey {
    provider: LlmProvider,
    endpoint: String,
    model: String,
    api_key: Option<String>,
    timeout_secs: u64,
}

impl From<&LlmModelConfig> for ClientKey {
    fn from(cfg: &LlmModelConfig) -> Self {
        Self {
            provider: cfg.provider,
            endpoint: cfg.endpoint.clone(),
            model: cfg.model.clone(),
            api_key: cfg.api_key.clone(),
            timeout_secs: cfg.timeout_secs.unwrap_or(60),
        }
    }
}

/* -------------------------------- registry -------------------------------- */

/// Model profiles for the three roles the gateway needs.
#[derive(Debug)]
pub struct LlmServiceProfiles {
    generation: LlmModelConfig,
    summarization: LlmModelConfig,
    embedding: LlmModelConfig,

    ollama: RwLock<HashMap<ClientKey, Arc<OllamaService>>>,
    openai: RwLock<HashMap<ClientKey, Arc<OpenAiService>>>,

    health: HealthService,
}

impl LlmServiceProfiles {
    /// Builds the registry. A missing summarization profile falls back to
    /// the generation profile.
    ///
    /// # Errors
    /// Fails when the health probe client cannot be built.
    pub fn new(
        generation: LlmModelConfig,
        summarization: Option<LlmModelConfig>,
        embedding: LlmModelConfig,
        health_timeout_secs: Option<u64>,
    ) -> Result<Self, LlmError> {
        let summarization = summarization.unwrap_or_else(|| generation.clone());
        Ok(Self {
            generation,
            summarization,
            embedding,
            ollama: RwLock::new(HashMap::new()),
            openai: RwLock::new(HashMap::new()),
            health: HealthService::new(health_timeout_secs)?,
        })
    }

    /// Assembles all three profiles from the environment.
    ///
    /// # Errors
    /// Propagates missing or malformed configuration variables.
    pub fn from_env() -> Result<Self, LlmError> {
        Self::new(
            config_generation()?,
            config_summarization()?,
            config_embedding()?,
            Some(10),
        )
    }

    /// Generates text with the generation profile.
    pub async fn generate(
        &self,
        prompt: &str,
        system: Option<&str>,
        params: Option<GenerationParams>,
    ) -> Result<String, LlmError> {
        self.generate_with(&self.generation, prompt, system, params).await
    }

    /// Generates text with the summarization profile.
    pub async fn generate_summary(
        &self,
        prompt: &str,
        system: Option<&str>,
        params: Option<GenerationParams>,
    ) -> Result<String, LlmError> {
        self.generate_with(&self.summarization, prompt, system, params).await
    }

    /// Embeds one text with the embedding profile.
    pub async fn embed(&self, input: &str) -> Result<Vec<f32>, LlmError> {
        match self.embedding.provider {
            LlmProvider::Ollama => {
                self.ollama_client(&self.embedding).await?.embeddings(input).await
            }
            LlmProvider::OpenAI => {
                self.openai_client(&self.embedding).await?.embeddings(input).await
            }
        }
    }

    /// Probes every distinct profile once; profiles sharing a config are
    /// reported once.
    pub async fn health_all(&self) -> Vec<HealthStatus> {
        let mut distinct: Vec<&LlmModelConfig> = vec![&self.generation];
        if self.summarization != self.generation {
            distinct.push(&self.summarization);
        }
        if self.embedding != self.generation && self.embedding != self.summarization {
            distinct.push(&self.embedding);
        }
        self.health.check_many(&distinct).await
    }

    /// Read access to the (generation, summarization, embedding) profiles.
    pub fn profiles(&self) -> (&LlmModelConfig, &LlmModelConfig, &LlmModelConfig) {
        (&self.generation, &self.summarization, &self.embedding)
    }

    async fn generate_with(
        &self,
        cfg: &LlmModelConfig,
        prompt: &str,
        system: Option<&str>,
        params: Option<GenerationParams>,
    ) -> Result<String, LlmError> {
        match cfg.provider {
            LlmProvider::Ollama => {
                // The generate endpoint has no system slot; fold it into the prompt.
                let folded;
                let prompt = match system {
                    Some(sys) => {
                        folded = format!("{sys}\n\n{prompt}");
                        folded.as_str()
                    }
                    None => prompt,
                };
                self.ollama_client(cfg).await?.generate(prompt, params).await
            }
            LlmProvider::OpenAI => {
                self.openai_client(cfg).await?.generate(prompt, system, params).await
            }
        }
    }

    async fn ollama_client(&self, cfg: &LlmModelConfig) -> Result<Arc<OllamaService>, LlmError> {
        let key = ClientKey::from(cfg);
        if let Some(cli) = self.ollama.read().await.get(&key) {
            return Ok(cli.clone());
        }

        let mut cache = self.ollama.write().await;
        // Re-check: another task may have built the client while we waited.
        if let Some(cli) = cache.get(&key) {
            return Ok(cli.clone());
        }
        debug!(endpoint = %cfg.endpoint, model = %cfg.model, "creating ollama client");
        let cli = Arc::new(OllamaService::new(cfg.clone())?);
        cache.insert(key, cli.clone());
        Ok(cli)
    }

    async fn openai_client(&self, cfg: &LlmModelConfig) -> Result<Arc<OpenAiService>, LlmError> {
        let key = ClientKey::from(cfg);
        if let Some(cli) = self.openai.read().await.get(&key) {
            return Ok(cli.clone());
        }

        let mut cache = self.openai.write().await;
        if let Some(cli) = cache.get(&key) {
            return Ok(cli.clone());
        }
        debug!(endpoint = %cfg.endpoint, model = %cfg.model, "creating openai client");
        let cli = Arc::new(OpenAiService::new(cfg.clone())?);
        cache.insert(key, cli.clone());
        Ok(cli)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn ollama_cfg(model: &str) -> LlmModelConfig {
        LlmModelConfig {
            provider: LlmProvider::Ollama,
            model: model.into(),
            endpoint: "http://localhost:11434".into(),
            api_key: None,
            max_tokens: Some(256),
            temperature: Some(0.7),
            top_p: None,
            timeout_secs: Some(60),
        }
    }

    #[test]
    fn missing_summarization_falls_back_to_generation() {
        let svc = LlmServiceProfiles::new(ollama_cfg("gen"), None, ollama_cfg("embed"), Some(1))
            .unwrap();
        let (generation, summarization, _) = svc.profiles();
        assert_eq!(generation, summarization);
    }

    #[tokio::test]
    async fn client_cache_returns_same_instance() {
        let svc = LlmServiceProfiles::new(ollama_cfg("gen"), None, ollama_cfg("embed"), Some(1))
            .unwrap();
        let (generation, _, _) = svc.profiles();
        let cfg = generation.clone();
        let a = svc.ollama_client(&cfg).await.unwrap();
        let b = svc.ollama_client(&cfg).await.unwrap();
        assert!(Arc::ptr_eq(&a, &b));
    }

    #[tokio::test]
    async fn health_all_dedupes_equal_profiles() {
        let svc =
            LlmServiceProfiles::new(ollama_cfg("gen"), None, ollama_cfg("gen"), Some(1)).unwrap();
        // generation == summarization == embedding, so one probe only.
        let statuses = svc.health_all().await;
        assert_eq!(statuses.len(), 1);
    }
}
