//! Minimal async client for the Ollama HTTP API.
//!
//! Speaks `/api/generate` for text and `/api/embeddings` for vectors, always
//! with `stream: false` so a single JSON body comes back.

use std::time::Duration;

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::llm_model_config::{GenerationParams, LlmModelConfig};
use crate::config::llm_provider::LlmProvider;
use crate::error_handler::{
    LlmError, ProviderError, ProviderErrorKind, make_snippet, validate_http_endpoint,
};

/* --------------------------------- client -------------------------------- */

#[derive(Debug)]
pub struct OllamaService {
    client: Client,
    cfg: LlmModelConfig,
    url_generate: String,
    url_embeddings: String,
}

impl OllamaService {
    /// Builds a client for one Ollama model.
    ///
    /// # Errors
    /// Fails when the config targets another provider, the endpoint is not an
    /// absolute http(s) URL, or the HTTP client cannot be built.
    pub fn new(cfg: LlmModelConfig) -> Result<Self, LlmError> {
        if cfg.provider != LlmProvider::Ollama {
            return Err(
                ProviderError::new(LlmProvider::Ollama, ProviderErrorKind::WrongProvider).into(),
            );
        }
        validate_http_endpoint(LlmProvider::Ollama, &cfg.endpoint)?;

        let timeout = Duration::from_secs(cfg.timeout_secs.unwrap_or(60));
        let client = Client::builder()
            .timeout(timeout)
            .gzip(true)
            .brotli(true)
            .deflate(true)
            .build()?;

        let base = cfg.endpoint.trim_end_matches('/').to_string();
        Ok(Self {
            url_generate: format!("{base}/api/generate"),
            url_embeddings: format!("{base}/api/embeddings"),
            client,
            cfg,
        })
    }

    /// Sends one prompt and returns the full completion.
    #[instrument(skip_all, fields(model = %self.cfg.model))]
    pub async fn generate(
        &self,
        prompt: &str,
        params: Option<GenerationParams>,
    ) -> Result<String, LlmError> {
        let req = GenerateRequest::from_cfg(&self.cfg, prompt, params);
        debug!(url = %self.url_generate, "POST generate");

        let resp = self.client.post(&self.url_generate).json(&req).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let snippet = make_snippet(&resp.text().await.unwrap_or_default());
            return Err(ProviderError::new(
                LlmProvider::Ollama,
                ProviderErrorKind::HttpStatus {
                    status,
                    url: self.url_generate.clone(),
                    snippet,
                },
            )
            .into());
        }

        let body: GenerateResponse = resp.json().await.map_err(|e| {
            ProviderError::new(
                LlmProvider::Ollama,
                ProviderErrorKind::Decode(format!("{e}; ensure `stream=false` is requested")),
            )
        })?;
        Ok(body.response)
    }

    /// Embeds one text and returns the raw vector.
    #[instrument(skip_all, fields(model = %self.cfg.model))]
    pub async fn embeddings(&self, input: &str) -> Result<Vec<f32>, LlmError> {
        let req = EmbeddingsRequest { model: &self.cfg.model, input };
        debug!(url = %self.url_embeddings, "POST embeddings");

        let resp = self
            .client
            .post(&self.url_embeddings)
            .json(&req)
            .send()
            .await?;
        let status = resp.status();
        if !status.is_success() {
            let snippet = make_snippet(&resp.text().await.unwrap_or_default());
            return Err(ProviderError::new(
                LlmProvider::Ollama,
                ProviderErrorKind::HttpStatus {
                    status,
                    url: self.url_embeddings.clone(),
                    snippet,
                },
            )
            .into());
        }

        let body: EmbeddingsResponse = resp.json().await.map_err(|e| {
            ProviderError::new(LlmProvider::Ollama, ProviderErrorKind::Decode(e.to_string()))
        })?;
        Ok(body.embedding)
    }
}

/* ------------------------------- wire types ------------------------------ */

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    prompt: &'a str,
    stream: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    options: Option<GenerateOptions>,
}

#[derive(Debug, Serialize)]
struct GenerateOptions {
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    num_predict: Option<u32>,
}

impl<'a> GenerateRequest<'a> {
    fn from_cfg(cfg: &'a LlmModelConfig, prompt: &'a str, params: Option<GenerationParams>) -> Self {
        let merged = params.unwrap_or_default().merged_with(cfg);
        let options = if merged == GenerationParams::default() {
            None
        } else {
            Some(GenerateOptions {
                temperature: merged.temperature,
                top_p: merged.top_p,
                num_predict: merged.max_tokens,
            })
        };
        Self { model: &cfg.model, prompt, stream: false, options }
    }
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    response: String,
}

#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    embedding: Vec<f32>,
}
