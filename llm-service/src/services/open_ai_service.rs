//! Async client for OpenAI-compatible chat-completions backends.
//!
//! Targets `/v1/chat/completions` and `/v1/embeddings`, with the bearer token
//! installed once as a default header.

use std::time::{Duration, Instant};

use reqwest::Client;
use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, HeaderMap, HeaderValue};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::config::llm_model_config::{GenerationParams, LlmModelConfig};
use crate::config::llm_provider::LlmProvider;
use crate::error_handler::{
    LlmError, ProviderError, ProviderErrorKind, make_snippet, validate_http_endpoint,
};

/* --------------------------------- client -------------------------------- */

#[derive(Debug)]
pub struct OpenAiService {
    client: Client,
    cfg: LlmModelConfig,
    url_chat: String,
    url_embeddings: String,
}

impl OpenAiService {
    /// Builds a client for one OpenAI-compatible model.
    ///
    /// # Errors
    /// Fails when the config targets another provider, the API key is absent,
    /// the endpoint is not an absolute http(s) URL, or the HTTP client cannot
    /// be built.
    pub fn new(cfg: LlmModelConfig) -> Result<Self, LlmError> {
        if cfg.provider != LlmProvider::OpenAI {
            return Err(
                ProviderError::new(LlmProvider::OpenAI, ProviderErrorKind::WrongProvider).into(),
            );
        }
        let Some(api_key) = cfg.api_key.clone().filter(|k| !k.trim().is_empty()) else {
            return Err(
                ProviderError::new(LlmProvider::OpenAI, ProviderErrorKind::MissingApiKey).into(),
            );
        };
        validate_http_endpoint(LlmProvider::OpenAI, &cfg.endpoint)?;

        let mut headers = HeaderMap::new();
        let bearer = HeaderValue::from_str(&format!("Bearer {api_key}")).map_err(|e| {
            ProviderError::new(
                LlmProvider::OpenAI,
                ProviderErrorKind::Decode(format!("API key is not a valid header value: {e}")),
            )
        })?;
        headers.insert(AUTHORIZATION, bearer);
        headers.insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));

        let timeout = Duration::from_secs(cfg.timeout_secs.unwrap_or(60));
        let client = Client::builder()
            .timeout(timeout)
            .default_headers(headers)
            .build()?;

        let base = cfg.endpoint.trim_end_matches('/').to_string();
        Ok(Self {
            url_chat: format!("{base}/v1/chat/completions"),
            url_embeddings: format!("{base}/v1/embeddings"),
            client,
            cfg,
        })
    }

    /// Sends one chat turn, optionally preceded by a system message.
    #[instrument(skip_all, fields(model = %self.cfg.model))]
    pub async fn generate(
        &self,
        prompt: &str,
        system: Option<&str>,
        params: Option<GenerationParams>,
    ) -> Result<String, LlmError> {
        let merged = params.unwrap_or_default().merged_with(&self.cfg);
        let mut messages = Vec::with_capacity(2);
        if let Some(sys) = system {
            messages.push(ChatMessage { role: "system", content: sys });
        }
        messages.push(ChatMessage { role: "user", content: prompt });

        let req = ChatCompletionRequest {
            model: &self.cfg.model,
            messages,
            temperature: merged.temperature,
            top_p: merged.top_p,
            max_tokens: merged.max_tokens,
        };

        debug!(url = %self.url_chat, "POST chat completion");
        let started = Instant::now();
        let resp = self.client.post(&self.url_chat).json(&req).send().await?;
        let status = resp.status();
        if !status.is_success() {
            let snippet = make_snippet(&resp.text().await.unwrap_or_default());
            return Err(ProviderError::new(
                LlmProvider::OpenAI,
                ProviderErrorKind::HttpStatus { status, url: self.url_chat.clone(), snippet },
            )
            .into());
        }

        let body: ChatCompletionResponse = resp.json().await.map_err(|e| {
            ProviderError::new(LlmProvider::OpenAI, ProviderErrorKind::Decode(e.to_string()))
        })?;
        debug!(latency_ms = started.elapsed().as_millis() as u64, "chat completion done");

        body.choices
            .into_iter()
            .find_map(|c| c.message.content)
            .ok_or_else(|| {
                ProviderError::new(LlmProvider::OpenAI, ProviderErrorKind::EmptyChoices).into()
            })
    }

    /// Embeds one text via `/v1/embeddings`.
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
                LlmProvider::OpenAI,
                ProviderErrorKind::HttpStatus {
                    status,
                    url: self.url_embeddings.clone(),
                    snippet,
                },
            )
            .into());
        }

        let body: EmbeddingsResponse = resp.json().await.map_err(|e| {
            ProviderError::new(LlmProvider::OpenAI, ProviderErrorKind::Decode(e.to_string()))
        })?;
        body.data.into_iter().next().map(|d| d.embedding).ok_or_else(|| {
            ProviderError::new(
                LlmProvider::OpenAI,
                ProviderErrorKind::Decode("response contained no embedding data".into()),
            )
            .into()
        })
    }
}

/* ------------------------------- wire types ------------------------------ */

#[derive(Debug, Serialize)]
struct ChatMessage<'a> {
    role: &'static str,
    content: &'a str,
}

#[derive(Debug, Serialize)]
struct ChatCompletionRequest<'a> {
    model: &'a str,
    messages: Vec<ChatMessage<'a>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    temperature: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    top_p: Option<f32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_tokens: Option<u32>,
}

#[derive(Debug, Deserialize)]
struct ChatCompletionResponse {
    #[serde(default)]
    choices: Vec<ChatChoice>,
}

#[derive(Debug, Deserialize)]
struct ChatChoice {
    message: ChatChoiceMessage,
}

#[derive(Debug, Deserialize)]
struct ChatChoiceMessage {
    content: Option<String>,
}

#[derive(Debug, Serialize)]
struct EmbeddingsRequest<'a> {
    model: &'a str,
    input: &'a str,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsResponse {
    #[serde(default)]
    data: Vec<EmbeddingsDatum>,
}

#[derive(Debug, Deserialize)]
struct EmbeddingsDatum {
    embedding: Vec<f32>,
}
