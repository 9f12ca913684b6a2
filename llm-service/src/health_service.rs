//! Best-effort reachability probes for configured model backends.
//!
//! [`HealthService::check`] never fails: every outcome, including invalid
//! configuration, is folded into a [`HealthStatus`] so a health endpoint can
//! always render a full report.

use std::time::{Duration, Instant};

use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::config::llm_model_config::LlmModelConfig;
use crate::config::llm_provider::LlmProvider;
use crate::error_handler::{
    LlmError, ProviderError, ProviderErrorKind, make_snippet, validate_http_endpoint,
};

/* --------------------------------- status -------------------------------- */

/// Outcome of probing one model profile.
#[derive(Debug, Clone, Serialize)]
pub struct HealthStatus {
    pub provider: String,
    pub endpoint: String,
    pub model: Option<String>,
    pub ok: bool,
    pub latency_ms: u128,
    pub message: String,
}

impl HealthStatus {
    #[inline]
    fn passed(provider: String, endpoint: String, model: Option<String>, latency_ms: u128, message: String) -> Self {
        Self { provider, endpoint, model, ok: true, latency_ms, message }
    }

    #[inline]
    fn failed(provider: String, endpoint: String, model: Option<String>, latency_ms: u128, message: String) -> Self {
        Self { provider, endpoint, model, ok: false, latency_ms, message }
    }
}

/* -------------------------------- service -------------------------------- */

#[derive(Debug, Clone)]
pub struct HealthService {
    client: Client,
}

impl HealthService {
    /// # Errors
    /// Fails only when the probe HTTP client cannot be built.
    pub fn new(timeout_secs: Option<u64>) -> Result<Self, LlmError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(timeout_secs.unwrap_or(10)))
            .build()?;
        Ok(Self { client })
    }

    /// Probes one profile. Failures become `ok: false` statuses.
    pub async fn check(&self, cfg: &LlmModelConfig) -> HealthStatus {
        let provider = cfg.provider.to_string();
        let endpoint = cfg.endpoint.trim_end_matches('/').to_string();
        let model = Some(cfg.model.clone());

        if let Err(e) = validate_http_endpoint(cfg.provider, &cfg.endpoint) {
            return HealthStatus::failed(provider, endpoint, model, 0, e.to_string());
        }

        let started = Instant::now();
        let outcome = match cfg.provider {
            LlmProvider::Ollama => self.probe_ollama(&endpoint, &cfg.model).await,
            LlmProvider::OpenAI => {
                self.probe_openai(&endpoint, cfg.api_key.as_deref(), &cfg.model).await
            }
        };
        let latency = started.elapsed().as_millis();

        match outcome {
            Ok(message) => {
                info!(provider = %provider, endpoint = %endpoint, latency_ms = latency as u64, "health probe ok");
                HealthStatus::passed(provider, endpoint, model, latency, message)
            }
            Err(e) => {
                warn!(provider = %provider, endpoint = %endpoint, error = %e, "health probe failed");
                HealthStatus::failed(provider, endpoint, model, latency, e.to_string())
            }
        }
    }

    /// Probes each profile in turn. Sequential on purpose so the result order
    /// matches the input order.
    pub async fn check_many(&self, cfgs: &[&LlmModelConfig]) -> Vec<HealthStatus> {
        let mut out = Vec::with_capacity(cfgs.len());
        for cfg in cfgs {
            out.push(self.check(cfg).await);
        }
        out
    }

    /// GET `/api/tags`, then best-effort confirms the model is pulled.
    /// A daemon that answers but sends an unexpected body still counts as
    /// healthy.
    async fn probe_ollama(&self, base: &str, model: &str) -> Result<String, LlmError> {
        let url = format!("{base}/api/tags");
        let resp = self.client.get(&url).send().await?;
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(ProviderError::new(
                LlmProvider::Ollama,
                ProviderErrorKind::HttpStatus { status, url, snippet: make_snippet(&text) },
            )
            .into());
        }

        match serde_json::from_str::<TagsResponse>(&text) {
            Ok(tags) => {
                let prefix = format!("{model}:");
                let pulled = tags
                    .models
                    .iter()
                    .any(|m| m.name == model || m.name.starts_with(&prefix));
                if pulled {
                    Ok(format!("model `{model}` is available"))
                } else {
                    Ok(format!("daemon reachable, model `{model}` not in tag list"))
                }
            }
            Err(_) => Ok("daemon reachable".to_string()),
        }
    }

    /// GET `/v1/models` with bearer auth; decoding is best-effort as above.
    async fn probe_openai(
        &self,
        base: &str,
        api_key: Option<&str>,
        model: &str,
    ) -> Result<String, LlmError> {
        let key = api_key.unwrap_or_default();
        if key.trim().is_empty() {
            return Err(
                ProviderError::new(LlmProvider::OpenAI, ProviderErrorKind::MissingApiKey).into()
            );
        }

        let url = format!("{base}/v1/models");
        let resp = self.client.get(&url).bearer_auth(key).send().await?;
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        if !status.is_success() {
            return Err(ProviderError::new(
                LlmProvider::OpenAI,
                ProviderErrorKind::HttpStatus { status, url, snippet: make_snippet(&text) },
            )
            .into());
        }

        match serde_json::from_str::<ModelsResponse>(&text) {
            Ok(models) => {
                if models.data.iter().any(|m| m.id == model) {
                    Ok(format!("model `{model}` is listed"))
                } else {
                    Ok(format!("endpoint reachable, model `{model}` not listed"))
                }
            }
            Err(_) => Ok("endpoint reachable".to_string()),
        }
    }
}

/* ------------------------------- wire types ------------------------------ */

#[derive(Debug, Deserialize)]
struct TagsResponse {
    #[serde(default)]
    models: Vec<TagModel>,
}

#[derive(Debug, Deserialize)]
struct TagModel {
    name: String,
}

#[derive(Debug, Deserialize)]
struct ModelsResponse {
    #[serde(default)]
    data: Vec<ModelEntry>,
}

#[derive(Debug, Deserialize)]
struct ModelEntry {
    id: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn invalid_endpoint_reports_failure_without_io() {
        let svc = HealthService::new(Some(1)).unwrap();
        let cfg = LlmModelConfig {
            provider: LlmProvider::Ollama,
            model: "m".into(),
            endpoint: "not-a-url".into(),
            api_key: None,
            max_tokens: None,
            temperature: None,
            top_p: None,
            timeout_secs: None,
        };
        let status = svc.check(&cfg).await;
        assert!(!status.ok);
        assert_eq!(status.latency_ms, 0);
        assert!(status.message.contains("invalid endpoint"));
    }

    #[test]
    fn tag_list_decodes_with_missing_fields() {
        let tags: TagsResponse = serde_json::from_str("{}").unwrap();
        assert!(tags.models.is_empty());
    }
}
