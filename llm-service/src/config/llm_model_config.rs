//! Per-model connection and sampling settings.

use crate::config::llm_provider::LlmProvider;

/// Connection and sampling settings for one model behind one provider.
///
/// A deployment usually carries several of these (generation, summarization,
/// embeddings) that may point at the same daemon with different models.
///
/// # Fields
/// - `provider`: backend protocol to speak.
/// - `model`: model identifier as the backend knows it.
/// - `endpoint`: base URL of the backend, scheme included.
/// - `api_key`: bearer token, required for OpenAI-compatible backends.
/// - `max_tokens`: generation cap; `None` lets the backend decide.
/// - `temperature` / `top_p`: sampling knobs; `None` uses backend defaults.
/// - `timeout_secs`: per-request HTTP timeout; `None` means 60 seconds.
#[derive(Debug, Clone, PartialEq)]
pub struct LlmModelConfig {
    pub provider: LlmProvider,
    pub model: String,
    pub endpoint: String,
    pub api_key: Option<String>,
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
    pub timeout_secs: Option<u64>,
}

/// Per-call overrides merged over a profile's defaults.
///
/// `None` fields fall back to the corresponding [`LlmModelConfig`] value.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct GenerationParams {
    pub max_tokens: Option<u32>,
    pub temperature: Option<f32>,
    pub top_p: Option<f32>,
}

impl GenerationParams {
    /// Resolves the effective sampling settings against profile defaults.
    pub fn merged_with(self, cfg: &LlmModelConfig) -> Self {
        Self {
            max_tokens: self.max_tokens.or(cfg.max_tokens),
            temperature: self.temperature.or(cfg.temperature),
            top_p: self.top_p.or(cfg.top_p),
        }
    }
}
