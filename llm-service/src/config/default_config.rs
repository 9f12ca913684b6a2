//! Environment-driven model profiles.
//!
//! All three role profiles share the provider selection and endpoint
//! variables; only the model name differs per role.
//!
//! | Variable | Meaning | Default |
//! |----------|---------|---------|
//! | `LLM_PROVIDER` | `ollama` or `openai` | `ollama` |
//! | `OLLAMA_URL` | Full base URL of the Ollama daemon | unset |
//! | `OLLAMA_PORT` | Shortcut, expands to `http://localhost:{port}` | `11434` |
//! | `OPENAI_URL` | Base URL for OpenAI-compatible backends | `https://api.openai.com` |
//! | `OPENAI_API_KEY` | Bearer token, required when provider is `openai` | unset |
//! | `GENERATION_MODEL` | Model used to generate answers | required |
//! | `SUMMARIZATION_MODEL` | Model used for summaries | falls back to generation |
//! | `EMBEDDING_MODEL` | Model used for embeddings | required |
//! | `LLM_MAX_NEW_TOKENS` | Cap on newly generated tokens | `256` |
//! | `LLM_TEMPERATURE` | Sampling temperature | `0.7` |
//! | `LLM_TOP_P` | Nucleus sampling | unset |
//! | `LLM_TIMEOUT_SECS` | HTTP timeout per request | `60` (`30` for embeddings) |

use crate::config::llm_model_config::LlmModelConfig;
use crate::config::llm_provider::LlmProvider;
use crate::error_handler::{
    ConfigError, env_opt, env_opt_f32, env_opt_u32, env_opt_u64, must_env, validate_range_f32,
};

fn provider_from_env() -> Result<LlmProvider, ConfigError> {
    match env_opt("LLM_PROVIDER") {
        None => Ok(LlmProvider::Ollama),
        Some(raw) => LlmProvider::parse(&raw).ok_or(ConfigError::UnsupportedProvider(raw)),
    }
}

fn endpoint_from_env(provider: LlmProvider) -> Result<String, ConfigError> {
    match provider {
        LlmProvider::Ollama => {
            if let Some(url) = env_opt("OLLAMA_URL") {
                return Ok(url);
            }
            let port = match env_opt("OLLAMA_PORT") {
                None => 11434u16,
                Some(raw) => raw.parse::<u16>().map_err(|e| ConfigError::InvalidNumber {
                    var: "OLLAMA_PORT",
                    reason: e.to_string(),
                })?,
            };
            Ok(format!("http://localhost:{port}"))
        }
        LlmProvider::OpenAI => {
            Ok(env_opt("OPENAI_URL").unwrap_or_else(|| "https://api.openai.com".to_string()))
        }
    }
}

fn api_key_from_env(provider: LlmProvider) -> Result<Option<String>, ConfigError> {
    match provider {
        LlmProvider::Ollama => Ok(None),
        LlmProvider::OpenAI => must_env("OPENAI_API_KEY").map(Some),
    }
}

/// Shared skeleton; role constructors plug in the model and role defaults.
fn profile(
    model: String,
    default_temperature: f32,
    default_timeout: u64,
) -> Result<LlmModelConfig, ConfigError> {
    let provider = provider_from_env()?;
    let temperature = env_opt_f32("LLM_TEMPERATURE")?.or(Some(default_temperature));
    let top_p = env_opt_f32("LLM_TOP_P")?;
    validate_range_f32("LLM_TEMPERATURE", temperature, 0.0, 2.0)?;
    validate_range_f32("LLM_TOP_P", top_p, 0.0, 1.0)?;

    Ok(LlmModelConfig {
        endpoint: endpoint_from_env(provider)?,
        api_key: api_key_from_env(provider)?,
        provider,
        model,
        max_tokens: env_opt_u32("LLM_MAX_NEW_TOKENS")?.or(Some(256)),
        temperature,
        top_p,
        timeout_secs: env_opt_u64("LLM_TIMEOUT_SECS")?.or(Some(default_timeout)),
    })
}

/// Profile used to generate answers.
///
/// # Errors
/// Fails when `GENERATION_MODEL` is unset or a numeric variable is malformed.
pub fn config_generation() -> Result<LlmModelConfig, ConfigError> {
    profile(must_env("GENERATION_MODEL")?, 0.7, 60)
}

/// Optional summarization profile; `None` when `SUMMARIZATION_MODEL` is unset.
pub fn config_summarization() -> Result<Option<LlmModelConfig>, ConfigError> {
    match env_opt("SUMMARIZATION_MODEL") {
        None => Ok(None),
        Some(model) => profile(model, 0.3, 60).map(Some),
    }
}

/// Embedding profile. Sampling knobs are pinned since they have no meaning
/// for embedding requests.
///
/// # Errors
/// Fails when `EMBEDDING_MODEL` is unset or a numeric variable is malformed.
pub fn config_embedding() -> Result<LlmModelConfig, ConfigError> {
    let mut cfg = profile(must_env("EMBEDDING_MODEL")?, 0.0, 30)?;
    cfg.max_tokens = None;
    cfg.temperature = Some(0.0);
    cfg.top_p = None;
    Ok(cfg)
}
