//! Error types and configuration helpers shared across the crate.
//!
//! Every message carries the `[LLM Service]` prefix so provider failures are
//! easy to attribute when several services log into the same stream.

use reqwest::StatusCode;
use thiserror::Error;

use crate::config::llm_provider::LlmProvider;

/* ---------------------------- top-level error ---------------------------- */

/// Unified error surface of the LLM service.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum LlmError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Provider(#[from] ProviderError),

    #[error("[LLM Service] HTTP transport error: {0}")]
    HttpTransport(#[from] reqwest::Error),
}

/* ----------------------------- configuration ----------------------------- */

/// Raised while assembling model profiles from the environment.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("[LLM Service] Missing required environment variable: {0}")]
    MissingVar(&'static str),

    #[error("[LLM Service] Invalid numeric value in {var}: {reason}")]
    InvalidNumber { var: &'static str, reason: String },

    #[error("[LLM Service] Unsupported provider: {0}")]
    UnsupportedProvider(String),

    #[error("[LLM Service] Value out of range for {field}: {detail}")]
    OutOfRange { field: &'static str, detail: String },
}

/* ------------------------------- providers ------------------------------- */

/// Failure raised by a concrete provider client.
#[derive(Debug, Error)]
#[error("[LLM Service] {provider}: {kind}")]
pub struct ProviderError {
    pub provider: LlmProvider,
    pub kind: ProviderErrorKind,
}

impl ProviderError {
    pub fn new(provider: LlmProvider, kind: ProviderErrorKind) -> Self {
        Self { provider, kind }
    }
}

#[derive(Debug, Error)]
pub enum ProviderErrorKind {
    #[error("config targets a different provider")]
    WrongProvider,

    #[error("API key is required but missing")]
    MissingApiKey,

    #[error("invalid endpoint `{0}`; expected an absolute http(s) URL")]
    InvalidEndpoint(String),

    #[error("HTTP {status} from {url}: {snippet}")]
    HttpStatus {
        status: StatusCode,
        url: String,
        snippet: String,
    },

    #[error("decode error: {0}")]
    Decode(String),

    #[error("response contained no choices")]
    EmptyChoices,
}

/* ------------------------------ env helpers ------------------------------ */

/// Required variable; empty or whitespace-only counts as missing.
pub(crate) fn must_env(name: &'static str) -> Result<String, ConfigError> {
    env_opt(name).ok_or(ConfigError::MissingVar(name))
}

/// Optional variable, trimmed; `None` when unset or blank.
pub(crate) fn env_opt(name: &'static str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

pub(crate) fn env_opt_u32(name: &'static str) -> Result<Option<u32>, ConfigError> {
    match env_opt(name) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<u32>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidNumber { var: name, reason: e.to_string() }),
    }
}

pub(crate) fn env_opt_u64(name: &'static str) -> Result<Option<u64>, ConfigError> {
    match env_opt(name) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<u64>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidNumber { var: name, reason: e.to_string() }),
    }
}

pub(crate) fn env_opt_f32(name: &'static str) -> Result<Option<f32>, ConfigError> {
    match env_opt(name) {
        None => Ok(None),
        Some(raw) => raw
            .parse::<f32>()
            .map(Some)
            .map_err(|e| ConfigError::InvalidNumber { var: name, reason: e.to_string() }),
    }
}

/* ------------------------------- validation ------------------------------ */

/// Endpoints must be absolute http(s) URLs; anything else is rejected before
/// a client is built.
pub(crate) fn validate_http_endpoint(
    provider: LlmProvider,
    endpoint: &str,
) -> Result<(), ProviderError> {
    let trimmed = endpoint.trim();
    if trimmed.is_empty() || !(trimmed.starts_with("http://") || trimmed.starts_with("https://")) {
        return Err(ProviderError::new(
            provider,
            ProviderErrorKind::InvalidEndpoint(endpoint.to_string()),
        ));
    }
    Ok(())
}

pub(crate) fn validate_range_f32(
    field: &'static str,
    value: Option<f32>,
    lo: f32,
    hi: f32,
) -> Result<(), ConfigError> {
    if let Some(v) = value {
        if !v.is_finite() || !(lo..=hi).contains(&v) {
            return Err(ConfigError::OutOfRange {
                field,
                detail: format!("{v} not in [{lo}, {hi}]"),
            });
        }
    }
    Ok(())
}

/// Truncates an upstream response body so error messages stay log-sized.
pub(crate) fn make_snippet(text: &str) -> String {
    text.chars().take(240).collect()
}
