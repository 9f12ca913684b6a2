//! Shared LLM access layer for the gateway.
//!
//! Wraps Ollama and OpenAI-compatible backends behind role profiles
//! (generation, summarization, embeddings) with unified errors and
//! best-effort health probes. One [`LlmServiceProfiles`] is built at
//! startup and shared across the application.

pub mod config;
pub mod error_handler;
pub mod health_service;
pub mod service_profiles;
pub mod services;

pub use config::default_config::{config_embedding, config_generation, config_summarization};
pub use config::llm_model_config::{GenerationParams, LlmModelConfig};
pub use config::llm_provider::LlmProvider;
pub use error_handler::{ConfigError, LlmError, ProviderError, ProviderErrorKind};
pub use health_service::{HealthService, HealthStatus};
pub use service_profiles::LlmServiceProfiles;
