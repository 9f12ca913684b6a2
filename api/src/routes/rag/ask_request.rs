use serde::Deserialize;

/// Request body for the RAG answer endpoint.
#[derive(Debug, Deserialize)]
pub struct AskRequest {
    /// Shared secret protecting the endpoint from unauthorized calls.
    pub service_token: String,
    /// The user question.
    pub prompt: String,
    /// Retrieval depth override.
    pub k: Option<usize>,
    /// Generation token cap override.
    pub max_new_tokens: Option<u32>,
    /// Sampling temperature override.
    pub temperature: Option<f32>,
}
