use serde::Deserialize;

/// Request body for free-form text generation.
#[derive(Debug, Deserialize)]
pub struct GenerateRequest {
    /// Shared secret protecting the endpoint from unauthorized calls.
    pub service_token: String,
    /// Input prompt for text generation.
    pub prompt: String,
}
