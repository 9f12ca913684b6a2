use serde::Deserialize;

/// Request body for text summarization.
#[derive(Debug, Deserialize)]
pub struct SummarizeRequest {
    /// Shared secret protecting the endpoint from unauthorized calls.
    pub service_token: String,
    /// Input text to summarize.
    pub text: String,
}
