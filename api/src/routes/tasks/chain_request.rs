use serde::Deserialize;

/// Request body for the generate-then-QA chain.
#[derive(Debug, Deserialize)]
pub struct ChainRequest {
    /// Shared secret protecting the endpoint from unauthorized calls.
    pub service_token: String,
    /// The query driving both steps of the chain.
    pub query: String,
}
