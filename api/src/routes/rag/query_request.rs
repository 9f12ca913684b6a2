use serde::Deserialize;

/// Request body shared by `/query` and `/retrieve`.
#[derive(Debug, Deserialize)]
pub struct QueryRequest {
    /// Shared secret protecting the endpoint from unauthorized calls.
    pub service_token: String,
    pub query: String,
    /// How many results to return; server default when omitted.
    pub k: Option<usize>,
}
