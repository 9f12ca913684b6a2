use serde::Deserialize;

/// Request body for wiping the collection.
#[derive(Debug, Deserialize)]
pub struct DeleteAllRequest {
    /// Shared secret protecting the endpoint from unauthorized calls.
    pub service_token: String,
}
