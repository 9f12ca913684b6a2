use serde::Deserialize;

/// Request body for triggering folder ingestion.
#[derive(Debug, Deserialize)]
pub struct AddRequest {
    /// Shared secret protecting the endpoint from unauthorized calls.
    pub service_token: String,
    /// Optional override of the server-side configured source folder.
    pub source_folder: Option<String>,
}
