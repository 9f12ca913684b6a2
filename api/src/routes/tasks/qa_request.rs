use serde::Deserialize;

/// Request body for question answering over caller-supplied context.
#[derive(Debug, Deserialize)]
pub struct QaRequest {
    /// Shared secret protecting the endpoint from unauthorized calls.
    pub service_token: String,
    /// The context to answer from.
    pub context: String,
    /// The question to answer.
    pub question: String,
}
