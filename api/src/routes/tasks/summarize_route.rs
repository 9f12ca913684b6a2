use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde_json::{Value, json};

use crate::{
    core::{app_state::AppState, auth::require_service_token},
    error_handler::AppResult,
    routes::tasks::summarize_request::SummarizeRequest,
};

/// Summarizes the provided text into one short paragraph, using the
/// summarization model profile.
pub async fn summarize_route(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<SummarizeRequest>, JsonRejection>,
) -> AppResult<Json<Value>> {
    let Json(p) = payload?;
    require_service_token(&state.config.service_token, &p.service_token)?;

    let summary = state.answerer.summarize(&p.text).await?;
    Ok(Json(json!({ "summary": summary })))
}
