use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde_json::{Value, json};
use tracing::debug;

use crate::{
    core::{app_state::AppState, auth::require_service_token},
    error_handler::AppResult,
    routes::tasks::chain_request::ChainRequest,
};

/// Two-step chain: generate free text for the query, then answer the same
/// query with that text as QA context. Only the final answer is returned.
pub async fn chain_route(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<ChainRequest>, JsonRejection>,
) -> AppResult<Json<Value>> {
    let Json(p) = payload?;
    require_service_token(&state.config.service_token, &p.service_token)?;

    debug!("chain: start");
    let output = state.answerer.chain(&p.query).await?;
    Ok(Json(json!({ "output": output })))
}
