use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde_json::{Value, json};

use crate::{
    core::{app_state::AppState, auth::require_service_token},
    error_handler::AppResult,
    routes::tasks::generate_request::GenerateRequest,
};

/// Generates text from a prompt, without retrieval.
pub async fn generate_route(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<GenerateRequest>, JsonRejection>,
) -> AppResult<Json<Value>> {
    let Json(p) = payload?;
    require_service_token(&state.config.service_token, &p.service_token)?;

    let output = state.answerer.generate_text(&p.prompt).await?;
    Ok(Json(json!({ "response": output })))
}
