use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde_json::{Value, json};

use crate::{
    core::{app_state::AppState, auth::require_service_token},
    error_handler::AppResult,
    routes::tasks::qa_request::QaRequest,
};

/// Answers a question using only the context supplied in the request body.
pub async fn qa_route(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<QaRequest>, JsonRejection>,
) -> AppResult<Json<Value>> {
    let Json(p) = payload?;
    require_service_token(&state.config.service_token, &p.service_token)?;

    let answer = state.answerer.answer_question(&p.question, &p.context).await?;
    Ok(Json(json!({ "answer": answer })))
}
