use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use generation::{AskOptions, GenerationResult};
use tracing::{debug, info, instrument};

use crate::{
    core::{app_state::AppState, auth::require_service_token},
    error_handler::AppResult,
    routes::rag::ask_request::AskRequest,
};

/// HTTP endpoint for grounded question answering.
///
/// Retrieves top-K chunks from the persistent collection, builds a cited
/// prompt and returns the generated answer together with the contexts used.
#[instrument(name = "ask_route", skip_all)]
pub async fn ask_route(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AskRequest>, JsonRejection>,
) -> AppResult<Json<GenerationResult>> {
    let Json(p) = payload?;
    require_service_token(&state.config.service_token, &p.service_token)?;

    debug!(k = ?p.k, "ask: start");
    let result = state
        .answerer
        .answer(
            &state.store,
            &p.prompt,
            AskOptions {
                k: p.k,
                max_new_tokens: p.max_new_tokens,
                temperature: p.temperature,
            },
        )
        .await?;

    info!(
        contexts = result.used_contexts.len(),
        answer_chars = result.answer.len(),
        "ask: answered"
    );
    Ok(Json(result))
}
