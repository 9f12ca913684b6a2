use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use rag_store::Retrieval;

use crate::{
    core::{app_state::AppState, auth::require_service_token},
    error_handler::AppResult,
    routes::rag::query_request::QueryRequest,
};

/// Same search as `/query`, but answers with the retriever contract:
/// `{ query, k, results: [{ text, metadata, distance }] }`.
pub async fn retrieve_route(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> AppResult<Json<Retrieval>> {
    let Json(p) = payload?;
    require_service_token(&state.config.service_token, &p.service_token)?;

    let k = p.k.unwrap_or(state.config.top_k);
    let retrieval = state.store.retrieve(&p.query, k).await?;
    Ok(Json(retrieval))
}
