use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use rag_store::RagError;
use serde_json::{Value, json};
use tracing::debug;

use crate::{
    core::{app_state::AppState, auth::require_service_token},
    error_handler::{AppError, AppResult},
    routes::rag::query_request::QueryRequest,
};

/// Embeds the query text and searches the collection, returning documents,
/// metadata and distances.
pub async fn query_route(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<QueryRequest>, JsonRejection>,
) -> AppResult<Json<Value>> {
    let Json(p) = payload?;
    require_service_token(&state.config.service_token, &p.service_token)?;

    if p.query.trim().is_empty() {
        return Err(AppError::BadRequest("Query text required".into()));
    }

    let k = p.k.unwrap_or(state.config.top_k);
    let retrieval = state.store.retrieve(&p.query, k).await.map_err(|e| match e {
        RagError::Embedding(err) => AppError::Upstream(format!("Failed to embed query: {err}")),
        other => AppError::from(other),
    })?;
    debug!(k, hits = retrieval.results.len(), "query complete");

    let results: Vec<Value> = retrieval
        .results
        .iter()
        .map(|r| {
            json!({
                "document": r.text,
                "metadata": r.metadata,
                "distance": r.distance,
            })
        })
        .collect();

    Ok(Json(json!({
        "query": retrieval.query,
        "k": retrieval.k,
        "results": results,
    })))
}
