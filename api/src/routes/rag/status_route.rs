use std::sync::Arc;

use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::{core::app_state::AppState, error_handler::AppResult};

/// Collection status: name, backing index URL and a best-effort item count
/// (`null` when the backend cannot tell).
pub async fn status_route(State(state): State<Arc<AppState>>) -> AppResult<Json<Value>> {
    let count = state.store.count().await;

    Ok(Json(json!({
        "collection_name": state.config.collection,
        "persist_directory": state.config.qdrant_url,
        "count": count,
    })))
}
