use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde_json::{Value, json};
use tracing::info;

use crate::{
    core::{app_state::AppState, auth::require_service_token},
    error_handler::AppResult,
    routes::rag::delete_all_request::DeleteAllRequest,
};

/// Empties the vector collection.
pub async fn delete_all_route(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<DeleteAllRequest>, JsonRejection>,
) -> AppResult<Json<Value>> {
    let Json(p) = payload?;
    require_service_token(&state.config.service_token, &p.service_token)?;

    state.store.delete_all().await?;
    info!("collection emptied");

    Ok(Json(json!({ "status": "deleted" })))
}
