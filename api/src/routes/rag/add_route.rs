use std::path::PathBuf;
use std::sync::Arc;

use axum::{
    Json,
    extract::{State, rejection::JsonRejection},
};
use serde_json::{Value, json};
use tracing::{info, instrument};

use crate::{
    core::{app_state::AppState, auth::require_service_token},
    error_handler::AppResult,
    routes::rag::add_request::AddRequest,
};

/// HTTP endpoint that runs the full ingestion pipeline over a folder of
/// PDFs: load, split, embed, index.
#[instrument(name = "add_route", skip_all)]
pub async fn add_route(
    State(state): State<Arc<AppState>>,
    payload: Result<Json<AddRequest>, JsonRejection>,
) -> AppResult<Json<Value>> {
    let Json(p) = payload?;
    require_service_token(&state.config.service_token, &p.service_token)?;

    let folder = p
        .source_folder
        .map(PathBuf::from)
        .unwrap_or_else(|| state.config.source_folder.clone());

    let report = state.store.ingest_folder(&folder).await?;
    info!(
        pages = report.pages_loaded,
        chunks = report.chunks_created,
        items = report.items_added,
        "ingestion finished"
    );

    Ok(Json(json!({
        "status": "ok",
        "source_folder": folder.display().to_string(),
        "pages_loaded": report.pages_loaded,
        "chunks_created": report.chunks_created,
        "items_added": report.items_added,
    })))
}
