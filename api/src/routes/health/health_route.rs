use std::sync::Arc;

use axum::{Json, extract::State};
use serde_json::{Value, json};

use crate::{core::app_state::AppState, error_handler::AppResult};

/// Probes every configured LLM profile and reports reachability.
///
/// Answers 200 even when providers are down; `status` flips to "degraded"
/// and the per-provider rows carry the failure detail.
pub async fn health_route(State(state): State<Arc<AppState>>) -> AppResult<Json<Value>> {
    let providers = state.svc.health_all().await;
    let status = if providers.iter().all(|p| p.ok) {
        "ok"
    } else {
        "degraded"
    };

    Ok(Json(json!({
        "status": status,
        "providers": providers,
    })))
}
