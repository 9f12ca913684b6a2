//! HTTP gateway: application state, routes and server lifecycle.

mod core;
mod error_handler;
mod routes;

pub use error_handler::{AppError, AppResult};

use std::sync::Arc;

use axum::{
    Router,
    extract::DefaultBodyLimit,
    routing::{delete, get, post},
};
use tokio::signal;
use tracing::info;

use crate::core::app_state::AppState;
use crate::routes::{
    health::health_route::health_route,
    rag::{
        add_route::add_route, ask_from_document_route::ask_from_document_route,
        ask_route::ask_route, delete_all_route::delete_all_route, query_route::query_route,
        retrieve_route::retrieve_route, status_route::status_route,
    },
    tasks::{
        chain_route::chain_route, generate_route::generate_route, qa_route::qa_route,
        summarize_route::summarize_route,
    },
};

/// Uploads are capped well above typical PDF sizes.
const MAX_UPLOAD_BYTES: usize = 32 * 1024 * 1024;

pub async fn start() -> AppResult<()> {
    // Every model client and the index handle exist before the first route
    // is registered.
    let state = Arc::new(AppState::from_env()?);
    let addr = state.config.api_address.clone();

    let app = Router::new()
        .route("/add", post(add_route))
        .route("/query", post(query_route))
        .route("/retrieve", post(retrieve_route))
        .route("/ask", post(ask_route))
        .route("/ask-from-document", post(ask_from_document_route))
        .route("/delete_all", delete(delete_all_route))
        .route("/status", get(status_route))
        .route("/generate", post(generate_route))
        .route("/summarize", post(summarize_route))
        .route("/qa", post(qa_route))
        .route("/chain", post(chain_route))
        .route("/health", get(health_route))
        .layer(DefaultBodyLimit::max(MAX_UPLOAD_BYTES))
        .with_state(state);

    // Bind to address
    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .map_err(AppError::Bind)?;
    info!(%addr, "gateway listening");

    // Start server with graceful shutdown on Ctrl+C
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(AppError::Server)?;

    Ok(())
}

/// Returns a future that resolves when Ctrl+C is pressed
async fn shutdown_signal() {
    // Wait for the Ctrl+C signal
    signal::ctrl_c()
        .await
        .expect("Failed to listen for shutdown signal");
}
