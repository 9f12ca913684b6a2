use std::sync::Arc;

use axum::{Json, extract::Multipart, extract::State};
use generation::{AskOptions, GenerationResult};
use rag_store::{SourceKind, loader};
use tracing::{debug, info, instrument};

use crate::{
    core::{app_state::AppState, auth::require_service_token},
    error_handler::{AppError, AppResult},
};

/// One-shot document QA: upload a PDF/DOCX or pass a URL, ask a question
/// about it. The document is indexed into an ephemeral in-memory session
/// and never touches the persistent collection.
#[instrument(name = "ask_from_document_route", skip_all)]
pub async fn ask_from_document_route(
    State(state): State<Arc<AppState>>,
    mut multipart: Multipart,
) -> AppResult<Json<GenerationResult>> {
    let mut service_token = String::new();
    let mut query = String::new();
    let mut file_type = String::new();
    let mut url = String::new();
    let mut file: Option<(String, Vec<u8>)> = None;

    while let Some(field) = multipart.next_field().await? {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("service_token") => service_token = field.text().await?,
            Some("query") => query = field.text().await?,
            Some("file_type") => file_type = field.text().await?,
            Some("url") => url = field.text().await?,
            Some("file") => {
                let file_name = field
                    .file_name()
                    .map(str::to_string)
                    .unwrap_or_else(|| "upload".to_string());
                file = Some((file_name, field.bytes().await?.to_vec()));
            }
            _ => {}
        }
    }

    require_service_token(&state.config.service_token, &service_token)?;

    if query.trim().is_empty() {
        return Err(AppError::BadRequest("Query text required".into()));
    }
    if file_type.trim().is_empty() {
        return Err(AppError::BadRequest("file_type is required".into()));
    }
    let kind: SourceKind = file_type.parse()?;

    let documents = match kind {
        SourceKind::Pdf | SourceKind::Docx => {
            let (name, bytes) = file.ok_or_else(|| {
                AppError::BadRequest(format!(
                    "file is required for file_type `{}`",
                    file_type.trim()
                ))
            })?;
            debug!(file = %name, bytes = bytes.len(), "processing upload");
            match kind {
                SourceKind::Pdf => loader::pdf::load_pdf_bytes(&bytes, &name)?,
                _ => loader::docx::load_docx_bytes(&bytes, &name)?,
            }
        }
        SourceKind::Url => {
            if url.trim().is_empty() {
                return Err(AppError::BadRequest(
                    "url is required for file_type `url`".into(),
                ));
            }
            loader::web::load_url(&url).await?
        }
    };

    let session = state.store.ephemeral();
    let report = session.ingest_documents(documents).await?;
    debug!(chunks = report.chunks_created, "session indexed");

    let result = state
        .answerer
        .answer(&session, &query, AskOptions::default())
        .await?;

    info!(
        contexts = result.used_contexts.len(),
        "document question answered"
    );
    Ok(Json(result))
}
