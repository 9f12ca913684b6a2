use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use generation::GenerationError;
use llm_service::LlmError;
use rag_store::RagError;
use serde::Serialize;
use thiserror::Error;

/// Public application error type.
#[derive(Debug, Error)]
pub enum AppError {
    // --- Boot / config ---
    #[error("missing required environment variable: {0}")]
    MissingEnv(&'static str),

    #[error("configuration error: {0}")]
    Config(String),

    // --- IO / network / server ---
    #[error("failed to bind listener")]
    Bind(#[source] std::io::Error),

    #[error("server error")]
    Server(#[source] std::io::Error),

    // --- Request / routing ---
    #[error("Invalid service code. Access denied.")]
    Forbidden,

    #[error("{0}")]
    BadRequest(String),

    #[error("{0}")]
    NotFound(String),

    /// An external backend (embedding, generation, vector index) failed.
    #[error("{0}")]
    Upstream(String),

    #[error("{0}")]
    Internal(String),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            // startup-only, but a handler can still hit Config via state
            AppError::MissingEnv(_) | AppError::Config(_) => StatusCode::INTERNAL_SERVER_ERROR,

            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::NotFound(_) => StatusCode::NOT_FOUND,
            AppError::Upstream(_) => StatusCode::BAD_GATEWAY,

            AppError::Bind(_) | AppError::Server(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::MissingEnv(_) => "MISSING_ENV",
            AppError::Config(_) => "CONFIG_ERROR",
            AppError::Bind(_) => "BIND_ERROR",
            AppError::Server(_) => "SERVER_ERROR",
            AppError::Forbidden => "FORBIDDEN",
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::NotFound(_) => "NOT_FOUND",
            AppError::Upstream(_) => "UPSTREAM_ERROR",
            AppError::Internal(_) => "INTERNAL_ERROR",
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    detail: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let body = ErrorBody {
            error: self.error_code(),
            detail: self.to_string(),
        };
        (status, Json(body)).into_response()
    }
}

/// Handy result alias used across handlers.
pub type AppResult<T> = Result<T, AppError>;

/// Convert common Axum rejections to `AppError`.
impl From<axum::extract::rejection::JsonRejection> for AppError {
    fn from(err: axum::extract::rejection::JsonRejection) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl From<axum::extract::multipart::MultipartError> for AppError {
    fn from(err: axum::extract::multipart::MultipartError) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

/// Map pipeline errors onto HTTP statuses: caller mistakes become 4xx,
/// backend failures 502, everything else 500.
impl From<RagError> for AppError {
    fn from(err: RagError) -> Self {
        match err {
            RagError::EmptyQuery | RagError::NoChunks => AppError::BadRequest(err.to_string()),
            RagError::InvalidSource(msg) | RagError::Extract(msg) => AppError::BadRequest(msg),
            RagError::NoDocuments(msg) => AppError::NotFound(msg),
            RagError::Embedding(e) => AppError::Upstream(e.to_string()),
            RagError::Qdrant(msg) => AppError::Upstream(msg),
            RagError::Config(msg) => AppError::Config(msg),
            other => AppError::Internal(other.to_string()),
        }
    }
}

impl From<GenerationError> for AppError {
    fn from(err: GenerationError) -> Self {
        match err {
            GenerationError::EmptyQuery => AppError::BadRequest(err.to_string()),
            GenerationError::Rag(e) => AppError::from(e),
            GenerationError::Llm(e) => AppError::from(e),
        }
    }
}

impl From<LlmError> for AppError {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::Config(e) => AppError::Config(e.to_string()),
            other => AppError::Upstream(other.to_string()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forbidden_keeps_the_fixed_message() {
        assert_eq!(
            AppError::Forbidden.to_string(),
            "Invalid service code. Access denied."
        );
        assert_eq!(AppError::Forbidden.status_code(), StatusCode::FORBIDDEN);
    }

    #[test]
    fn empty_query_maps_to_bad_request() {
        let err = AppError::from(RagError::EmptyQuery);
        assert_eq!(err.status_code(), StatusCode::BAD_REQUEST);
        assert_eq!(err.to_string(), "Query cannot be empty.");
    }

    #[test]
    fn missing_documents_map_to_not_found() {
        let err = AppError::from(RagError::NoDocuments("No PDFs found in `data`".into()));
        assert_eq!(err.status_code(), StatusCode::NOT_FOUND);
    }

    #[test]
    fn qdrant_failures_map_to_bad_gateway() {
        let err = AppError::from(RagError::Qdrant("connection refused".into()));
        assert_eq!(err.status_code(), StatusCode::BAD_GATEWAY);
        assert_eq!(err.error_code(), "UPSTREAM_ERROR");
    }
}
