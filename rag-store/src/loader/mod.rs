//! Document loaders.
//!
//! Each loader turns a raw source (PDF folder, uploaded file bytes, URL) into
//! [`Document`]s carrying `source` and, where it applies, `page` metadata.

pub mod docx;
pub mod pdf;
pub mod web;

use std::path::Path;
use std::str::FromStr;

use tracing::{debug, info};

use crate::errors::RagError;
use crate::record::Document;

/// Upload formats the gateway accepts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceKind {
    Pdf,
    Docx,
    Url,
}

impl FromStr for SourceKind {
    type Err = RagError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "pdf" => Ok(Self::Pdf),
            "docx" => Ok(Self::Docx),
            "url" => Ok(Self::Url),
            other => Err(RagError::InvalidSource(format!(
                "unsupported file_type: `{other}`"
            ))),
        }
    }
}

/// Loads every `*.pdf` in `folder`, sorted by file name.
///
/// # Errors
/// Fails when the folder is unreadable or contains no loadable PDFs.
pub async fn load_pdf_folder(folder: &Path) -> Result<Vec<Document>, RagError> {
    if !folder.is_dir() {
        return Err(RagError::InvalidSource(format!(
            "`{}` is not a readable folder",
            folder.display()
        )));
    }

    let mut paths = Vec::new();
    for dir_entry in std::fs::read_dir(folder)? {
        let path = dir_entry?.path();
        let is_pdf = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("pdf"));
        if is_pdf {
            paths.push(path);
        }
    }
    paths.sort();

    let mut documents = Vec::new();
    let mut files = 0usize;
    for path in &paths {
        debug!(path = %path.display(), "loading pdf");
        let bytes = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| path.display().to_string());
        documents.extend(pdf::load_pdf_bytes(&bytes, &name)?);
        files += 1;
    }

    if documents.is_empty() {
        return Err(RagError::NoDocuments(format!(
            "No PDFs found in `{}`",
            folder.display()
        )));
    }

    info!(files, pages = documents.len(), "loaded pdf folder");
    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn source_kind_parses_known_types() {
        assert_eq!("pdf".parse::<SourceKind>().unwrap(), SourceKind::Pdf);
        assert_eq!(" DOCX ".parse::<SourceKind>().unwrap(), SourceKind::Docx);
        assert_eq!("Url".parse::<SourceKind>().unwrap(), SourceKind::Url);
    }

    #[test]
    fn unknown_source_kind_is_rejected() {
        let err = "epub".parse::<SourceKind>().unwrap_err();
        assert!(matches!(err, RagError::InvalidSource(msg) if msg.contains("epub")));
    }

    #[tokio::test]
    async fn missing_folder_is_an_invalid_source() {
        let err = load_pdf_folder(Path::new("/definitely/not/here"))
            .await
            .unwrap_err();
        assert!(matches!(err, RagError::InvalidSource(_)));
    }

    #[tokio::test]
    async fn empty_folder_reports_no_documents() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_pdf_folder(dir.path()).await.unwrap_err();
        assert!(matches!(err, RagError::NoDocuments(_)));
    }

    #[tokio::test]
    async fn folder_with_a_pdf_yields_pages() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("sample.pdf"), pdf::sample_pdf_bytes()).unwrap();
        std::fs::write(dir.path().join("notes.txt"), b"ignored").unwrap();

        let docs = load_pdf_folder(dir.path()).await.unwrap();
        assert_eq!(docs.len(), 1);
        assert_eq!(
            docs[0].metadata.get(crate::record::META_SOURCE),
            Some(&serde_json::json!("sample.pdf"))
        );
    }
}
