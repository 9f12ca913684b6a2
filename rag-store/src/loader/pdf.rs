//! PDF text extraction, one [`Document`] per page.

use lopdf::Document as PdfDocument;
use serde_json::json;
use tracing::trace;

use crate::errors::RagError;
use crate::record::{Document, META_PAGE, META_SOURCE, Metadata};

/// Extracts page texts from in-memory PDF bytes.
///
/// Pages whose extraction fails or yields only whitespace are skipped, so an
/// image-only page never produces an empty chunk. `source` ends up in each
/// page's metadata along with its 1-based page number.
pub fn load_pdf_bytes(bytes: &[u8], source: &str) -> Result<Vec<Document>, RagError> {
    let pdf = PdfDocument::load_mem(bytes)
        .map_err(|e| RagError::Extract(format!("`{source}` is not a readable PDF: {e}")))?;

    let mut documents = Vec::new();
    for (page_no, _) in pdf.get_pages() {
        let text = match pdf.extract_text(&[page_no]) {
            Ok(text) => text,
            Err(e) => {
                trace!(source, page_no, error = %e, "skipping unextractable page");
                continue;
            }
        };
        if text.trim().is_empty() {
            continue;
        }

        let mut metadata = Metadata::new();
        metadata.insert(META_SOURCE.to_string(), json!(source));
        metadata.insert(META_PAGE.to_string(), json!(page_no));
        documents.push(Document::new(text, metadata));
    }

    Ok(documents)
}

/// Minimal single-page PDF with real text content, for loader tests.
#[cfg(test)]
pub(crate) fn sample_pdf_bytes() -> Vec<u8> {
    use lopdf::content::{Content, Operation};
    use lopdf::{Document as Pdf, Object, Stream, dictionary};

    let mut doc = Pdf::with_version("1.5");
    let pages_id = doc.new_object_id();
    let font_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Courier",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! { "F1" => font_id },
    });
    let content = Content {
        operations: vec![
            Operation::new("BT", vec![]),
            Operation::new("Tf", vec!["F1".into(), 24.into()]),
            Operation::new("Td", vec![100.into(), 600.into()]),
            Operation::new("Tj", vec![Object::string_literal("The capital of France is Paris.")]),
            Operation::new("ET", vec![]),
        ],
    };
    let content_id = doc.add_object(Stream::new(
        dictionary! {},
        content.encode().unwrap(),
    ));
    let page_id = doc.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    });
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => vec![page_id.into()],
        "Count" => 1,
        "Resources" => resources_id,
        "MediaBox" => vec![0.into(), 0.into(), 595.into(), 842.into()],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages));
    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).unwrap();
    bytes
}
