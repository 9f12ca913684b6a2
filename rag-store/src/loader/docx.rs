//! DOCX text extraction.
//!
//! A `.docx` file is a zip container; all visible text lives inside `<w:t>`
//! runs in `word/document.xml`. We stream that XML and collect the runs,
//! inserting newlines at paragraph ends.

use std::io::{Cursor, Read};

use quick_xml::Reader;
use quick_xml::events::Event;
use serde_json::json;
use zip::ZipArchive;

use crate::errors::RagError;
use crate::record::{Document, META_SOURCE, Metadata};

/// Extracts the text of an in-memory DOCX file as a single [`Document`].
///
/// Returns an empty vec when the file holds no visible text at all.
pub fn load_docx_bytes(bytes: &[u8], source: &str) -> Result<Vec<Document>, RagError> {
    let mut archive = ZipArchive::new(Cursor::new(bytes))
        .map_err(|e| RagError::Extract(format!("`{source}` is not a readable DOCX: {e}")))?;

    let mut xml = String::new();
    archive
        .by_name("word/document.xml")
        .map_err(|_| RagError::Extract(format!("`{source}` has no document part")))?
        .read_to_string(&mut xml)
        .map_err(|e| RagError::Extract(format!("`{source}` document part is not UTF-8: {e}")))?;

    let text = document_xml_to_text(&xml, source)?;
    if text.trim().is_empty() {
        return Ok(Vec::new());
    }

    let mut metadata = Metadata::new();
    metadata.insert(META_SOURCE.to_string(), json!(source));
    Ok(vec![Document::new(text, metadata)])
}

fn document_xml_to_text(xml: &str, source: &str) -> Result<String, RagError> {
    let mut reader = Reader::from_reader(xml.as_bytes());
    let mut buf = Vec::new();
    let mut text = String::new();
    // `<w:t>` elements can nest inside tracked-changes markup, so count depth
    // rather than toggling a flag.
    let mut inside_text_run = 0u32;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(ref e)) if e.local_name().as_ref() == b"t" => {
                inside_text_run += 1;
            }
            Ok(Event::End(ref e)) if e.local_name().as_ref() == b"t" => {
                inside_text_run = inside_text_run.saturating_sub(1);
            }
            Ok(Event::End(ref e)) if e.local_name().as_ref() == b"p" => {
                text.push('\n');
            }
            Ok(Event::Text(ref t)) if inside_text_run > 0 => {
                let run = t.unescape().map_err(|e| {
                    RagError::Extract(format!("`{source}` has malformed text at byte {}: {e}",
                        reader.buffer_position()))
                })?;
                text.push_str(&run);
            }
            Ok(Event::Eof) => break,
            Ok(_) => {}
            Err(e) => {
                return Err(RagError::Extract(format!(
                    "`{source}` has malformed XML at byte {}: {e}",
                    reader.buffer_position()
                )));
            }
        }
        buf.clear();
    }

    Ok(text)
}
