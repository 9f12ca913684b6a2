//! Recursive character splitter.
//!
//! Splits on paragraph boundaries first, then sentence boundaries, then
//! whitespace, and falls back to a hard character window with overlap when no
//! boundary fits. Chunks never exceed `chunk_size` characters and every
//! character of the source text lands in at least one chunk.

use crate::config::RagConfig;
use crate::errors::RagError;
use crate::record::{Document, META_CHUNK};

/// Boundary hierarchy, tried in order.
const SEPARATORS: [&str; 5] = ["\n\n", ". ", "! ", "? ", " "];

#[derive(Debug, Clone)]
pub struct Splitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl Splitter {
    /// # Errors
    /// Fails when `chunk_size` is zero or `chunk_overlap >= chunk_size`.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self, RagError> {
        if chunk_size == 0 {
            return Err(RagError::Config("chunk_size must be > 0".into()));
        }
        if chunk_overlap >= chunk_size {
            return Err(RagError::Config(format!(
                "chunk_overlap ({chunk_overlap}) must be smaller than chunk_size ({chunk_size})"
            )));
        }
        Ok(Self { chunk_size, chunk_overlap })
    }

    pub fn from_config(cfg: &RagConfig) -> Result<Self, RagError> {
        Self::new(cfg.chunk_size, cfg.chunk_overlap)
    }

    /// Splits every document, preserving source order. Chunks inherit the
    /// metadata of the document they came from plus a 0-based `chunk`
    /// ordinal; documents with only whitespace are skipped.
    pub fn split_documents(&self, docs: &[Document]) -> Vec<Document> {
        let mut out = Vec::new();
        for doc in docs {
            if doc.content.trim().is_empty() {
                continue;
            }
            for (ordinal, piece) in self.split_text(&doc.content).into_iter().enumerate() {
                let mut metadata = doc.metadata.clone();
                metadata.insert(META_CHUNK.to_string(), ordinal.into());
                out.push(Document::new(piece, metadata));
            }
        }
        out
    }

    /// Splits one text into pieces of at most `chunk_size` characters.
    pub fn split_text(&self, text: &str) -> Vec<String> {
        split_and_merge(text, self.chunk_size, self.chunk_overlap, &SEPARATORS)
    }
}

/// Split at the first separator that occurs, then merge segments greedily up
/// to `chunk_size`. Oversized merged runs descend to the next separator.
fn split_and_merge(
    text: &str,
    chunk_size: usize,
    chunk_overlap: usize,
    separators: &[&str],
) -> Vec<String> {
    if char_len(text) <= chunk_size || separators.is_empty() {
        return split_by_size(text, chunk_size, chunk_overlap);
    }

    let separator = separators[0];
    let rest = &separators[1..];

    let segments = split_keeping_separator(text, separator);
    if segments.len() <= 1 {
        // This boundary never occurs here; try the next one.
        return split_and_merge(text, chunk_size, chunk_overlap, rest);
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0usize;

    for segment in segments {
        let seg_len = char_len(segment);
        if current.is_empty() || current_len + seg_len <= chunk_size {
            current.push_str(segment);
            current_len += seg_len;
        } else {
            flush(&mut chunks, std::mem::take(&mut current), chunk_size, chunk_overlap, rest);
            current.push_str(segment);
            current_len = seg_len;
        }
    }
    if !current.is_empty() {
        flush(&mut chunks, current, chunk_size, chunk_overlap, rest);
    }

    chunks
}

fn flush(
    chunks: &mut Vec<String>,
    piece: String,
    chunk_size: usize,
    chunk_overlap: usize,
    rest: &[&str],
) {
    if char_len(&piece) > chunk_size {
        chunks.extend(split_and_merge(&piece, chunk_size, chunk_overlap, rest));
    } else {
        chunks.push(piece);
    }
}

/// Keeps the separator attached to the preceding piece so re-joining chunks
/// reproduces the source text.
fn split_keeping_separator<'a>(text: &'a str, separator: &str) -> Vec<&'a str> {
    let mut parts = Vec::new();
    let mut start = 0;
    while let Some(pos) = text[start..].find(separator) {
        let end = start + pos + separator.len();
        parts.push(&text[start..end]);
        start = end;
    }
    if start < text.len() {
        parts.push(&text[start..]);
    }
    parts
}

/// Hard character window with overlap; the last resort when no boundary fits.
/// Char-indexed so multi-byte text never splits inside a code point.
fn split_by_size(text: &str, chunk_size: usize, chunk_overlap: usize) -> Vec<String> {
    if text.is_empty() {
        return Vec::new();
    }

    let chars: Vec<char> = text.chars().collect();
    let step = chunk_size - chunk_overlap;
    let mut chunks = Vec::new();
    let mut start = 0;

    while start < chars.len() {
        let end = (start + chunk_size).min(chars.len());
        chunks.push(chars[start..end].iter().collect());
        if end == chars.len() {
            break;
        }
        start += step;
    }

    chunks
}

fn char_len(s: &str) -> usize {
    s.chars().count()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Metadata;
    use serde_json::json;

    fn splitter(size: usize, overlap: usize) -> Splitter {
        Splitter::new(size, overlap).unwrap()
    }

    #[test]
    fn short_text_is_one_chunk() {
        let chunks = splitter(100, 10).split_text("tiny");
        assert_eq!(chunks, vec!["tiny".to_string()]);
    }

    #[test]
    fn every_chunk_respects_the_size_cap() {
        let text = "Lorem ipsum dolor sit amet. Consectetur adipiscing elit. \
                    Sed do eiusmod tempor incididunt ut labore.\n\n\
                    Ut enim ad minim veniam, quis nostrud exercitation ullamco \
                    laboris nisi ut aliquip ex ea commodo consequat."
            .repeat(5);
        for chunk in splitter(50, 10).split_text(&text) {
            assert!(chunk.chars().count() <= 50, "oversized chunk: {chunk:?}");
        }
    }

    #[test]
    fn paragraph_boundaries_are_preferred() {
        let text = format!("{}\n\n{}", "a".repeat(30), "b".repeat(30));
        let chunks = splitter(40, 5).split_text(&text);
        assert_eq!(chunks.len(), 2);
        assert!(chunks[0].ends_with("\n\n"));
        assert!(chunks[1].starts_with('b'));
    }

    #[test]
    fn no_words_are_dropped() {
        let words: Vec<String> = (0..200).map(|i| format!("word{i}")).collect();
        let text = words.join(" ");
        let chunks = splitter(40, 8).split_text(&text);
        let joined = chunks.concat();
        for word in &words {
            assert!(joined.contains(word.as_str()), "missing {word}");
        }
    }

    #[test]
    fn hard_cuts_carry_overlap() {
        // No separator at all, so the window fallback must kick in.
        let text: String = ('a'..='z').cycle().take(100).collect();
        let chunks = splitter(20, 5).split_text(&text);
        assert!(chunks.len() > 1);
        for pair in chunks.windows(2) {
            let tail: String = pair[0].chars().rev().take(5).collect::<Vec<_>>().into_iter().rev().collect();
            assert!(pair[1].starts_with(&tail));
        }
    }

    #[test]
    fn multibyte_text_never_panics() {
        let text = "é".repeat(95);
        let chunks = splitter(30, 5).split_text(&text);
        for chunk in &chunks {
            assert!(chunk.chars().count() <= 30);
        }
        assert!(chunks.concat().chars().count() >= 95);
    }

    #[test]
    fn whitespace_documents_are_skipped() {
        let docs = vec![
            Document::new("   \n  ", Metadata::new()),
            Document::new("real content here", Metadata::new()),
        ];
        let chunks = splitter(100, 10).split_documents(&docs);
        assert_eq!(chunks.len(), 1);
        assert_eq!(chunks[0].content, "real content here");
    }

    #[test]
    fn chunks_inherit_source_metadata_and_get_ordinals() {
        let mut meta = Metadata::new();
        meta.insert("source".into(), json!("report.pdf"));
        meta.insert("page".into(), json!(3));
        let docs = vec![Document::new("x ".repeat(100), meta)];

        let chunks = splitter(40, 8).split_documents(&docs);
        assert!(chunks.len() > 1);
        for (i, chunk) in chunks.iter().enumerate() {
            assert_eq!(chunk.metadata.get("source"), Some(&json!("report.pdf")));
            assert_eq!(chunk.metadata.get("page"), Some(&json!(3)));
            assert_eq!(chunk.metadata.get("chunk"), Some(&json!(i)));
        }
    }
}
