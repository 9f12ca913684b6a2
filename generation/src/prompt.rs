//! Prompt builder: grounding instructions + numbered context block.

use rag_store::{META_PAGE, META_SOURCE, RetrievalResult};

/// Instructions that keep the model inside the retrieved context.
///
/// Keep this short: it consistently improves grounding without wasting
/// tokens.
const INSTRUCTIONS: &str = "You are an assistant that answers the user using ONLY the provided context.\n\
If the answer is fully contained in the context, answer directly.\n\
If the context does NOT contain the answer, then say ONLY: \"I don't know.\"\n";

/// Builds the final prompt: instructions, numbered context entries with
/// provenance lines, then the question.
///
/// The context block is capped at `max_chars`, preserving ranking order;
/// the entry that crosses the budget is truncated at a char boundary and
/// later entries are dropped.
pub fn build_prompt(query: &str, contexts: &[RetrievalResult], max_chars: usize) -> String {
    let mut out = String::from(INSTRUCTIONS);
    out.push_str("\nCONTEXT:\n");

    let mut budget = max_chars;
    for (i, hit) in contexts.iter().enumerate() {
        let entry = format!(
            "[{}] {}\n({})\n",
            i + 1,
            hit.text.trim(),
            provenance(hit)
        );
        if entry.len() <= budget {
            budget -= entry.len();
            out.push_str(&entry);
        } else {
            out.push_str(safe_truncate(&entry, budget));
            out.push('\n');
            break;
        }
    }

    out.push_str("\nQUESTION:\n");
    out.push_str(query.trim());
    out.push_str("\n\nAnswer with citations.\n\nAnswer:\n");
    out
}

/// `source, page N` when both are present, `unknown` when neither is.
fn provenance(hit: &RetrievalResult) -> String {
    let source = hit
        .metadata
        .get(META_SOURCE)
        .and_then(|v| v.as_str())
        .unwrap_or("unknown");
    match hit.metadata.get(META_PAGE).and_then(|v| v.as_u64()) {
        Some(page) => format!("{source}, page {page}"),
        None => source.to_string(),
    }
}

fn safe_truncate(s: &str, max: usize) -> &str {
    if s.len() <= max {
        s
    } else {
        let mut end = max;
        while end > 0 && !s.is_char_boundary(end) {
            end -= 1;
        }
        &s[..end]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rag_store::Metadata;
    use serde_json::json;

    fn hit(text: &str, source: &str, page: Option<u64>) -> RetrievalResult {
        let mut metadata = Metadata::new();
        metadata.insert(META_SOURCE.to_string(), json!(source));
        if let Some(page) = page {
            metadata.insert(META_PAGE.to_string(), json!(page));
        }
        RetrievalResult {
            text: text.to_string(),
            metadata,
            distance: 0.1,
        }
    }

    #[test]
    fn prompt_numbers_contexts_and_cites_pages() {
        let prompt = build_prompt(
            "What is the capital?",
            &[
                hit("Paris is the capital of France.", "geo.pdf", Some(3)),
                hit("France is in Europe.", "geo.pdf", None),
            ],
            10_000,
        );
        assert!(prompt.contains("[1] Paris is the capital of France.\n(geo.pdf, page 3)"));
        assert!(prompt.contains("[2] France is in Europe.\n(geo.pdf)"));
        assert!(prompt.contains("QUESTION:\nWhat is the capital?"));
        assert!(prompt.ends_with("Answer:\n"));
    }

    #[test]
    fn context_budget_drops_the_tail() {
        let long = "x".repeat(500);
        let prompt = build_prompt(
            "q",
            &[hit(&long, "a.pdf", None), hit("never shows up", "b.pdf", None)],
            120,
        );
        assert!(!prompt.contains("never shows up"));
        assert!(prompt.contains("QUESTION:"));
    }

    #[test]
    fn missing_provenance_degrades_gracefully() {
        let bare = RetrievalResult {
            text: "orphan chunk".into(),
            metadata: Metadata::new(),
            distance: 0.2,
        };
        let prompt = build_prompt("q", &[bare], 1000);
        assert!(prompt.contains("(unknown)"));
    }
}
