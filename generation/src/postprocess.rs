//! Raw model output cleanup.
//!
//! Chat-tuned models often echo the prompt or emit role markers before the
//! actual answer. The postprocessor cuts everything up to the last marker
//! occurrence and trims whitespace; output without markers passes through
//! untouched apart from the trim.

/// Marker-based response cleaner.
#[derive(Debug, Clone)]
pub struct ResponsePostProcessor {
    markers: Vec<String>,
}

impl ResponsePostProcessor {
    pub fn new(markers: Vec<String>) -> Self {
        Self { markers }
    }

    /// Markers seen in common chat templates.
    pub fn default_chat_markers() -> Self {
        Self::new(vec![
            "<|im_start|>assistant".to_string(),
            "Assistant:".to_string(),
        ])
    }

    /// Returns the text after the LAST occurrence of any marker, trimmed.
    ///
    /// The last occurrence matters: when the model echoes the whole chat
    /// template back, earlier markers belong to the echoed prompt, not the
    /// answer.
    pub fn clean(&self, raw: &str) -> String {
        let cut = self
            .markers
            .iter()
            .filter_map(|marker| raw.rfind(marker).map(|pos| pos + marker.len()))
            .max();
        match cut {
            Some(pos) => raw[pos..].trim().to_string(),
            None => raw.trim().to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn processor() -> ResponsePostProcessor {
        ResponsePostProcessor::default_chat_markers()
    }

    #[test]
    fn output_without_markers_is_only_trimmed() {
        assert_eq!(processor().clean("  plain answer \n"), "plain answer");
    }

    #[test]
    fn text_after_the_marker_survives() {
        assert_eq!(
            processor().clean("some preamble Assistant: the answer"),
            "the answer"
        );
    }

    #[test]
    fn the_last_marker_wins() {
        let raw = "Assistant: echoed prompt <|im_start|>assistant\nreal answer";
        assert_eq!(processor().clean(raw), "real answer");
    }

    #[test]
    fn marker_at_the_end_leaves_an_empty_answer() {
        assert_eq!(processor().clean("everything echoed Assistant:"), "");
    }

    #[test]
    fn custom_markers_replace_the_defaults() {
        let p = ResponsePostProcessor::new(vec!["### Response:".to_string()]);
        assert_eq!(p.clean("### Response: fine"), "fine");
        assert_eq!(p.clean("Assistant: untouched"), "Assistant: untouched");
    }
}
