//! Supported LLM backends.

use std::fmt;

/// Identifies which backend protocol a model config targets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LlmProvider {
    /// Local or remote Ollama daemon speaking the `/api/*` protocol.
    Ollama,
    /// OpenAI or any server speaking the `/v1/*` chat-completions protocol.
    OpenAI,
}

impl LlmProvider {
    /// Parses the `LLM_PROVIDER` environment value, case-insensitively.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "ollama" => Some(Self::Ollama),
            "openai" | "chatgpt" => Some(Self::OpenAI),
            _ => None,
        }
    }
}

impl fmt::Display for LlmProvider {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ollama => write!(f, "ollama"),
            Self::OpenAI => write!(f, "openai"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_lenient_about_case_and_aliases() {
        assert_eq!(LlmProvider::parse("Ollama"), Some(LlmProvider::Ollama));
        assert_eq!(LlmProvider::parse(" openai "), Some(LlmProvider::OpenAI));
        assert_eq!(LlmProvider::parse("chatgpt"), Some(LlmProvider::OpenAI));
        assert_eq!(LlmProvider::parse("llamacpp"), None);
    }
}
