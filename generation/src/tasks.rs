//! Plain inference tasks without retrieval: generate, summarize, QA over
//! caller-supplied context, and the generate-then-QA chain.

use llm_service::GenerationParams;
use tracing::debug;

use crate::error::GenerationError;
use crate::generator::TextGenerator;
use crate::postprocess::ResponsePostProcessor;

/// Free-form completion for `prompt`.
pub async fn generate_text(
    generator: &dyn TextGenerator,
    postprocess: &ResponsePostProcessor,
    prompt: &str,
    params: Option<GenerationParams>,
) -> Result<String, GenerationError> {
    if prompt.trim().is_empty() {
        return Err(GenerationError::EmptyQuery);
    }
    let raw = generator.generate(prompt.trim(), params).await?;
    Ok(postprocess.clean(&raw))
}

/// One-paragraph summary of `text`, via the summarization profile.
pub async fn summarize(
    generator: &dyn TextGenerator,
    postprocess: &ResponsePostProcessor,
    text: &str,
    params: Option<GenerationParams>,
) -> Result<String, GenerationError> {
    if text.trim().is_empty() {
        return Err(GenerationError::EmptyQuery);
    }
    let prompt = format!("Summarize this text in one short paragraph:\n\n{}", text.trim());
    let raw = generator.generate_summary(&prompt, params).await?;
    Ok(postprocess.clean(&raw))
}

/// Answers `question` using only the caller-supplied `context`.
pub async fn answer_question(
    generator: &dyn TextGenerator,
    postprocess: &ResponsePostProcessor,
    question: &str,
    context: &str,
    params: Option<GenerationParams>,
) -> Result<String, GenerationError> {
    if question.trim().is_empty() {
        return Err(GenerationError::EmptyQuery);
    }
    let prompt = format!(
        "Answer the question using only the context below. \
         If the context does not contain the answer, say \"I don't know.\"\n\n\
         CONTEXT:\n{}\n\nQUESTION:\n{}\n\nAnswer:\n",
        context.trim(),
        question.trim()
    );
    let raw = generator.generate(&prompt, params).await?;
    Ok(postprocess.clean(&raw))
}

/// Two-step chain: generate free text for `query`, then answer the same
/// query with that text as the QA context. Only the final answer is
/// returned.
pub async fn chain(
    generator: &dyn TextGenerator,
    postprocess: &ResponsePostProcessor,
    query: &str,
    params: Option<GenerationParams>,
) -> Result<String, GenerationError> {
    if query.trim().is_empty() {
        return Err(GenerationError::EmptyQuery);
    }
    let generated = generate_text(generator, postprocess, query, params).await?;
    debug!(chars = generated.len(), "chain intermediate text");
    answer_question(generator, postprocess, query, &generated, params).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;

    /// Echoes a canned reply per call, recording the prompts it saw.
    struct ScriptedGenerator {
        replies: std::sync::Mutex<Vec<String>>,
        seen: std::sync::Mutex<Vec<String>>,
    }

    impl ScriptedGenerator {
        fn new(replies: &[&str]) -> Self {
            Self {
                replies: std::sync::Mutex::new(
                    replies.iter().rev().map(|s| s.to_string()).collect(),
                ),
                seen: std::sync::Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl TextGenerator for ScriptedGenerator {
        async fn generate(
            &self,
            prompt: &str,
            _params: Option<GenerationParams>,
        ) -> Result<String, GenerationError> {
            self.seen.lock().unwrap().push(prompt.to_string());
            Ok(self.replies.lock().unwrap().pop().unwrap_or_default())
        }
    }

    fn pp() -> ResponsePostProcessor {
        ResponsePostProcessor::default_chat_markers()
    }

    #[tokio::test]
    async fn generate_cleans_chat_markers() {
        let g = ScriptedGenerator::new(&["Assistant: hi there"]);
        let out = generate_text(&g, &pp(), "say hi", None).await.unwrap();
        assert_eq!(out, "hi there");
    }

    #[tokio::test]
    async fn blank_prompt_is_rejected() {
        let g = ScriptedGenerator::new(&[]);
        let err = generate_text(&g, &pp(), "  ", None).await.unwrap_err();
        assert!(matches!(err, GenerationError::EmptyQuery));
    }

    #[tokio::test]
    async fn summarize_wraps_the_text_in_its_prompt() {
        let g = ScriptedGenerator::new(&["short version"]);
        let out = summarize(&g, &pp(), "a very long article", None).await.unwrap();
        assert_eq!(out, "short version");
        let seen = g.seen.lock().unwrap();
        assert!(seen[0].starts_with("Summarize this text in one short paragraph:"));
        assert!(seen[0].contains("a very long article"));
    }

    #[tokio::test]
    async fn qa_feeds_context_and_question() {
        let g = ScriptedGenerator::new(&["Paris"]);
        let out = answer_question(&g, &pp(), "Capital of France?", "Paris is the capital.", None)
            .await
            .unwrap();
        assert_eq!(out, "Paris");
        let seen = g.seen.lock().unwrap();
        assert!(seen[0].contains("CONTEXT:\nParis is the capital."));
        assert!(seen[0].contains("QUESTION:\nCapital of France?"));
    }

    #[tokio::test]
    async fn chain_runs_generate_then_qa() {
        let g = ScriptedGenerator::new(&["Generated essay about France.", "Paris"]);
        let out = chain(&g, &pp(), "Capital of France?", None).await.unwrap();
        assert_eq!(out, "Paris");

        let seen = g.seen.lock().unwrap();
        assert_eq!(seen.len(), 2);
        // The second call's context is the first call's output.
        assert!(seen[1].contains("Generated essay about France."));
    }
}
