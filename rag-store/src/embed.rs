//! Embedding abstraction and batching.

use std::sync::Arc;

use async_trait::async_trait;
use llm_service::LlmServiceProfiles;
use tracing::{debug, trace};

use crate::errors::RagError;
use crate::record::Document;

/// Provider interface for embedding generation.
///
/// Implement this trait to plug in your own embedding backend (e.g., Ollama,
/// OpenAI, local models).
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Produces an embedding vector for the given text.
    async fn embed(&self, text: &str) -> Result<Vec<f32>, RagError>;

    /// Embeds a batch of texts, preserving input order.
    ///
    /// The default implementation embeds sequentially; providers with a
    /// native batch endpoint should override it.
    async fn embed_batch(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RagError> {
        let mut out = Vec::with_capacity(texts.len());
        for text in texts {
            out.push(self.embed(text).await?);
        }
        Ok(out)
    }
}

/// [`EmbeddingProvider`] backed by the configured embedding model.
pub struct LlmEmbedder {
    svc: Arc<LlmServiceProfiles>,
}

impl LlmEmbedder {
    pub fn new(svc: Arc<LlmServiceProfiles>) -> Self {
        Self { svc }
    }
}

#[async_trait]
impl EmbeddingProvider for LlmEmbedder {
    async fn embed(&self, text: &str) -> Result<Vec<f32>, RagError> {
        Ok(self.svc.embed(text).await?)
    }
}

/// Batches texts through an [`EmbeddingProvider`] and applies the configured
/// vector policies (dimension check, L2 normalization).
#[derive(Clone)]
pub struct Embedder {
    provider: Arc<dyn EmbeddingProvider>,
    batch_size: usize,
    normalize: bool,
    expected_dim: Option<usize>,
}

impl Embedder {
    pub fn new(
        provider: Arc<dyn EmbeddingProvider>,
        batch_size: usize,
        normalize: bool,
        expected_dim: Option<usize>,
    ) -> Self {
        Self { provider, batch_size: batch_size.max(1), normalize, expected_dim }
    }

    /// Embeds all texts in configured batches. Output order matches input
    /// order.
    pub async fn embed_texts(&self, texts: &[String]) -> Result<Vec<Vec<f32>>, RagError> {
        let mut vectors = Vec::with_capacity(texts.len());
        for (batch_no, batch) in texts.chunks(self.batch_size).enumerate() {
            trace!(batch_no, size = batch.len(), "embedding batch");
            for mut vector in self.provider.embed_batch(batch).await? {
                self.check_dim(&vector)?;
                if self.normalize {
                    l2_normalize(&mut vector);
                }
                vectors.push(vector);
            }
        }
        debug!(texts = texts.len(), "embedded");
        Ok(vectors)
    }

    /// Embeds chunk documents, pairing each vector with its source chunk.
    pub async fn embed_documents(
        &self,
        chunks: Vec<Document>,
    ) -> Result<Vec<(Vec<f32>, Document)>, RagError> {
        let texts: Vec<String> = chunks.iter().map(|c| c.content.clone()).collect();
        let vectors = self.embed_texts(&texts).await?;
        Ok(vectors.into_iter().zip(chunks).collect())
    }

    /// Embeds a single query string.
    pub async fn embed_query(&self, query: &str) -> Result<Vec<f32>, RagError> {
        let mut vector = self.provider.embed(query).await?;
        self.check_dim(&vector)?;
        if self.normalize {
            l2_normalize(&mut vector);
        }
        Ok(vector)
    }

    fn check_dim(&self, vector: &[f32]) -> Result<(), RagError> {
        if let Some(want) = self.expected_dim {
            if vector.len() != want {
                return Err(RagError::VectorSizeMismatch { got: vector.len(), want });
            }
        }
        Ok(())
    }
}

/// Scales the vector to unit length. Zero vectors are left untouched.
fn l2_normalize(vector: &mut [f32]) {
    let norm = vector.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm > 0.0 {
        for x in vector.iter_mut() {
            *x /= norm;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::record::Metadata;

    /// Deterministic provider: first component is the text length.
    struct StubProvider;

    #[async_trait]
    impl EmbeddingProvider for StubProvider {
        async fn embed(&self, text: &str) -> Result<Vec<f32>, RagError> {
            Ok(vec![text.len() as f32, 1.0, 0.0])
        }
    }

    fn embedder(normalize: bool, dim: Option<usize>) -> Embedder {
        Embedder::new(Arc::new(StubProvider), 2, normalize, dim)
    }

    #[tokio::test]
    async fn normalized_vectors_have_unit_length() {
        let vectors = embedder(true, None)
            .embed_texts(&["abc".into()])
            .await
            .unwrap();
        let norm: f32 = vectors[0].iter().map(|x| x * x).sum::<f32>().sqrt();
        assert!((norm - 1.0).abs() < 1e-5);
    }

    #[tokio::test]
    async fn zero_vectors_survive_normalization() {
        let mut v = vec![0.0_f32, 0.0, 0.0];
        l2_normalize(&mut v);
        assert_eq!(v, vec![0.0, 0.0, 0.0]);
    }

    #[tokio::test]
    async fn order_is_preserved_across_batches() {
        let texts: Vec<String> = vec!["a".into(), "bb".into(), "ccc".into(), "dddd".into(), "eeeee".into()];
        let vectors = embedder(false, None).embed_texts(&texts).await.unwrap();
        let lens: Vec<f32> = vectors.iter().map(|v| v[0]).collect();
        assert_eq!(lens, vec![1.0, 2.0, 3.0, 4.0, 5.0]);
    }

    #[tokio::test]
    async fn wrong_dimension_is_rejected() {
        let err = embedder(false, Some(4))
            .embed_query("abc")
            .await
            .unwrap_err();
        assert!(matches!(err, RagError::VectorSizeMismatch { got: 3, want: 4 }));
    }

    #[tokio::test]
    async fn documents_pair_with_their_vectors() {
        let chunks = vec![
            Document::new("a", Metadata::new()),
            Document::new("bb", Metadata::new()),
        ];
        let pairs = embedder(false, None).embed_documents(chunks).await.unwrap();
        assert_eq!(pairs.len(), 2);
        assert_eq!(pairs[0].0[0], 1.0);
        assert_eq!(pairs[0].1.content, "a");
        assert_eq!(pairs[1].0[0], 2.0);
        assert_eq!(pairs[1].1.content, "bb");
    }
}
