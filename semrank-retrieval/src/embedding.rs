//! Embedding provider trait for generating vector embeddings from text.

use async_trait::async_trait;

use crate::error::Result;

/// A provider that generates vector embeddings from text input.
///
/// Providers are constructed explicitly and injected into the indexing and
/// query paths — never held as global state — so tests can substitute a
/// deterministic stub. A provider is loaded once per process and reused for
/// every chunk and every query.
///
/// The default [`embed_batch`](EmbeddingProvider::embed_batch) implementation
/// calls [`embed`](EmbeddingProvider::embed) sequentially; backends that
/// support native batching should override it, but must preserve
/// output-order correspondence to the input order.
///
/// # Example
///
/// ```rust,ignore
/// use semrank_retrieval::EmbeddingProvider;
///
/// let provider = MyEmbeddingProvider::new();
/// let embedding = provider.embed("hello world").await?;
/// assert_eq!(embedding.len(), provider.dimensions());
/// ```
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding vector for a single text input.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embedding vectors for a batch of text inputs.
    ///
    /// The result vector corresponds index-for-index to `texts`. The default
    /// implementation embeds sequentially; override for native batching.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }

    /// Return the dimensionality of embeddings produced by this provider.
    ///
    /// Constant for the lifetime of the provider; every vector in an index
    /// built with this provider has this length.
    fn dimensions(&self) -> usize;

    /// A stable identifier for the underlying model, recorded in index
    /// snapshot sidecars for diagnostics.
    fn model_id(&self) -> &str;
}
