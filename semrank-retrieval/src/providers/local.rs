//! In-process embedding provider backed by `fastembed`.
//!
//! Loads a pretrained sentence-embedding model once at construction and
//! reuses it for every chunk and every query. Only available when the
//! `local-embeddings` feature is enabled.

use std::sync::Mutex;

use async_trait::async_trait;
use fastembed::{EmbeddingModel, InitOptions, TextEmbedding};
use tracing::{debug, info};

use crate::embedding::EmbeddingProvider;
use crate::error::{Result, RetrievalError};

/// Dimensionality of the all-MiniLM-L6-v2 family.
const MINILM_DIMENSIONS: usize = 384;

/// An [`EmbeddingProvider`] running a sentence-embedding model in process.
///
/// The model weights are downloaded on first use and cached; construction
/// fails if the model cannot be loaded, which is fatal to the indexing run.
///
/// # Example
///
/// ```rust,ignore
/// use semrank_retrieval::providers::LocalEmbeddingProvider;
///
/// let provider = LocalEmbeddingProvider::all_mini_lm_l6_v2()?;
/// let embedding = provider.embed("battery storage projects").await?;
/// assert_eq!(embedding.len(), 384);
/// ```
pub struct LocalEmbeddingProvider {
    model: Mutex<TextEmbedding>,
    model_id: String,
    dimensions: usize,
}

impl LocalEmbeddingProvider {
    /// Load the all-MiniLM-L6-v2 sentence-embedding model.
    pub fn all_mini_lm_l6_v2() -> Result<Self> {
        info!(model = "all-MiniLM-L6-v2", "loading local embedding model");
        let model = TextEmbedding::try_new(
            InitOptions::new(EmbeddingModel::AllMiniLML6V2).with_show_download_progress(false),
        )
        .map_err(|e| RetrievalError::EmbeddingBackend {
            provider: "fastembed".into(),
            message: format!("failed to load model: {e}"),
        })?;

        Ok(Self {
            model: Mutex::new(model),
            model_id: "all-MiniLM-L6-v2".to_string(),
            dimensions: MINILM_DIMENSIONS,
        })
    }
}

#[async_trait]
impl EmbeddingProvider for LocalEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        let results = self.embed_batch(&[text]).await?;
        results.into_iter().next().ok_or_else(|| RetrievalError::Embedding {
            provider: "fastembed".into(),
            message: "model returned no embedding".into(),
        })
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        debug!(provider = "fastembed", batch_size = texts.len(), "embedding batch");

        let owned: Vec<String> = texts.iter().map(|t| t.to_string()).collect();
        let mut model = self.model.lock().map_err(|_| RetrievalError::EmbeddingBackend {
            provider: "fastembed".into(),
            message: "embedding model mutex poisoned".into(),
        })?;

        model.embed(owned, None).map_err(|e| RetrievalError::Embedding {
            provider: "fastembed".into(),
            message: format!("inference failed: {e}"),
        })
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
