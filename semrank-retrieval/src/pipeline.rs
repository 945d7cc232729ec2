//! Match pipeline orchestrator.
//!
//! The [`MatchPipeline`] coordinates the full index-and-rank workflow by
//! composing an [`EmbeddingProvider`], a [`VectorStore`], and a [`Chunker`].
//! All collaborators are injected at construction; the pipeline never
//! reaches for global state.
//!
//! # Example
//!
//! ```rust,ignore
//! use semrank_retrieval::{MatchPipeline, MatchConfig, InMemoryVectorStore, RecursiveChunker};
//!
//! let pipeline = MatchPipeline::builder()
//!     .config(MatchConfig::default())
//!     .embedding_provider(Arc::new(my_embedder))
//!     .vector_store(Arc::new(InMemoryVectorStore::new()))
//!     .chunker(Arc::new(RecursiveChunker::new(1000, 200)?))
//!     .build()?;
//!
//! pipeline.index_corpus("profiles", &documents).await?;
//! let ranked = pipeline.rank("profiles", "battery storage projects", 20).await?;
//! ```

use std::sync::Arc;

use tracing::{error, info, warn};

use crate::chunking::Chunker;
use crate::config::MatchConfig;
use crate::document::{Chunk, Document, SearchResult};
use crate::embedding::EmbeddingProvider;
use crate::error::{Result, RetrievalError};
use crate::ranking::{RankedProfile, rank_matches};
use crate::vectorstore::VectorStore;

/// The match pipeline orchestrator.
///
/// Coordinates corpus indexing (chunk → embed → store) and querying
/// (embed → search → group-and-rank). Construct one via
/// [`MatchPipeline::builder()`].
pub struct MatchPipeline {
    config: MatchConfig,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStore>,
    chunker: Arc<dyn Chunker>,
}

impl MatchPipeline {
    /// Create a new [`MatchPipelineBuilder`].
    pub fn builder() -> MatchPipelineBuilder {
        MatchPipelineBuilder::default()
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &MatchConfig {
        &self.config
    }

    /// Return a reference to the embedding provider.
    pub fn embedding_provider(&self) -> &Arc<dyn EmbeddingProvider> {
        &self.embedding_provider
    }

    /// Return a reference to the vector store.
    pub fn vector_store(&self) -> &Arc<dyn VectorStore> {
        &self.vector_store
    }

    /// Create a named collection in the vector store.
    ///
    /// The collection is created with the dimensionality reported by the
    /// configured [`EmbeddingProvider`].
    pub async fn create_collection(&self, name: &str) -> Result<()> {
        let dimensions = self.embedding_provider.dimensions();
        self.vector_store.create_collection(name, dimensions).await.map_err(|e| {
            error!(collection = name, error = %e, "failed to create collection");
            RetrievalError::Pipeline(format!("failed to create collection '{name}': {e}"))
        })
    }

    /// Delete a named collection from the vector store.
    pub async fn delete_collection(&self, name: &str) -> Result<()> {
        self.vector_store.delete_collection(name).await.map_err(|e| {
            error!(collection = name, error = %e, "failed to delete collection");
            RetrievalError::Pipeline(format!("failed to delete collection '{name}': {e}"))
        })
    }

    /// Index a single document: chunk → embed → store.
    ///
    /// A chunk whose embedding fails is dropped with a warning; the rest of
    /// the document is still indexed. Returns the chunks that were stored
    /// (with embeddings attached).
    ///
    /// # Errors
    ///
    /// Returns [`RetrievalError::EmbeddingBackend`] if the embedding backend
    /// is unavailable entirely, or [`RetrievalError::Pipeline`] if storage
    /// fails.
    pub async fn index_document(&self, collection: &str, document: &Document) -> Result<Vec<Chunk>> {
        // 1. Chunk the document
        let mut chunks = self.chunker.chunk(document);
        if chunks.is_empty() {
            info!(document.id = %document.id, chunk_count = 0, "indexed document (empty)");
            return Ok(chunks);
        }

        // 2. Embed the chunk texts, dropping per-chunk failures
        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        match self.embedding_provider.embed_batch(&texts).await {
            Ok(embeddings) => {
                for (chunk, embedding) in chunks.iter_mut().zip(embeddings) {
                    chunk.embedding = embedding;
                }
            }
            Err(e @ RetrievalError::EmbeddingBackend { .. }) => {
                error!(document.id = %document.id, error = %e, "embedding backend unavailable");
                return Err(e);
            }
            Err(e) => {
                // The batch failed on some item; retry chunk by chunk so one
                // bad chunk does not take the document down with it.
                warn!(document.id = %document.id, error = %e, "batch embedding failed, retrying per chunk");
                chunks = self.embed_individually(document, chunks).await?;
            }
        }

        if chunks.is_empty() {
            warn!(document.id = %document.id, "no chunks survived embedding");
            return Ok(chunks);
        }

        // 3. Store
        self.vector_store.upsert(collection, &chunks).await.map_err(|e| {
            error!(document.id = %document.id, error = %e, "upsert failed during indexing");
            RetrievalError::Pipeline(format!("upsert failed for document '{}': {e}", document.id))
        })?;

        let chunk_count = chunks.len();
        info!(document.id = %document.id, chunk_count, "indexed document");

        Ok(chunks)
    }

    /// Embed chunks one at a time, dropping any chunk that fails with a
    /// per-item error. Backend unavailability still aborts.
    async fn embed_individually(
        &self,
        document: &Document,
        chunks: Vec<Chunk>,
    ) -> Result<Vec<Chunk>> {
        let mut kept = Vec::with_capacity(chunks.len());
        for mut chunk in chunks {
            match self.embedding_provider.embed(&chunk.text).await {
                Ok(embedding) => {
                    chunk.embedding = embedding;
                    kept.push(chunk);
                }
                Err(e @ RetrievalError::EmbeddingBackend { .. }) => {
                    error!(document.id = %document.id, error = %e, "embedding backend unavailable");
                    return Err(e);
                }
                Err(e) => {
                    warn!(chunk.id = %chunk.id, error = %e, "dropping chunk, embedding failed");
                }
            }
        }
        Ok(kept)
    }

    /// Index a whole corpus through the chunk → embed → store workflow.
    ///
    /// This is the rebuild-on-change bulk path: the corpus is indexed
    /// sequentially, and documents producing zero chunks are skipped without
    /// failing the batch. Returns the total number of chunks stored.
    pub async fn index_corpus(&self, collection: &str, documents: &[Document]) -> Result<usize> {
        let mut total = 0;
        for document in documents {
            total += self.index_document(collection, document).await?.len();
        }
        info!(collection, document_count = documents.len(), chunk_count = total, "indexed corpus");
        Ok(total)
    }

    /// Query a collection: embed the query text, then return the `k`
    /// nearest stored chunks ordered by ascending distance.
    ///
    /// An empty collection yields an empty result, not an error.
    pub async fn query(&self, collection: &str, query: &str, k: usize) -> Result<Vec<SearchResult>> {
        let query_embedding = self.embedding_provider.embed(query).await.map_err(|e| {
            error!(error = %e, "embedding failed during query");
            RetrievalError::Pipeline(format!("query embedding failed: {e}"))
        })?;

        let results =
            self.vector_store.search(collection, &query_embedding, k).await.map_err(|e| {
                error!(collection, error = %e, "vector store search failed");
                RetrievalError::Pipeline(format!("search failed in collection '{collection}': {e}"))
            })?;

        info!(collection, result_count = results.len(), "query completed");
        Ok(results)
    }

    /// Rank entities for a query: retrieve the `k` nearest chunks, group
    /// them by parent entity, and order entities by mean similarity,
    /// descending.
    ///
    /// This is the entry point the rest of the system depends on. An empty
    /// corpus returns an empty sequence.
    pub async fn rank(&self, collection: &str, query: &str, k: usize) -> Result<Vec<RankedProfile>> {
        let results = self.query(collection, query, k).await?;
        Ok(rank_matches(&results))
    }
}

/// Builder for constructing a [`MatchPipeline`].
///
/// All fields are required. Call [`build()`](MatchPipelineBuilder::build)
/// to validate and produce the pipeline.
#[derive(Default)]
pub struct MatchPipelineBuilder {
    config: Option<MatchConfig>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    vector_store: Option<Arc<dyn VectorStore>>,
    chunker: Option<Arc<dyn Chunker>>,
}

impl MatchPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: MatchConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the vector store backend.
    pub fn vector_store(mut self, store: Arc<dyn VectorStore>) -> Self {
        self.vector_store = Some(store);
        self
    }

    /// Set the document chunker.
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Build the [`MatchPipeline`], validating that all required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`RetrievalError::Config`] if any required field is missing.
    pub fn build(self) -> Result<MatchPipeline> {
        let config = self
            .config
            .ok_or_else(|| RetrievalError::Config("config is required".to_string()))?;
        let embedding_provider = self
            .embedding_provider
            .ok_or_else(|| RetrievalError::Config("embedding_provider is required".to_string()))?;
        let vector_store = self
            .vector_store
            .ok_or_else(|| RetrievalError::Config("vector_store is required".to_string()))?;
        let chunker = self
            .chunker
            .ok_or_else(|| RetrievalError::Config("chunker is required".to_string()))?;

        Ok(MatchPipeline { config, embedding_provider, vector_store, chunker })
    }
}
