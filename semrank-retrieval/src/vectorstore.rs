//! Vector store trait for storing and searching vector embeddings.

use async_trait::async_trait;

use crate::document::{Chunk, SearchResult};
use crate::error::Result;

/// A storage backend for vector embeddings with nearest-neighbor search.
///
/// Implementations manage named collections of [`Chunk`]s. The core use case
/// is rebuild-on-change: a collection is bulk-loaded once and then queried;
/// no incremental upsert path is required beyond re-running the bulk load.
///
/// # Example
///
/// ```rust,ignore
/// use semrank_retrieval::{VectorStore, InMemoryVectorStore};
///
/// let store = InMemoryVectorStore::new();
/// store.create_collection("profiles", 384).await?;
/// store.upsert("profiles", &chunks).await?;
/// let results = store.search("profiles", &query_embedding, 20).await?;
/// ```
#[async_trait]
pub trait VectorStore: Send + Sync {
    /// Create a named collection. No-op if it already exists.
    async fn create_collection(&self, name: &str, dimensions: usize) -> Result<()>;

    /// Delete a named collection and all its data. No-op if it does not exist.
    async fn delete_collection(&self, name: &str) -> Result<()>;

    /// Bulk-load chunks into a collection, creating it if needed. Chunks must
    /// have embeddings set; a chunk with an already-stored ID replaces the
    /// stored one in place.
    async fn upsert(&self, collection: &str, chunks: &[Chunk]) -> Result<()>;

    /// Return the `k` nearest stored chunks to the given embedding, ordered
    /// by ascending distance (nearest first). Ties are broken by insertion
    /// order. `k` larger than the collection returns the whole collection;
    /// an empty or unknown collection returns an empty result, not an error.
    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        k: usize,
    ) -> Result<Vec<SearchResult>>;
}
