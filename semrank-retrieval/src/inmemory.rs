//! In-memory vector store using cosine distance.
//!
//! This module provides [`InMemoryVectorStore`], a vector store backed by
//! insertion-ordered `Vec`s protected by a `tokio::sync::RwLock`. Insertion
//! order is what breaks distance ties during search, so it is preserved
//! across upserts and snapshot round-trips.

use std::collections::HashMap;
use std::path::Path;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::document::{Chunk, SearchResult};
use crate::error::Result;
use crate::snapshot::{self, CollectionSnapshot, IndexInfo, StoreSnapshot};
use crate::vectorstore::VectorStore;

/// One collection: chunks in insertion order plus an ID index for upserts.
#[derive(Debug, Default)]
struct Collection {
    chunks: Vec<Chunk>,
    by_id: HashMap<String, usize>,
}

impl Collection {
    fn upsert(&mut self, chunk: Chunk) {
        match self.by_id.get(&chunk.id) {
            // Replacing in place keeps the original insertion position.
            Some(&idx) => self.chunks[idx] = chunk,
            None => {
                self.by_id.insert(chunk.id.clone(), self.chunks.len());
                self.chunks.push(chunk);
            }
        }
    }
}

/// An in-memory vector store using cosine distance for search.
///
/// Lifecycle: `Empty → Built → (Saved ⇄ Loaded)`. Searching an empty store
/// returns an empty result. After a [`load`](InMemoryVectorStore::load) the
/// store is safe for concurrent readers as long as nothing writes to it.
///
/// # Example
///
/// ```rust,ignore
/// use semrank_retrieval::{InMemoryVectorStore, VectorStore};
///
/// let store = InMemoryVectorStore::new();
/// store.upsert("profiles", &chunks).await?;
/// store.save("faiss_index", "all-MiniLM-L6-v2", 384).await?;
/// ```
#[derive(Debug, Default)]
pub struct InMemoryVectorStore {
    collections: RwLock<HashMap<String, Collection>>,
    /// Collection names in creation order, for deterministic snapshots.
    order: RwLock<Vec<String>>,
}

impl InMemoryVectorStore {
    /// Create a new empty in-memory vector store.
    pub fn new() -> Self {
        Self::default()
    }

    /// Write the full store to a snapshot directory at `path`, along with an
    /// advisory sidecar recording the embedding model used to build it.
    pub async fn save(
        &self,
        path: impl AsRef<Path>,
        embedding_model: &str,
        dimensions: usize,
    ) -> Result<()> {
        let collections = self.collections.read().await;
        let order = self.order.read().await;

        let mut snapshot = StoreSnapshot { collections: Vec::new() };
        let mut counts = std::collections::BTreeMap::new();
        for name in order.iter() {
            if let Some(collection) = collections.get(name) {
                counts.insert(name.clone(), collection.chunks.len());
                snapshot.collections.push(CollectionSnapshot {
                    name: name.clone(),
                    chunks: collection.chunks.clone(),
                });
            }
        }

        let info = IndexInfo {
            embedding_model: embedding_model.to_string(),
            dimensions,
            collections: counts,
            created_at: Utc::now().to_rfc3339(),
        };

        snapshot::write_snapshot(path.as_ref(), &snapshot, &info)
    }

    /// Reconstruct a store from a snapshot directory.
    ///
    /// The result is functionally equivalent to the store that was saved,
    /// provided the same embedding model is used for subsequent queries.
    /// That match is not verified here — the sidecar records the model for
    /// diagnostics only. Missing or corrupt snapshot data is fatal to this
    /// load attempt.
    pub async fn load(path: impl AsRef<Path>) -> Result<Self> {
        let snapshot = snapshot::read_snapshot(path.as_ref())?;

        let store = Self::new();
        {
            let mut collections = store.collections.write().await;
            let mut order = store.order.write().await;
            for collection_snapshot in snapshot.collections {
                let mut collection = Collection::default();
                for chunk in collection_snapshot.chunks {
                    collection.upsert(chunk);
                }
                order.push(collection_snapshot.name.clone());
                collections.insert(collection_snapshot.name, collection);
            }
        }
        Ok(store)
    }

    /// Number of chunks stored in a collection (0 if it does not exist).
    pub async fn count(&self, collection: &str) -> usize {
        self.collections.read().await.get(collection).map_or(0, |c| c.chunks.len())
    }
}

/// Compute cosine distance (`1 − cosine similarity`) between two vectors.
///
/// Returns 1.0 (orthogonal) if either vector has zero magnitude.
fn cosine_distance(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 1.0;
    }
    1.0 - dot / (norm_a * norm_b)
}

#[async_trait]
impl VectorStore for InMemoryVectorStore {
    async fn create_collection(&self, name: &str, _dimensions: usize) -> Result<()> {
        let mut collections = self.collections.write().await;
        if !collections.contains_key(name) {
            collections.insert(name.to_string(), Collection::default());
            self.order.write().await.push(name.to_string());
        }
        Ok(())
    }

    async fn delete_collection(&self, name: &str) -> Result<()> {
        let mut collections = self.collections.write().await;
        collections.remove(name);
        self.order.write().await.retain(|n| n != name);
        Ok(())
    }

    async fn upsert(&self, collection: &str, chunks: &[Chunk]) -> Result<()> {
        let mut collections = self.collections.write().await;
        if !collections.contains_key(collection) {
            self.order.write().await.push(collection.to_string());
        }
        let store = collections.entry(collection.to_string()).or_default();
        for chunk in chunks {
            store.upsert(chunk.clone());
        }
        Ok(())
    }

    async fn search(
        &self,
        collection: &str,
        embedding: &[f32],
        k: usize,
    ) -> Result<Vec<SearchResult>> {
        let collections = self.collections.read().await;
        // An empty or unknown collection yields no matches, not an error.
        let Some(store) = collections.get(collection) else {
            return Ok(Vec::new());
        };

        let mut scored: Vec<SearchResult> = store
            .chunks
            .iter()
            .map(|chunk| SearchResult {
                chunk: chunk.clone(),
                distance: cosine_distance(&chunk.embedding, embedding),
            })
            .collect();

        // Stable sort: equal distances keep insertion order.
        scored.sort_by(|a, b| {
            a.distance.partial_cmp(&b.distance).unwrap_or(std::cmp::Ordering::Equal)
        });
        scored.truncate(k);
        Ok(scored)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cosine_distance_of_identical_vectors_is_zero() {
        let v = vec![0.6, 0.8];
        assert!(cosine_distance(&v, &v).abs() < 1e-6);
    }

    #[test]
    fn cosine_distance_of_zero_vector_is_one() {
        assert_eq!(cosine_distance(&[0.0, 0.0], &[1.0, 0.0]), 1.0);
    }

    #[tokio::test]
    async fn search_on_empty_store_returns_empty() {
        let store = InMemoryVectorStore::new();
        let results = store.search("missing", &[1.0, 0.0], 5).await.unwrap();
        assert!(results.is_empty());

        store.create_collection("empty", 2).await.unwrap();
        let results = store.search("empty", &[1.0, 0.0], 5).await.unwrap();
        assert!(results.is_empty());
    }

    #[tokio::test]
    async fn equal_distances_keep_insertion_order() {
        let store = InMemoryVectorStore::new();
        let chunk = |id: &str, embedding: Vec<f32>| Chunk {
            id: id.to_string(),
            text: id.to_string(),
            embedding,
            metadata: HashMap::new(),
            document_id: "doc".to_string(),
        };
        // b and c are the same vector, so they tie on distance.
        store
            .upsert(
                "ties",
                &[
                    chunk("a", vec![0.0, 1.0]),
                    chunk("b", vec![1.0, 0.0]),
                    chunk("c", vec![1.0, 0.0]),
                ],
            )
            .await
            .unwrap();

        let results = store.search("ties", &[1.0, 0.0], 10).await.unwrap();
        assert_eq!(results[0].chunk.id, "b");
        assert_eq!(results[1].chunk.id, "c");
        assert_eq!(results[2].chunk.id, "a");
    }

    #[tokio::test]
    async fn k_larger_than_collection_returns_whole_collection() {
        let store = InMemoryVectorStore::new();
        let chunk = Chunk {
            id: "only".to_string(),
            text: "only".to_string(),
            embedding: vec![1.0, 0.0],
            metadata: HashMap::new(),
            document_id: "doc".to_string(),
        };
        store.upsert("small", std::slice::from_ref(&chunk)).await.unwrap();
        let results = store.search("small", &[0.0, 1.0], 100).await.unwrap();
        assert_eq!(results.len(), 1);
    }
}
