//! On-disk snapshot layout for the in-memory vector store.
//!
//! A snapshot is a directory holding two files:
//!
//! - `store.json` — every collection with its chunks in insertion order.
//!   Required for [`InMemoryVectorStore::load`](crate::InMemoryVectorStore::load).
//! - `index_info.json` — advisory sidecar recording the embedding model,
//!   dimensions, record counts, and creation timestamp. Consumed for
//!   diagnostics only; never required for a load to succeed.

use std::collections::BTreeMap;
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::document::Chunk;
use crate::error::{Result, RetrievalError};

/// File name of the serialized store inside a snapshot directory.
pub const STORE_FILE: &str = "store.json";

/// File name of the advisory sidecar inside a snapshot directory.
pub const INFO_FILE: &str = "index_info.json";

/// The full serialized contents of a vector store.
#[derive(Debug, Serialize, Deserialize)]
pub struct StoreSnapshot {
    /// Collections in creation order; chunk order within each collection is
    /// insertion order.
    pub collections: Vec<CollectionSnapshot>,
}

/// One named collection and its chunks.
#[derive(Debug, Serialize, Deserialize)]
pub struct CollectionSnapshot {
    /// Collection name.
    pub name: String,
    /// Stored chunks with embeddings, in insertion order.
    pub chunks: Vec<Chunk>,
}

/// Advisory metadata written next to the store snapshot.
///
/// The embedding model recorded here is informational: `load` does not verify
/// it. Supplying a different model at reload time silently produces
/// meaningless similarity scores, so keeping them in sync is the caller's
/// responsibility.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IndexInfo {
    /// Identifier of the embedding model used to build the index.
    pub embedding_model: String,
    /// Embedding dimensionality.
    pub dimensions: usize,
    /// Record count per collection.
    pub collections: BTreeMap<String, usize>,
    /// RFC3339 creation timestamp.
    pub created_at: String,
}

/// Write a snapshot (store plus sidecar) to `path`, creating the directory
/// if needed.
pub fn write_snapshot(path: &Path, snapshot: &StoreSnapshot, info: &IndexInfo) -> Result<()> {
    fs::create_dir_all(path)
        .map_err(|e| RetrievalError::Snapshot(format!("failed to create {}: {e}", path.display())))?;

    let store_json = serde_json::to_string(snapshot)
        .map_err(|e| RetrievalError::Snapshot(format!("failed to serialize store: {e}")))?;
    fs::write(path.join(STORE_FILE), store_json)
        .map_err(|e| RetrievalError::Snapshot(format!("failed to write {STORE_FILE}: {e}")))?;

    let info_json = serde_json::to_string_pretty(info)
        .map_err(|e| RetrievalError::Snapshot(format!("failed to serialize sidecar: {e}")))?;
    fs::write(path.join(INFO_FILE), info_json)
        .map_err(|e| RetrievalError::Snapshot(format!("failed to write {INFO_FILE}: {e}")))?;

    Ok(())
}

/// Read the store snapshot from `path`. Missing or corrupt data is a fatal
/// error for this load attempt; the caller decides whether to rebuild.
pub fn read_snapshot(path: &Path) -> Result<StoreSnapshot> {
    let store_path = path.join(STORE_FILE);
    let data = fs::read_to_string(&store_path).map_err(|e| {
        RetrievalError::Snapshot(format!("failed to read {}: {e}", store_path.display()))
    })?;
    serde_json::from_str(&data)
        .map_err(|e| RetrievalError::Snapshot(format!("corrupt snapshot {STORE_FILE}: {e}")))
}

/// Read the advisory sidecar, if present. A missing sidecar is not an error.
pub fn read_info(path: &Path) -> Result<Option<IndexInfo>> {
    let info_path = path.join(INFO_FILE);
    if !info_path.exists() {
        return Ok(None);
    }
    let data = fs::read_to_string(&info_path).map_err(|e| {
        RetrievalError::Snapshot(format!("failed to read {}: {e}", info_path.display()))
    })?;
    let info = serde_json::from_str(&data)
        .map_err(|e| RetrievalError::Snapshot(format!("corrupt sidecar {INFO_FILE}: {e}")))?;
    Ok(Some(info))
}
