//! # semrank-retrieval
//!
//! The retrieval-and-ranking core of semrank: documents are chunked,
//! embedded into a vector space, indexed, retrieved by semantic similarity,
//! and aggregated into a per-entity ranking.
//!
//! ## Overview
//!
//! - [`Document`] / [`Chunk`] / [`SearchResult`] — the data model
//! - [`Chunker`] with [`FixedSizeChunker`] and [`RecursiveChunker`]
//! - [`EmbeddingProvider`] — injected embedding backend
//!   ([`providers::HttpEmbeddingProvider`], and
//!   `providers::LocalEmbeddingProvider` behind the `local-embeddings`
//!   feature)
//! - [`VectorStore`] with [`InMemoryVectorStore`] and snapshot persistence
//! - [`rank_matches`] / [`RankedProfile`] — per-entity aggregation
//! - [`MatchPipeline`] — the orchestrator exposing `rank(query, k)`
//!
//! ## Quick start
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use semrank_retrieval::{
//!     InMemoryVectorStore, MatchConfig, MatchPipeline, RecursiveChunker,
//! };
//!
//! let config = MatchConfig::default();
//! let pipeline = MatchPipeline::builder()
//!     .config(config.clone())
//!     .embedding_provider(Arc::new(provider))
//!     .vector_store(Arc::new(InMemoryVectorStore::new()))
//!     .chunker(Arc::new(RecursiveChunker::new(config.chunk_size, config.chunk_overlap)?))
//!     .build()?;
//!
//! pipeline.index_corpus("profiles", &documents).await?;
//! for profile in pipeline.rank("profiles", "battery storage projects", 20).await? {
//!     println!("{}: {:.2}%", profile.entity_id, profile.match_score_percent);
//! }
//! ```

pub mod chunking;
pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod inmemory;
pub mod pipeline;
pub mod providers;
pub mod ranking;
pub mod snapshot;
pub mod vectorstore;

pub use chunking::{Chunker, FixedSizeChunker, RecursiveChunker};
pub use config::{MatchConfig, MatchConfigBuilder};
pub use document::{Chunk, Document, SearchResult};
pub use embedding::EmbeddingProvider;
pub use error::{Result, RetrievalError};
pub use inmemory::InMemoryVectorStore;
pub use pipeline::{MatchPipeline, MatchPipelineBuilder};
pub use ranking::{RankedProfile, rank_matches};
pub use snapshot::IndexInfo;
pub use vectorstore::VectorStore;
