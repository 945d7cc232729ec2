//! Corpus ingestion for semrank.
//!
//! This crate provides:
//! - Directory-tree loading (one entity per subdirectory)
//! - Tabular (CSV) loading with declared text and metadata columns
//!
//! Both loaders produce [`semrank_retrieval::Document`]s and absorb
//! per-unit failures locally: an unreadable file or malformed row is logged
//! and skipped, never aborting the batch.

mod directory;
mod error;
mod tabular;

pub use directory::load_profile_directory;
pub use error::{IngestError, Result};
pub use tabular::{CsvMapping, load_csv};
