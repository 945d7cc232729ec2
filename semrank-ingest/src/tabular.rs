//! Tabular (CSV) corpus loader.
//!
//! One row per entity. Declared text columns are composed into the logical
//! document; declared metadata columns are carried as string metadata with
//! absent values becoming empty strings rather than failing the row.

use std::collections::HashMap;
use std::path::Path;

use tracing::{info, warn};

use semrank_retrieval::Document;

use crate::error::{IngestError, Result};

/// Declares how CSV columns map onto entities.
#[derive(Debug, Clone)]
pub struct CsvMapping {
    /// Column holding the entity identifier. Rows with an empty id get a
    /// positional `row_{index}` id.
    pub id_column: String,
    /// Columns composed into the document text, in declaration order.
    pub text_columns: Vec<String>,
    /// Columns copied into metadata as strings.
    pub metadata_columns: Vec<String>,
}

/// Collapse runs of whitespace into single spaces and trim.
fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Load a corpus from a CSV file, one entity per row.
///
/// Text columns are composed as `"Header: value"` segments joined with
/// `" | "`, then whitespace-normalized — the composition used for incident
/// records. Rows whose composed text is empty are skipped with a warning,
/// as are rows the CSV parser rejects; only a file-level failure aborts.
///
/// # Errors
///
/// Returns [`IngestError::Csv`] if the file cannot be opened or its header
/// parsed, and [`IngestError::MissingColumn`] if a column named in the
/// mapping does not exist.
pub fn load_csv(path: impl AsRef<Path>, mapping: &CsvMapping) -> Result<Vec<Document>> {
    let path = path.as_ref();
    let mut reader = csv::Reader::from_path(path)?;
    let headers = reader.headers()?.clone();

    let column_index = |name: &str| -> Result<usize> {
        headers.iter().position(|h| h == name).ok_or_else(|| IngestError::MissingColumn {
            column: name.to_string(),
            path: path.to_path_buf(),
        })
    };

    let id_index = column_index(&mapping.id_column)?;
    let text_indices: Vec<(String, usize)> = mapping
        .text_columns
        .iter()
        .map(|name| column_index(name).map(|i| (name.clone(), i)))
        .collect::<Result<_>>()?;
    let metadata_indices: Vec<(String, usize)> = mapping
        .metadata_columns
        .iter()
        .map(|name| column_index(name).map(|i| (name.clone(), i)))
        .collect::<Result<_>>()?;

    let mut documents = Vec::new();
    for (row_number, record) in reader.records().enumerate() {
        let record = match record {
            Ok(record) => record,
            Err(e) => {
                warn!(row = row_number, error = %e, "skipping malformed row");
                continue;
            }
        };

        // Absent cells are carried as empty strings, never a row failure.
        let cell = |index: usize| record.get(index).unwrap_or("").trim();

        let segments: Vec<String> = text_indices
            .iter()
            .filter(|(_, index)| !cell(*index).is_empty())
            .map(|(name, index)| format!("{name}: {}", cell(*index)))
            .collect();
        let text = normalize_whitespace(&segments.join(" | "));

        if text.is_empty() {
            warn!(row = row_number, "skipping row with no text content");
            continue;
        }

        let id = match cell(id_index) {
            "" => format!("row_{row_number}"),
            value => value.to_string(),
        };

        let mut metadata = HashMap::new();
        metadata.insert("entity_id".to_string(), id.clone());
        for (name, index) in &metadata_indices {
            metadata.insert(name.clone(), cell(*index).to_string());
        }

        documents.push(Document {
            id,
            text,
            metadata,
            source_uri: Some(path.display().to_string()),
        });
    }

    info!(path = %path.display(), entity_count = documents.len(), "loaded CSV corpus");
    Ok(documents)
}
