//! Directory-tree corpus loader.
//!
//! Each immediate subdirectory of the corpus root is one entity (an academic
//! profile, say). Every text-bearing file inside it is concatenated, in
//! sorted path order, into one logical document.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::{info, warn};
use walkdir::WalkDir;

use semrank_retrieval::Document;

use crate::error::{IngestError, Result};

/// File extensions treated as text-bearing.
const TEXT_EXTENSIONS: [&str; 2] = ["txt", "md"];

/// Load a corpus from a directory tree: one entity per immediate
/// subdirectory of `root`.
///
/// All `.txt`/`.md` files under an entity's directory (recursively, sorted
/// by path) are concatenated with newlines. Unreadable individual files are
/// logged and skipped — a single corrupt file never aborts the batch.
/// Entities with empty or whitespace-only content are skipped with a
/// warning and do not enter the corpus.
///
/// # Errors
///
/// Returns [`IngestError::InvalidRoot`] if `root` is missing or not a
/// directory.
pub fn load_profile_directory(root: impl AsRef<Path>) -> Result<Vec<Document>> {
    let root = root.as_ref();
    if !root.is_dir() {
        return Err(IngestError::InvalidRoot(root.to_path_buf()));
    }

    let mut entity_dirs: Vec<PathBuf> = fs::read_dir(root)?
        .filter_map(std::result::Result::ok)
        .map(|entry| entry.path())
        .filter(|path| path.is_dir())
        .collect();
    entity_dirs.sort();

    let mut documents = Vec::new();
    for dir in entity_dirs {
        let Some(entity_id) = dir.file_name().and_then(|n| n.to_str()).map(str::to_string) else {
            warn!(path = %dir.display(), "skipping directory with non-UTF-8 name");
            continue;
        };

        let mut files: Vec<PathBuf> = WalkDir::new(&dir)
            .into_iter()
            .filter_map(std::result::Result::ok)
            .filter(|entry| entry.file_type().is_file())
            .filter(|entry| {
                entry
                    .path()
                    .extension()
                    .and_then(|ext| ext.to_str())
                    .is_some_and(|ext| TEXT_EXTENSIONS.contains(&ext))
            })
            .map(|entry| entry.into_path())
            .collect();
        files.sort();

        let mut text = String::new();
        for file in &files {
            match fs::read_to_string(file) {
                Ok(content) => {
                    text.push_str(&content);
                    text.push('\n');
                }
                Err(e) => {
                    warn!(file = %file.display(), error = %e, "skipping unreadable file");
                }
            }
        }

        if text.trim().is_empty() {
            warn!(entity = %entity_id, "no content found, skipping entity");
            continue;
        }

        let mut metadata = HashMap::new();
        metadata.insert("entity_id".to_string(), entity_id.clone());

        info!(entity = %entity_id, file_count = files.len(), "loaded profile");
        documents.push(Document {
            id: entity_id,
            text,
            metadata,
            source_uri: Some(dir.display().to_string()),
        });
    }

    info!(root = %root.display(), entity_count = documents.len(), "loaded profile directory");
    Ok(documents)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn loads_one_document_per_subdirectory() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("member1")).unwrap();
        fs::create_dir_all(root.join("member2")).unwrap();

        fs::write(root.join("member1/project.txt"), "solar panel research").unwrap();
        fs::write(root.join("member1/interests.md"), "energy storage").unwrap();
        fs::write(root.join("member2/bio.txt"), "battery chemistry").unwrap();

        let documents = load_profile_directory(root).unwrap();
        assert_eq!(documents.len(), 2);
        assert_eq!(documents[0].id, "member1");
        // Files are concatenated in sorted path order, newline-separated.
        assert_eq!(documents[0].text, "energy storage\nsolar panel research\n");
        assert_eq!(documents[1].id, "member2");
        assert_eq!(documents[1].metadata.get("entity_id").map(String::as_str), Some("member2"));
    }

    #[test]
    fn skips_entities_with_no_content() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("empty_member")).unwrap();
        fs::create_dir_all(root.join("blank_member")).unwrap();
        fs::create_dir_all(root.join("real_member")).unwrap();
        fs::write(root.join("blank_member/notes.txt"), "   \n\t ").unwrap();
        fs::write(root.join("real_member/notes.txt"), "actual content").unwrap();

        let documents = load_profile_directory(root).unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].id, "real_member");
    }

    #[test]
    fn ignores_non_text_files() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        fs::create_dir_all(root.join("member")).unwrap();
        fs::write(root.join("member/profile.txt"), "text content").unwrap();
        fs::write(root.join("member/photo.jpg"), [0xff, 0xd8, 0xff]).unwrap();

        let documents = load_profile_directory(root).unwrap();
        assert_eq!(documents.len(), 1);
        assert_eq!(documents[0].text, "text content\n");
    }

    #[test]
    fn missing_root_is_an_error() {
        let temp = tempfile::tempdir().unwrap();
        let missing = temp.path().join("does_not_exist");
        assert!(matches!(
            load_profile_directory(&missing),
            Err(IngestError::InvalidRoot(_))
        ));
    }

    #[test]
    fn files_directly_in_root_are_not_entities() {
        let temp = tempfile::tempdir().unwrap();
        let root = temp.path();
        fs::write(root.join("stray.txt"), "not an entity").unwrap();
        let documents = load_profile_directory(root).unwrap();
        assert!(documents.is_empty());
    }
}
