//! Writing the consolidated document to disk.
//!
//! The document is staged in a temporary file next to the destination and
//! renamed into place, so readers never see a half-written file. The staged
//! file is removed on every failure path.

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::concat::ConsolidatedDocument;

/// Errors from writing the output file.
#[derive(Debug, thiserror::Error)]
pub enum OutputError {
    #[error("failed to stage output in {dir}: {source}")]
    Stage {
        dir: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to write staged output: {0}")]
    Write(#[from] std::io::Error),

    #[error("failed to move output into place at {path}: {source}")]
    Persist {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Write `doc` to `dest` as UTF-8, replacing any existing file.
pub fn write_document(doc: &ConsolidatedDocument, dest: &Path) -> Result<(), OutputError> {
    let dir = match dest.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut staged = tempfile::Builder::new()
        .prefix(".repotext-")
        .suffix(".tmp")
        .tempfile_in(dir)
        .map_err(|source| OutputError::Stage {
            dir: dir.to_path_buf(),
            source,
        })?;

    staged.write_all(doc.text().as_bytes())?;
    staged.as_file().sync_all()?;

    staged.persist(dest).map_err(|e| OutputError::Persist {
        path: dest.to_path_buf(),
        source: e.error,
    })?;

    info!(path = %dest.display(), bytes = doc.text().len(), "Wrote consolidated document");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use tempfile::TempDir;

    fn sample() -> ConsolidatedDocument {
        let mut doc = ConsolidatedDocument::new();
        doc.push_section("a.txt", "A");
        doc
    }

    fn dir_entries(dir: &Path) -> Vec<String> {
        let mut names: Vec<String> = std::fs::read_dir(dir)
            .unwrap()
            .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
            .collect();
        names.sort();
        names
    }

    #[test]
    fn test_write_document_leaves_only_destination() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("consolidated_text.txt");

        write_document(&sample(), &dest).unwrap();

        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "### a.txt\n\nA\n\n");
        assert_eq!(dir_entries(tmp.path()), vec!["consolidated_text.txt"]);
    }

    #[test]
    fn test_write_document_replaces_existing_file() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("out.txt");
        std::fs::write(&dest, "stale").unwrap();

        write_document(&sample(), &dest).unwrap();

        assert_eq!(std::fs::read_to_string(&dest).unwrap(), "### a.txt\n\nA\n\n");
        assert_eq!(dir_entries(tmp.path()), vec!["out.txt"]);
    }

    #[test]
    fn test_write_document_missing_directory() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("missing").join("out.txt");

        let err = write_document(&sample(), &dest).unwrap_err();
        assert!(matches!(err, OutputError::Stage { .. }));
        assert!(dir_entries(tmp.path()).is_empty());
    }

    #[test]
    fn test_write_document_into_directory_path_cleans_up() {
        let tmp = TempDir::new().unwrap();
        let dest = tmp.path().join("taken");
        std::fs::create_dir(&dest).unwrap();
        std::fs::write(dest.join("keep.txt"), "x").unwrap();

        let err = write_document(&sample(), &dest).unwrap_err();
        assert!(matches!(err, OutputError::Persist { .. }));
        assert_eq!(dir_entries(tmp.path()), vec!["taken"]);
    }
}
