//! Concatenator: downloads each file and assembles the consolidated document.
//!
//! Assembly is best effort: a file that fails to download is reported and
//! left out entirely (no header), and the remaining files still make it in.

use std::fmt::Write as _;

use tracing::debug;

use crate::host::{HostError, RepositoryHost};
use crate::observer::{ErrorKind, Observer};
use crate::walker::FileDescriptor;

/// A single file's content could not be fetched.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to download {path}: {source}")]
pub struct DownloadError {
    pub path: String,
    pub source: HostError,
}

/// The concatenated text of every downloaded file, in traversal order.
///
/// Each section is `### <path>`, a blank line, the file text, a blank line.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsolidatedDocument {
    text: String,
    paths: Vec<String>,
    skipped: usize,
    walked: usize,
}

impl ConsolidatedDocument {
    pub fn new() -> Self {
        Self::default()
    }

    /// Append one section.
    pub fn push_section(&mut self, path: &str, content: &str) {
        let _ = write!(self.text, "### {path}\n\n{content}\n\n");
        self.paths.push(path.to_string());
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn into_text(self) -> String {
        self.text
    }

    /// Paths that made it into the document, in order.
    pub fn paths(&self) -> &[String] {
        &self.paths
    }

    /// Number of sections.
    pub fn len(&self) -> usize {
        self.paths.len()
    }

    pub fn is_empty(&self) -> bool {
        self.paths.is_empty()
    }

    /// Number of files left out because their download failed.
    pub fn skipped(&self) -> usize {
        self.skipped
    }

    /// Number of files the walk handed over for download.
    ///
    /// Zero means there was nothing to consolidate. A document can be empty
    /// with a non-zero count when every download failed; that run still
    /// succeeded.
    pub fn walked(&self) -> usize {
        self.walked
    }
}

/// Downloads files through a [`RepositoryHost`] and concatenates them.
pub struct Concatenator<'a> {
    host: &'a dyn RepositoryHost,
}

impl<'a> Concatenator<'a> {
    pub fn new(host: &'a dyn RepositoryHost) -> Self {
        Self { host }
    }

    /// Fetch every file in order, one at a time, and build the document.
    pub async fn concatenate(
        &self,
        files: Vec<FileDescriptor>,
        observer: &dyn Observer,
    ) -> ConsolidatedDocument {
        let mut doc = ConsolidatedDocument::new();
        doc.walked = files.len();

        for file in files {
            let Some(url) = file.content.download_url() else {
                debug!(path = %file.path, "No download location, skipping");
                continue;
            };

            match self.host.fetch_raw(url).await {
                Ok(content) => doc.push_section(&file.path, &content),
                Err(source) => {
                    let err = DownloadError {
                        path: file.path,
                        source,
                    };
                    observer.on_error(ErrorKind::Download, &err.to_string());
                    doc.skipped += 1;
                }
            }
        }

        doc
    }
}
