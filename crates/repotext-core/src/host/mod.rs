//! Repository host integration: directory listings and raw file downloads.
//!
//! The walker and concatenator only ever talk to a [`RepositoryHost`]. Two
//! capabilities are needed from it:
//!
//! - **list directory at ref**: the entries of one directory on a branch
//! - **fetch raw content by URL**: the text behind an entry's download URL
//!
//! ```text
//! ┌────────────┐   list_dir    ┌────────────────┐
//! │ TreeWalker │──────────────▶│                │
//! └────────────┘               │ RepositoryHost │  (trait)
//! ┌──────────────┐  fetch_raw  │                │
//! │ Concatenator │────────────▶│                │
//! └──────────────┘             └───────┬────────┘
//!                                      ▼
//!                              ┌──────────────┐
//!                              │  GitHubHost  │
//!                              │  (REST API)  │
//!                              └──────────────┘
//! ```

pub mod github;

pub use github::GitHubHost;

use std::fmt;

use crate::BoxFuture;
use crate::repo::RepositoryRef;

/// Errors from repository host calls.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum HostError {
    #[error("not found: {0}")]
    NotFound(String),

    #[error("access denied (private repository or rate limit): {0}")]
    Denied(String),

    #[error("host returned {status}: {message}")]
    Status { status: u16, message: String },

    #[error("network error: {0}")]
    Network(String),

    #[error("response parse error: {0}")]
    Parse(String),
}

/// Kind of a directory listing entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EntryKind {
    File,
    Dir,
    /// Symlinks, submodules and anything else the host reports.
    Other(String),
}

impl EntryKind {
    /// Map the host's type string onto an entry kind.
    pub fn from_type(kind: &str) -> Self {
        match kind {
            "file" => EntryKind::File,
            "dir" => EntryKind::Dir,
            other => EntryKind::Other(other.to_string()),
        }
    }
}

impl fmt::Display for EntryKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            EntryKind::File => write!(f, "file"),
            EntryKind::Dir => write!(f, "dir"),
            EntryKind::Other(kind) => write!(f, "{kind}"),
        }
    }
}

/// One entry of a directory listing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteEntry {
    /// Bare name (last path component).
    pub name: String,
    /// Path from the repository root, as reported by the host.
    pub path: String,
    pub kind: EntryKind,
    /// Raw content location. Directories and some special files have none.
    pub download_url: Option<String>,
}

impl RemoteEntry {
    pub fn file(path: impl Into<String>, download_url: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            name: base_name(&path).to_string(),
            path,
            kind: EntryKind::File,
            download_url: Some(download_url.into()),
        }
    }

    pub fn dir(path: impl Into<String>) -> Self {
        let path = path.into();
        Self {
            name: base_name(&path).to_string(),
            path,
            kind: EntryKind::Dir,
            download_url: None,
        }
    }
}

fn base_name(path: &str) -> &str {
    path.rsplit('/').next().unwrap_or(path)
}

/// Core trait for repository hosts.
///
/// Implementations must be `Send + Sync` so one host can back the web form's
/// shared state. Uses `BoxFuture` for object safety (allows `&dyn RepositoryHost`).
pub trait RepositoryHost: Send + Sync {
    /// Host display name (e.g. "GitHub").
    fn name(&self) -> &str;

    /// List the entries of the directory at `path` (empty = root) on `reference`.
    fn list_dir<'a>(
        &'a self,
        repo: &'a RepositoryRef,
        path: &'a str,
        reference: &'a str,
    ) -> BoxFuture<'a, Result<Vec<RemoteEntry>, HostError>>;

    /// Download the raw content at `url` and decode it as text.
    fn fetch_raw<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<String, HostError>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_entry_kind_from_type() {
        assert_eq!(EntryKind::from_type("file"), EntryKind::File);
        assert_eq!(EntryKind::from_type("dir"), EntryKind::Dir);
        assert_eq!(
            EntryKind::from_type("submodule"),
            EntryKind::Other("submodule".to_string())
        );
    }

    #[test]
    fn test_entry_constructors_derive_name() {
        let file = RemoteEntry::file("src/lib.rs", "https://raw.example/src/lib.rs");
        assert_eq!(file.name, "lib.rs");
        assert_eq!(file.kind, EntryKind::File);

        let dir = RemoteEntry::dir("src");
        assert_eq!(dir.name, "src");
        assert!(dir.download_url.is_none());
    }

    #[test]
    fn test_host_error_display() {
        let err = HostError::Status {
            status: 500,
            message: "boom".to_string(),
        };
        assert_eq!(err.to_string(), "host returned 500: boom");
    }
}
