//! Tree walker: enumerates every non-excluded file of a repository branch.
//!
//! Traversal is depth-first preorder and follows the order of each directory
//! listing as the host returns it, unless sorting is switched on. The walk uses
//! an explicit worklist instead of recursion, so the result is a plain owned
//! sequence built in one place.

use tracing::{debug, warn};

use repotext_config::WalkConfig;

use crate::filter::ExclusionRule;
use crate::host::{EntryKind, HostError, RemoteEntry, RepositoryHost};
use crate::observer::{ErrorKind, Observer};
use crate::repo::RepositoryRef;

/// A repository, branch or directory listing could not be retrieved.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("failed to access {repo} on branch {branch:?} at {}: {source}", display_path(.path))]
pub struct AccessError {
    pub repo: String,
    pub branch: String,
    /// Directory being listed (empty for the repository root).
    pub path: String,
    pub source: HostError,
}

fn display_path(path: &str) -> &str {
    if path.is_empty() { "the repository root" } else { path }
}

/// Lazy handle to a file's raw content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentRef {
    download_url: Option<String>,
}

impl ContentRef {
    pub fn new(download_url: Option<String>) -> Self {
        Self { download_url }
    }

    /// Where the raw bytes live, if the host exposed a location.
    pub fn download_url(&self) -> Option<&str> {
        self.download_url.as_deref()
    }
}

/// A file discovered during traversal.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FileDescriptor {
    /// Full `/`-separated path from the repository root.
    pub path: String,
    /// Bare file name.
    pub name: String,
    pub content: ContentRef,
}

/// Traversal switches from the `[walk]` config section.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct WalkOptions {
    pub sort_entries: bool,
    pub skip_unreadable_dirs: bool,
}

impl WalkOptions {
    pub fn from_config(config: &WalkConfig) -> Self {
        Self {
            sort_entries: config.sort_entries,
            skip_unreadable_dirs: config.skip_unreadable_dirs,
        }
    }
}

/// Walks a repository tree through a [`RepositoryHost`].
pub struct TreeWalker<'a> {
    host: &'a dyn RepositoryHost,
    rule: &'a ExclusionRule,
    options: WalkOptions,
}

impl<'a> TreeWalker<'a> {
    pub fn new(host: &'a dyn RepositoryHost, rule: &'a ExclusionRule, options: WalkOptions) -> Self {
        Self {
            host,
            rule,
            options,
        }
    }

    /// Enumerate every non-excluded file on `branch`.
    ///
    /// Fails if the root cannot be listed. A failing subdirectory also aborts
    /// the walk unless `skip_unreadable_dirs` is set, in which case it is
    /// reported to `observer` and its subtree is left out.
    pub async fn walk(
        &self,
        repo: &RepositoryRef,
        branch: &str,
        observer: &dyn Observer,
    ) -> Result<Vec<FileDescriptor>, AccessError> {
        let root = self.list(repo, branch, "").await?;

        // Entries waiting to be visited, each with its parent prefix. Pushed in
        // reverse so that popping yields listing order.
        let mut pending: Vec<(String, RemoteEntry)> = Vec::new();
        push_listing(&mut pending, "", root);

        let mut files = Vec::new();
        while let Some((prefix, entry)) = pending.pop() {
            let full_path = format!("{prefix}{}", entry.name);

            match entry.kind {
                EntryKind::Dir => match self.list(repo, branch, &full_path).await {
                    Ok(children) => push_listing(&mut pending, &format!("{full_path}/"), children),
                    Err(err) if self.options.skip_unreadable_dirs => {
                        warn!(path = %full_path, "Skipping unreadable directory");
                        observer.on_error(ErrorKind::Access, &err.to_string());
                    }
                    Err(err) => return Err(err),
                },
                EntryKind::File => {
                    if self.rule.is_excluded(&full_path, &entry.name) {
                        debug!(path = %full_path, "Excluded");
                        continue;
                    }
                    observer.on_progress(&full_path);
                    files.push(FileDescriptor {
                        path: full_path,
                        name: entry.name,
                        content: ContentRef::new(entry.download_url),
                    });
                }
                EntryKind::Other(ref kind) => {
                    debug!(path = %full_path, %kind, "Skipping non-file entry");
                }
            }
        }

        Ok(files)
    }

    async fn list(
        &self,
        repo: &RepositoryRef,
        branch: &str,
        path: &str,
    ) -> Result<Vec<RemoteEntry>, AccessError> {
        let mut entries = self
            .host
            .list_dir(repo, path, branch)
            .await
            .map_err(|source| AccessError {
                repo: repo.to_string(),
                branch: branch.to_string(),
                path: path.to_string(),
                source,
            })?;
        if self.options.sort_entries {
            entries.sort_by(|a, b| a.name.cmp(&b.name));
        }
        Ok(entries)
    }
}

fn push_listing(pending: &mut Vec<(String, RemoteEntry)>, prefix: &str, entries: Vec<RemoteEntry>) {
    pending.extend(entries.into_iter().rev().map(|e| (prefix.to_string(), e)));
}
