//! In-memory repository host for tests.
//!
//! [`MemoryHost`] serves a fixed tree. Directory listings come back in the
//! order entries were added, so tests control traversal order exactly.
//! Listing and download failures can be injected per path, and every call is
//! recorded for assertions about call order.
//!
//! ```ignore
//! let host = MemoryHost::new()
//!     .file("a.txt", "A")
//!     .file("sub/b.txt", "B")
//!     .fail_download("sub/b.txt", HostError::Network("reset".into()));
//! ```

use std::collections::HashMap;
use std::sync::Mutex;

use tracing::debug;

use repotext_core::BoxFuture;
use repotext_core::host::{EntryKind, HostError, RemoteEntry, RepositoryHost};
use repotext_core::repo::RepositoryRef;

const URL_SCHEME: &str = "memory://";

/// A repository tree held in memory.
#[derive(Debug)]
pub struct MemoryHost {
    /// Directory path (`""` for the root) to its entries, in listing order.
    dirs: HashMap<String, Vec<RemoteEntry>>,
    /// Download URL to raw text.
    contents: HashMap<String, String>,
    list_failures: HashMap<String, HostError>,
    fetch_failures: HashMap<String, HostError>,
    branch: Option<String>,
    listed: Mutex<Vec<String>>,
    fetched: Mutex<Vec<String>>,
}

impl MemoryHost {
    /// An empty repository. Its root lists successfully with no entries.
    pub fn new() -> Self {
        let mut dirs = HashMap::new();
        dirs.insert(String::new(), Vec::new());
        Self {
            dirs,
            contents: HashMap::new(),
            list_failures: HashMap::new(),
            fetch_failures: HashMap::new(),
            branch: None,
            listed: Mutex::new(Vec::new()),
            fetched: Mutex::new(Vec::new()),
        }
    }

    /// Download URL the host assigns to `path`.
    pub fn url_for(path: &str) -> String {
        format!("{URL_SCHEME}{path}")
    }

    /// Add a file, creating any missing parent directories.
    pub fn file(mut self, path: &str, content: &str) -> Self {
        self.ensure_parents(path);
        let url = Self::url_for(path);
        self.push_entry(path, RemoteEntry::file(path, url.clone()));
        self.contents.insert(url, content.to_string());
        self
    }

    /// Add a file entry that exposes no download location.
    pub fn file_without_url(mut self, path: &str) -> Self {
        self.ensure_parents(path);
        let mut entry = RemoteEntry::file(path, String::new());
        entry.download_url = None;
        self.push_entry(path, entry);
        self
    }

    /// Add an empty directory.
    pub fn dir(mut self, path: &str) -> Self {
        self.ensure_parents(path);
        self.add_dir(path);
        self
    }

    /// Add an entry of some other kind, such as `symlink` or `submodule`.
    pub fn other(mut self, path: &str, kind: &str) -> Self {
        self.ensure_parents(path);
        let mut entry = RemoteEntry::dir(path);
        entry.kind = EntryKind::from_type(kind);
        self.push_entry(path, entry);
        self
    }

    /// Make listing `dir` (`""` for the root) fail with `err`.
    pub fn fail_listing(mut self, dir: &str, err: HostError) -> Self {
        self.list_failures.insert(dir.to_string(), err);
        self
    }

    /// Make downloading the file at `path` fail with `err`.
    pub fn fail_download(mut self, path: &str, err: HostError) -> Self {
        self.fetch_failures.insert(Self::url_for(path), err);
        self
    }

    /// Only answer listings for `branch`; any other branch is not found.
    pub fn only_branch(mut self, branch: &str) -> Self {
        self.branch = Some(branch.to_string());
        self
    }

    /// Directory paths listed so far, in call order.
    pub fn listed(&self) -> Vec<String> {
        self.listed.lock().expect("listed lock poisoned").clone()
    }

    /// URLs fetched so far, in call order.
    pub fn fetched(&self) -> Vec<String> {
        self.fetched.lock().expect("fetched lock poisoned").clone()
    }

    fn ensure_parents(&mut self, path: &str) {
        let mut prefix = String::new();
        let mut parts: Vec<&str> = path.split('/').collect();
        parts.pop();
        for part in parts {
            if !prefix.is_empty() {
                prefix.push('/');
            }
            prefix.push_str(part);
            self.add_dir(&prefix);
        }
    }

    fn add_dir(&mut self, path: &str) {
        if self.dirs.contains_key(path) {
            return;
        }
        self.dirs.insert(path.to_string(), Vec::new());
        self.push_entry(path, RemoteEntry::dir(path));
    }

    fn push_entry(&mut self, path: &str, entry: RemoteEntry) {
        let parent = path.rsplit_once('/').map(|(p, _)| p).unwrap_or("");
        self.dirs.entry(parent.to_string()).or_default().push(entry);
    }
}

impl Default for MemoryHost {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryHost for MemoryHost {
    fn name(&self) -> &str {
        "memory"
    }

    fn list_dir<'a>(
        &'a self,
        _repo: &'a RepositoryRef,
        path: &'a str,
        reference: &'a str,
    ) -> BoxFuture<'a, Result<Vec<RemoteEntry>, HostError>> {
        Box::pin(async move {
            self.listed
                .lock()
                .expect("listed lock poisoned")
                .push(path.to_string());

            if let Some(ref branch) = self.branch
                && branch != reference
            {
                return Err(HostError::NotFound(format!("No commit found for the ref {reference}")));
            }
            if let Some(err) = self.list_failures.get(path) {
                debug!(path, %err, "Injected listing failure");
                return Err(err.clone());
            }
            self.dirs
                .get(path)
                .cloned()
                .ok_or_else(|| HostError::NotFound(format!("no directory {path:?}")))
        })
    }

    fn fetch_raw<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<String, HostError>> {
        Box::pin(async move {
            self.fetched
                .lock()
                .expect("fetched lock poisoned")
                .push(url.to_string());

            if let Some(err) = self.fetch_failures.get(url) {
                debug!(url, %err, "Injected download failure");
                return Err(err.clone());
            }
            self.contents
                .get(url)
                .cloned()
                .ok_or_else(|| HostError::NotFound(format!("no content at {url}")))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn repo() -> RepositoryRef {
        RepositoryRef::new("octo", "demo")
    }

    #[tokio::test]
    async fn test_listing_keeps_insertion_order() {
        let host = MemoryHost::new()
            .file("z.txt", "Z")
            .file("sub/b.txt", "B")
            .file("a.txt", "A");

        let root = host.list_dir(&repo(), "", "main").await.unwrap();
        let names: Vec<&str> = root.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["z.txt", "sub", "a.txt"]);
        assert_eq!(root[1].kind, EntryKind::Dir);

        let sub = host.list_dir(&repo(), "sub", "main").await.unwrap();
        assert_eq!(sub[0].path, "sub/b.txt");
        assert_eq!(host.listed(), vec!["", "sub"]);
    }

    #[tokio::test]
    async fn test_fetch_and_injected_failures() {
        let host = MemoryHost::new()
            .file("a.txt", "A")
            .file("b.txt", "B")
            .fail_download("b.txt", HostError::Network("reset".to_string()));

        assert_eq!(host.fetch_raw(&MemoryHost::url_for("a.txt")).await.unwrap(), "A");
        assert!(host.fetch_raw(&MemoryHost::url_for("b.txt")).await.is_err());
        assert_eq!(host.fetched().len(), 2);
    }

    #[tokio::test]
    async fn test_only_branch_rejects_others() {
        let host = MemoryHost::new().file("a.txt", "A").only_branch("main");
        assert!(host.list_dir(&repo(), "", "main").await.is_ok());
        assert!(matches!(
            host.list_dir(&repo(), "", "dev").await,
            Err(HostError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_nested_parents_created_once() {
        let host = MemoryHost::new().file("a/b/c.txt", "C").file("a/d.txt", "D");
        let a = host.list_dir(&repo(), "a", "main").await.unwrap();
        let names: Vec<&str> = a.iter().map(|e| e.name.as_str()).collect();
        assert_eq!(names, vec!["b", "d.txt"]);
    }
}
