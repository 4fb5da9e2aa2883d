#![deny(unsafe_code)]

//! repotext core: turns a GitHub repository branch into one text document.
//!
//! The pipeline walks the repository tree through a [`RepositoryHost`], drops
//! excluded files, downloads the rest in traversal order, and concatenates
//! them under `### <path>` headers. The CLI writes the result to disk; the
//! web form serves it as an attachment.

use std::future::Future;
use std::pin::Pin;

/// A type-erased, `Send`-safe, boxed future used as the return type for async
/// trait methods that require dynamic dispatch (`dyn Trait`).
///
/// Native `async fn` in traits produces opaque return types that are **not**
/// object-safe. Traits consumed via `Arc<dyn Trait>` or `&dyn Trait` must
/// return a concrete `Pin<Box<dyn Future>>` instead.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Compile-time build metadata (version, git hash, profile).
pub mod build_info;
/// Concatenator and the consolidated document.
pub mod concat;
/// One end-to-end run from URL and branch to document.
pub mod consolidate;
/// Extension and filename exclusion rule.
pub mod filter;
/// Repository host trait and the GitHub REST client.
pub mod host;
/// Progress and error sinks.
pub mod observer;
/// Atomic output file writing.
pub mod output;
/// Repository URL parsing.
pub mod repo;
/// Depth-first tree walker.
pub mod walker;
/// axum web form.
pub mod web;

pub use concat::{Concatenator, ConsolidatedDocument, DownloadError};
pub use consolidate::{ConsolidateError, ConsolidateRequest, Consolidator};
pub use filter::ExclusionRule;
pub use host::{EntryKind, GitHubHost, HostError, RemoteEntry, RepositoryHost};
pub use observer::{CollectingObserver, ErrorKind, Observer, TracingObserver};
pub use output::{OutputError, write_document};
pub use repo::{RepoUrlError, RepositoryRef};
pub use walker::{AccessError, FileDescriptor, TreeWalker, WalkOptions};
