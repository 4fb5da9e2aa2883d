//! Progress and error sinks for a consolidation run.
//!
//! The walker and concatenator never print anything themselves. They report
//! through an [`Observer`], so the CLI can log while the web form counts.

use std::fmt;
use std::sync::Mutex;

use tracing::{error, info};

/// Which stage an error notification came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    /// A repository, branch or directory listing could not be retrieved.
    Access,
    /// A single file could not be downloaded.
    Download,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ErrorKind::Access => write!(f, "access"),
            ErrorKind::Download => write!(f, "download"),
        }
    }
}

/// Receives side-channel notifications during a run.
pub trait Observer: Send + Sync {
    /// A file passed the exclusion rule and will be concatenated.
    fn on_progress(&self, path: &str);

    /// A human-readable failure.
    fn on_error(&self, kind: ErrorKind, message: &str);
}

/// Observer that forwards everything to `tracing`.
#[derive(Debug, Default, Clone, Copy)]
pub struct TracingObserver;

impl Observer for TracingObserver {
    fn on_progress(&self, path: &str) {
        info!(path, "Processing");
    }

    fn on_error(&self, kind: ErrorKind, message: &str) {
        error!(%kind, "{message}");
    }
}

#[derive(Debug, Default)]
struct Collected {
    progress: Vec<String>,
    errors: Vec<(ErrorKind, String)>,
}

/// Observer that keeps every notification and also logs it.
#[derive(Debug, Default)]
pub struct CollectingObserver {
    inner: Mutex<Collected>,
}

impl CollectingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Paths reported as processed, in order.
    pub fn progress(&self) -> Vec<String> {
        self.inner
            .lock()
            .map(|c| c.progress.clone())
            .unwrap_or_default()
    }

    /// Errors reported so far, in order.
    pub fn errors(&self) -> Vec<(ErrorKind, String)> {
        self.inner
            .lock()
            .map(|c| c.errors.clone())
            .unwrap_or_default()
    }

    /// Number of errors of the given kind.
    pub fn error_count(&self, kind: ErrorKind) -> usize {
        self.inner
            .lock()
            .map(|c| c.errors.iter().filter(|(k, _)| *k == kind).count())
            .unwrap_or(0)
    }
}

impl Observer for CollectingObserver {
    fn on_progress(&self, path: &str) {
        TracingObserver.on_progress(path);
        if let Ok(mut c) = self.inner.lock() {
            c.progress.push(path.to_string());
        }
    }

    fn on_error(&self, kind: ErrorKind, message: &str) {
        TracingObserver.on_error(kind, message);
        if let Ok(mut c) = self.inner.lock() {
            c.errors.push((kind, message.to_string()));
        }
    }
}
