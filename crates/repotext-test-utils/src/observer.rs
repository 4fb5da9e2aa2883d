//! Observer that records every notification in arrival order.

use std::sync::Mutex;

use repotext_core::observer::{ErrorKind, Observer};

/// One notification received by a [`RecordingObserver`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Event {
    Progress(String),
    Error(ErrorKind, String),
}

/// Keeps progress and error notifications interleaved, as they happened.
#[derive(Debug, Default)]
pub struct RecordingObserver {
    events: Mutex<Vec<Event>>,
}

impl RecordingObserver {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<Event> {
        self.events.lock().expect("events lock poisoned").clone()
    }

    /// Paths reported as processed, in order.
    pub fn progress(&self) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Progress(path) => Some(path),
                Event::Error(..) => None,
            })
            .collect()
    }

    /// Error messages of the given kind, in order.
    pub fn errors(&self, kind: ErrorKind) -> Vec<String> {
        self.events()
            .into_iter()
            .filter_map(|e| match e {
                Event::Error(k, message) if k == kind => Some(message),
                _ => None,
            })
            .collect()
    }
}

impl Observer for RecordingObserver {
    fn on_progress(&self, path: &str) {
        self.events
            .lock()
            .expect("events lock poisoned")
            .push(Event::Progress(path.to_string()));
    }

    fn on_error(&self, kind: ErrorKind, message: &str) {
        self.events
            .lock()
            .expect("events lock poisoned")
            .push(Event::Error(kind, message.to_string()));
    }
}
