#![deny(unsafe_code)]

//! Shared test utilities for the repotext workspace.
//!
//! Provides an in-memory repository host, a recording observer, config
//! builders, and tracing helpers so that individual crate tests stay concise
//! and consistent.
//!
//! Add this crate as a `[dev-dependency]` in any workspace member:
//!
//! ```toml
//! [dev-dependencies]
//! repotext-test-utils = { workspace = true }
//! ```

pub mod config;
pub mod host;
pub mod observer;
pub mod tracing_setup;

pub use config::{TestConfigBuilder, TestConfigFile};
pub use host::MemoryHost;
pub use observer::{Event, RecordingObserver};
