//! Configuration builders and fixtures for tests.
//!
//! Use [`TestConfigBuilder`] to create customised [`AppConfig`] values without
//! repeating boilerplate across crate boundaries, and [`TestConfigFile`] when
//! the code under test loads its config from disk.

use std::path::PathBuf;

use repotext_config::AppConfig;
use tempfile::TempDir;

/// Fluent builder for [`AppConfig`] in tests.
///
/// # Example
///
/// ```ignore
/// let config = TestConfigBuilder::new()
///     .exclude_extensions(&[".md"])
///     .exclude_filenames(&[])
///     .sort_entries(true)
///     .build();
/// ```
pub struct TestConfigBuilder {
    config: AppConfig,
}

impl TestConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: AppConfig::default(),
        }
    }

    /// Replace the excluded extension list.
    pub fn exclude_extensions(mut self, exts: &[&str]) -> Self {
        self.config.filter.exclude_extensions = exts.iter().map(|s| s.to_string()).collect();
        self
    }

    /// Replace the excluded filename list.
    pub fn exclude_filenames(mut self, names: &[&str]) -> Self {
        self.config.filter.exclude_filenames = names.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn sort_entries(mut self, sort: bool) -> Self {
        self.config.walk.sort_entries = sort;
        self
    }

    pub fn skip_unreadable_dirs(mut self, skip: bool) -> Self {
        self.config.walk.skip_unreadable_dirs = skip;
        self
    }

    pub fn output_file_name(mut self, name: &str) -> Self {
        self.config.output.file_name = name.to_string();
        self
    }

    pub fn api_url(mut self, url: &str) -> Self {
        self.config.github.api_url = url.to_string();
        self
    }

    pub fn listen_addr(mut self, addr: &str) -> Self {
        self.config.server.listen_addr = addr.to_string();
        self
    }

    pub fn listen_port(mut self, port: u16) -> Self {
        self.config.server.listen_port = port;
        self
    }

    pub fn log_level(mut self, level: &str) -> Self {
        self.config.logging.level = level.to_string();
        self
    }

    pub fn build(self) -> AppConfig {
        self.config
    }
}

impl Default for TestConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

/// A TOML config file inside an owned temp directory.
///
/// The directory is deleted automatically when this value is dropped,
/// guaranteeing cleanup even on panic.
pub struct TestConfigFile {
    pub path: PathBuf,
    dir: TempDir,
}

impl TestConfigFile {
    /// Write `toml_content` to `repotext.toml` in a fresh temp directory.
    pub async fn with_toml(toml_content: &str) -> Self {
        let dir = TempDir::new().expect("failed to create temp dir");
        let path = dir.path().join("repotext.toml");
        tokio::fs::write(&path, toml_content)
            .await
            .expect("failed to write test config");
        Self { path, dir }
    }

    /// The temp directory holding the config, usable for output files too.
    pub fn dir(&self) -> &std::path::Path {
        self.dir.path()
    }

    /// Load the file through the real config loader.
    pub async fn load(&self) -> AppConfig {
        AppConfig::load(&self.path)
            .await
            .expect("failed to parse test config")
    }
}
