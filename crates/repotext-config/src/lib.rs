#![deny(unsafe_code)]

//! Configuration loading and validation for repotext.
//!
//! Loads TOML configuration files and validates them against expected schemas.
//! Provides the [`AppConfig`] type as the central configuration structure. Every
//! section is optional; a missing file or an empty document yields the defaults.

use std::path::Path;

use serde::{Deserialize, Serialize};

/// Errors that can occur during configuration loading and validation.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse TOML: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("validation error: {0}")]
    Validation(String),
}

/// Top-level application configuration.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// Remote repository host settings.
    #[serde(default)]
    pub github: GitHubConfig,

    /// Exclusion lists applied to every file in the tree.
    #[serde(default)]
    pub filter: FilterConfig,

    /// Traversal behaviour.
    #[serde(default)]
    pub walk: WalkConfig,

    /// Output artifact settings.
    #[serde(default)]
    pub output: OutputConfig,

    /// Web form server settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Logging configuration.
    #[serde(default)]
    pub logging: LoggingConfig,
}

/// GitHub REST API settings.
///
/// Only public repositories are reachable; no credentials are ever sent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GitHubConfig {
    /// Base URL of the REST API.
    #[serde(default = "default_api_url")]
    pub api_url: String,

    /// User-Agent header override. Defaults to `repotext/<version>`.
    #[serde(default)]
    pub user_agent: Option<String>,

    /// Per-request timeout in seconds (0 = no timeout).
    #[serde(default)]
    pub timeout_secs: u64,
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
            user_agent: None,
            timeout_secs: 0,
        }
    }
}

fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

/// Exclusion lists.
///
/// ## TOML Example
///
/// ```toml
/// [filter]
/// exclude_extensions = [".png", ".lock"]
/// exclude_filenames = ["package-lock.json"]
/// ```
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilterConfig {
    /// Path suffixes to skip (matched with `ends_with` on the full path).
    #[serde(default = "default_exclude_extensions")]
    pub exclude_extensions: Vec<String>,

    /// Bare file names to skip (exact match).
    #[serde(default = "default_exclude_filenames")]
    pub exclude_filenames: Vec<String>,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            exclude_extensions: default_exclude_extensions(),
            exclude_filenames: default_exclude_filenames(),
        }
    }
}

fn default_exclude_extensions() -> Vec<String> {
    [".png", ".jpg", ".jpeg", ".gif", ".ico", ".pdf", ".zip", ".lock"]
        .into_iter()
        .map(String::from)
        .collect()
}

fn default_exclude_filenames() -> Vec<String> {
    ["package-lock.json", "yarn.lock", "LICENSE"]
        .into_iter()
        .map(String::from)
        .collect()
}

/// Traversal behaviour.
#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct WalkConfig {
    /// Sort every directory listing by name instead of keeping the API order.
    #[serde(default)]
    pub sort_entries: bool,

    /// Report and skip subdirectories that cannot be listed instead of
    /// aborting the whole walk. The root listing is always fatal.
    #[serde(default)]
    pub skip_unreadable_dirs: bool,
}

/// Output artifact settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OutputConfig {
    /// File name of the consolidated document.
    #[serde(default = "default_output_file_name")]
    pub file_name: String,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            file_name: default_output_file_name(),
        }
    }
}

fn default_output_file_name() -> String {
    "consolidated_text.txt".to_string()
}

/// Web form server settings.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Address the web form listens on.
    #[serde(default = "default_listen_addr")]
    pub listen_addr: String,

    /// Port the web form listens on.
    #[serde(default = "default_listen_port")]
    pub listen_port: u16,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            listen_addr: default_listen_addr(),
            listen_port: default_listen_port(),
        }
    }
}

fn default_listen_addr() -> String {
    "127.0.0.1".to_string()
}

fn default_listen_port() -> u16 {
    8501
}

/// Logging configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log level filter (e.g. "info", "debug", "trace").
    #[serde(default = "default_log_level")]
    pub level: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: default_log_level(),
        }
    }
}

fn default_log_level() -> String {
    "info".to_string()
}

impl AppConfig {
    /// Load configuration from a TOML file at the given path using async I/O.
    pub async fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = tokio::fs::read_to_string(path).await?;
        Self::parse(&content)
    }

    /// Parse configuration from a TOML string.
    pub fn parse(s: &str) -> Result<Self, ConfigError> {
        let config: AppConfig = toml::from_str(s)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate the configuration.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let api_url = self.github.api_url.as_str();
        if !(api_url.starts_with("https://") || api_url.starts_with("http://")) {
            return Err(ConfigError::Validation(format!(
                "github.api_url must be an http(s) URL, got {api_url:?}"
            )));
        }
        if let Some(ref agent) = self.github.user_agent {
            if agent.trim().is_empty() {
                return Err(ConfigError::Validation(
                    "github.user_agent must not be empty when set".to_string(),
                ));
            }
        }

        // An empty pattern would match every file.
        for (i, ext) in self.filter.exclude_extensions.iter().enumerate() {
            if ext.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "filter.exclude_extensions[{i}] must not be empty"
                )));
            }
        }
        for (i, name) in self.filter.exclude_filenames.iter().enumerate() {
            if name.is_empty() {
                return Err(ConfigError::Validation(format!(
                    "filter.exclude_filenames[{i}] must not be empty"
                )));
            }
        }

        let file_name = self.output.file_name.as_str();
        if file_name.trim().is_empty() {
            return Err(ConfigError::Validation(
                "output.file_name must not be empty".to_string(),
            ));
        }
        if file_name.contains('/') || file_name.contains('\\') {
            return Err(ConfigError::Validation(format!(
                "output.file_name must be a bare file name, got {file_name:?}"
            )));
        }
        // The name is quoted into a Content-Disposition header.
        if file_name.chars().any(|c| c == '"' || c.is_ascii_control()) {
            return Err(ConfigError::Validation(format!(
                "output.file_name must not contain quotes or control characters, got {file_name:?}"
            )));
        }

        if self.server.listen_port == 0 {
            return Err(ConfigError::Validation(
                "server.listen_port must be non-zero".to_string(),
            ));
        }
        if self.server.listen_addr.is_empty() {
            return Err(ConfigError::Validation(
                "server.listen_addr must not be empty".to_string(),
            ));
        }

        let valid_levels = ["trace", "debug", "info", "warn", "error"];
        if !valid_levels.contains(&self.logging.level.as_str()) {
            return Err(ConfigError::Validation(format!(
                "logging.level must be one of {:?}, got {:?}",
                valid_levels, self.logging.level
            )));
        }

        Ok(())
    }
}
