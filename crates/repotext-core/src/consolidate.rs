//! One consolidation run: parse the URL, walk the tree, concatenate.

use tracing::info;

use repotext_config::AppConfig;

use crate::concat::{Concatenator, ConsolidatedDocument};
use crate::filter::ExclusionRule;
use crate::host::RepositoryHost;
use crate::observer::{ErrorKind, Observer};
use crate::repo::{RepoUrlError, RepositoryRef};
use crate::walker::{AccessError, TreeWalker, WalkOptions};

/// Errors that abort a run before any document exists.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConsolidateError {
    #[error("please enter both a repository URL and a branch name")]
    MissingInput,

    #[error(transparent)]
    InvalidUrl(#[from] RepoUrlError),

    #[error(transparent)]
    Access(#[from] AccessError),
}

/// The two strings a user supplies.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ConsolidateRequest {
    pub repo_url: String,
    pub branch: String,
}

impl ConsolidateRequest {
    pub fn new(repo_url: impl Into<String>, branch: impl Into<String>) -> Self {
        Self {
            repo_url: repo_url.into(),
            branch: branch.into(),
        }
    }
}

/// Runs walker and concatenator against a host with a fixed exclusion rule.
pub struct Consolidator<'a> {
    host: &'a dyn RepositoryHost,
    rule: ExclusionRule,
    options: WalkOptions,
}

impl<'a> Consolidator<'a> {
    pub fn new(host: &'a dyn RepositoryHost, rule: ExclusionRule, options: WalkOptions) -> Self {
        Self {
            host,
            rule,
            options,
        }
    }

    /// Take the exclusion rule and walk options from the loaded config.
    pub fn from_config(host: &'a dyn RepositoryHost, config: &AppConfig) -> Self {
        Self::new(
            host,
            ExclusionRule::from_config(&config.filter),
            WalkOptions::from_config(&config.walk),
        )
    }

    pub fn rule(&self) -> &ExclusionRule {
        &self.rule
    }

    /// Run one consolidation.
    ///
    /// An access failure is reported to `observer` and returned; nothing is
    /// produced. Per-file download failures only shrink the document.
    pub async fn run(
        &self,
        request: &ConsolidateRequest,
        observer: &dyn Observer,
    ) -> Result<ConsolidatedDocument, ConsolidateError> {
        if request.repo_url.trim().is_empty() || request.branch.trim().is_empty() {
            return Err(ConsolidateError::MissingInput);
        }
        let repo = RepositoryRef::parse(&request.repo_url)?;

        info!(%repo, branch = %request.branch, host = self.host.name(), "Walking repository");
        let walker = TreeWalker::new(self.host, &self.rule, self.options);
        let files = match walker.walk(&repo, &request.branch, observer).await {
            Ok(files) => files,
            Err(err) => {
                observer.on_error(ErrorKind::Access, &err.to_string());
                return Err(err.into());
            }
        };

        info!(files = files.len(), "Downloading files");
        let doc = Concatenator::new(self.host)
            .concatenate(files, observer)
            .await;
        info!(
            sections = doc.len(),
            skipped = doc.skipped(),
            bytes = doc.text().len(),
            "Consolidation finished"
        );
        Ok(doc)
    }
}
