//! GitHub REST API host.
//!
//! Implements [`RepositoryHost`] on top of the contents endpoint
//! (`GET /repos/{owner}/{repo}/contents/{path}?ref={branch}`) and plain GETs
//! against the `download_url` of each file. Only public repositories are
//! reachable: no token is ever sent.

use std::time::Duration;

use reqwest::header::{ACCEPT, HeaderMap, LINK, USER_AGENT};
use reqwest::{Client, RequestBuilder, Response, Url};
use serde::Deserialize;
use tracing::debug;

use repotext_config::GitHubConfig;

use crate::BoxFuture;
use crate::repo::RepositoryRef;

use super::{EntryKind, HostError, RemoteEntry, RepositoryHost};

const GITHUB_API_URL: &str = "https://api.github.com";
const GITHUB_ACCEPT: &str = "application/vnd.github+json";

/// GitHub repository host.
pub struct GitHubHost {
    client: Client,
    api_url: String,
    user_agent: String,
    timeout: Option<Duration>,
}

impl GitHubHost {
    /// Create a host talking to the public GitHub API.
    pub fn new() -> Self {
        Self {
            client: Client::new(),
            api_url: GITHUB_API_URL.to_string(),
            user_agent: crate::build_info::user_agent(),
            timeout: None,
        }
    }

    /// Build a host from the `[github]` config section.
    pub fn from_config(config: &GitHubConfig) -> Self {
        let mut host = Self::new().with_api_url(&config.api_url);
        if let Some(ref agent) = config.user_agent {
            host = host.with_user_agent(agent);
        }
        if config.timeout_secs > 0 {
            host = host.with_timeout(Duration::from_secs(config.timeout_secs));
        }
        host
    }

    /// Set a custom API base URL (GitHub Enterprise, test servers).
    pub fn with_api_url(mut self, url: impl Into<String>) -> Self {
        self.api_url = url.into();
        self
    }

    pub fn with_user_agent(mut self, agent: impl Into<String>) -> Self {
        self.user_agent = agent.into();
        self
    }

    /// Apply a per-request timeout. Without one a hung request blocks the run.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Build the contents endpoint URL for `path` on `reference`.
    fn contents_url(
        &self,
        repo: &RepositoryRef,
        path: &str,
        reference: &str,
    ) -> Result<Url, HostError> {
        let mut url = Url::parse(&self.api_url)
            .map_err(|e| HostError::Parse(format!("invalid API URL {:?}: {e}", self.api_url)))?;
        url.path_segments_mut()
            .map_err(|_| HostError::Parse(format!("API URL {:?} cannot be a base", self.api_url)))?
            .pop_if_empty()
            .extend(["repos", repo.owner.as_str(), repo.name.as_str(), "contents"])
            .extend(path.split('/').filter(|s| !s.is_empty()));
        url.query_pairs_mut().append_pair("ref", reference);
        Ok(url)
    }

    fn get(&self, url: &str) -> RequestBuilder {
        let req = self.client.get(url).header(USER_AGENT, &self.user_agent);
        match self.timeout {
            Some(timeout) => req.timeout(timeout),
            None => req,
        }
    }
}

impl Default for GitHubHost {
    fn default() -> Self {
        Self::new()
    }
}

impl RepositoryHost for GitHubHost {
    fn name(&self) -> &str {
        "GitHub"
    }

    fn list_dir<'a>(
        &'a self,
        repo: &'a RepositoryRef,
        path: &'a str,
        reference: &'a str,
    ) -> BoxFuture<'a, Result<Vec<RemoteEntry>, HostError>> {
        Box::pin(async move {
            let mut next = Some(self.contents_url(repo, path, reference)?.to_string());
            let mut entries = Vec::new();

            while let Some(url) = next.take() {
                debug!(%repo, path, reference, %url, "GitHub contents request");

                let resp = self
                    .get(&url)
                    .header(ACCEPT, GITHUB_ACCEPT)
                    .send()
                    .await
                    .map_err(|e| HostError::Network(e.to_string()))?;
                let resp = check_status(resp).await?;

                next = next_page(resp.headers());
                let body = resp
                    .text()
                    .await
                    .map_err(|e| HostError::Network(e.to_string()))?;
                entries.extend(parse_listing(&body, path)?);
            }

            Ok(entries)
        })
    }

    fn fetch_raw<'a>(&'a self, url: &'a str) -> BoxFuture<'a, Result<String, HostError>> {
        Box::pin(async move {
            debug!(url, "raw content request");

            let resp = self
                .get(url)
                .send()
                .await
                .map_err(|e| HostError::Network(e.to_string()))?;
            let resp = check_status(resp).await?;

            resp.text()
                .await
                .map_err(|e| HostError::Network(e.to_string()))
        })
    }
}

/// Map non-success statuses onto [`HostError`].
async fn check_status(resp: Response) -> Result<Response, HostError> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }

    let body = resp.text().await.unwrap_or_default();
    let message = serde_json::from_str::<GitHubErrorBody>(&body)
        .map(|e| e.message)
        .unwrap_or(body);

    Err(match status.as_u16() {
        404 => HostError::NotFound(message),
        401 | 403 | 429 => HostError::Denied(message),
        code => HostError::Status {
            status: code,
            message,
        },
    })
}

/// Extract the `rel="next"` target from a `Link` header, if any.
fn next_page(headers: &HeaderMap) -> Option<String> {
    let link = headers.get(LINK)?.to_str().ok()?;
    link.split(',').find_map(|part| {
        let (target, params) = part.split_once(';')?;
        let is_next = params
            .split(';')
            .any(|p| p.trim().eq_ignore_ascii_case("rel=\"next\""));
        if !is_next {
            return None;
        }
        let target = target.trim();
        target
            .strip_prefix('<')
            .and_then(|t| t.strip_suffix('>'))
            .map(str::to_string)
    })
}

fn parse_listing(body: &str, path: &str) -> Result<Vec<RemoteEntry>, HostError> {
    match serde_json::from_str::<ContentsResponse>(body) {
        Ok(ContentsResponse::Listing(items)) => Ok(items
            .into_iter()
            .map(|item| RemoteEntry {
                kind: EntryKind::from_type(&item.kind),
                name: item.name,
                path: item.path,
                download_url: item.download_url,
            })
            .collect()),
        Ok(ContentsResponse::Single(item)) => {
            let kind = item
                .get("type")
                .and_then(|t| t.as_str())
                .unwrap_or("file");
            Err(HostError::Parse(format!(
                "{path:?} is a {kind}, not a directory"
            )))
        }
        Err(e) => Err(HostError::Parse(e.to_string())),
    }
}

// ── GitHub API types (private) ──────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum ContentsResponse {
    Listing(Vec<ContentItem>),
    Single(serde_json::Map<String, serde_json::Value>),
}

#[derive(Debug, Deserialize)]
struct ContentItem {
    name: String,
    path: String,
    #[serde(rename = "type")]
    kind: String,
    download_url: Option<String>,
}

#[derive(Debug, Deserialize)]
struct GitHubErrorBody {
    message: String,
}
