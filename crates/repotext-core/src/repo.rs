//! Repository identifiers parsed from user-supplied URLs.

use std::fmt;

/// Errors from parsing a repository URL.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RepoUrlError {
    #[error("repository URL is empty")]
    Empty,

    #[error("repository URL {0:?} must end in <owner>/<repo>")]
    MissingSegments(String),
}

/// Owner and name of a hosted repository.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RepositoryRef {
    pub owner: String,
    pub name: String,
}

impl RepositoryRef {
    pub fn new(owner: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            owner: owner.into(),
            name: name.into(),
        }
    }

    /// Parse `.../<owner>/<repo>` by taking the last two `/`-separated segments.
    ///
    /// Trailing slashes and a trailing `.git` are ignored. Anything before the
    /// last two segments (scheme, host, deeper paths) is not inspected.
    pub fn parse(url: &str) -> Result<Self, RepoUrlError> {
        let trimmed = url.trim().trim_end_matches('/');
        if trimmed.is_empty() {
            return Err(RepoUrlError::Empty);
        }

        let mut segments = trimmed.rsplit('/');
        let name = segments.next().unwrap_or_default();
        let name = name.strip_suffix(".git").unwrap_or(name);
        let owner = segments.next().unwrap_or_default();

        if owner.is_empty() || name.is_empty() || owner.ends_with(':') {
            return Err(RepoUrlError::MissingSegments(url.to_string()));
        }

        Ok(Self::new(owner, name))
    }
}

impl fmt::Display for RepositoryRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.owner, self.name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_parse_full_url() {
        let repo = RepositoryRef::parse("https://github.com/rust-lang/cargo").unwrap();
        assert_eq!(repo, RepositoryRef::new("rust-lang", "cargo"));
        assert_eq!(repo.to_string(), "rust-lang/cargo");
    }

    #[test]
    fn test_parse_trailing_slash_and_git_suffix() {
        let repo = RepositoryRef::parse("https://github.com/tokio-rs/tokio.git/").unwrap();
        assert_eq!(repo, RepositoryRef::new("tokio-rs", "tokio"));
    }

    #[test]
    fn test_parse_short_form() {
        let repo = RepositoryRef::parse("serde-rs/serde").unwrap();
        assert_eq!(repo, RepositoryRef::new("serde-rs", "serde"));
    }

    #[test]
    fn test_parse_only_last_two_segments_are_read() {
        let repo = RepositoryRef::parse("https://github.com/a/b/tree/main").unwrap();
        assert_eq!(repo, RepositoryRef::new("tree", "main"));
    }

    #[test]
    fn test_parse_rejects_empty() {
        assert_eq!(RepositoryRef::parse("   "), Err(RepoUrlError::Empty));
        assert_eq!(RepositoryRef::parse("///"), Err(RepoUrlError::Empty));
    }

    #[test]
    fn test_parse_rejects_single_segment() {
        assert!(matches!(
            RepositoryRef::parse("cargo"),
            Err(RepoUrlError::MissingSegments(_))
        ));
    }

    #[test]
    fn test_parse_rejects_host_only() {
        assert!(matches!(
            RepositoryRef::parse("https://github.com"),
            Err(RepoUrlError::MissingSegments(_))
        ));
    }

    #[test]
    fn test_parse_rejects_empty_owner() {
        assert!(matches!(
            RepositoryRef::parse("https://github.com//cargo"),
            Err(RepoUrlError::MissingSegments(_))
        ));
    }
}
