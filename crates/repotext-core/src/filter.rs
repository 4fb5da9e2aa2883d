//! Exclusion rule applied to file entries during traversal.

use std::collections::BTreeSet;

use repotext_config::FilterConfig;

/// Decides which files are omitted from the consolidated document.
///
/// A file is excluded when its full path ends with any excluded extension, or
/// its bare name equals any excluded file name. Directories are never checked.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ExclusionRule {
    excluded_extensions: BTreeSet<String>,
    excluded_filenames: BTreeSet<String>,
}

impl ExclusionRule {
    pub fn new<E, N>(extensions: E, filenames: N) -> Self
    where
        E: IntoIterator,
        E::Item: Into<String>,
        N: IntoIterator,
        N::Item: Into<String>,
    {
        Self {
            excluded_extensions: extensions.into_iter().map(Into::into).collect(),
            excluded_filenames: filenames.into_iter().map(Into::into).collect(),
        }
    }

    /// Build the rule from the `[filter]` config section.
    pub fn from_config(config: &FilterConfig) -> Self {
        Self::new(
            config.exclude_extensions.iter().cloned(),
            config.exclude_filenames.iter().cloned(),
        )
    }

    /// Extend the rule with extra patterns (CLI overrides).
    pub fn with_extra<E, N>(mut self, extensions: E, filenames: N) -> Self
    where
        E: IntoIterator,
        E::Item: Into<String>,
        N: IntoIterator,
        N::Item: Into<String>,
    {
        self.excluded_extensions
            .extend(extensions.into_iter().map(Into::into));
        self.excluded_filenames
            .extend(filenames.into_iter().map(Into::into));
        self
    }

    pub fn excluded_extensions(&self) -> impl Iterator<Item = &str> {
        self.excluded_extensions.iter().map(String::as_str)
    }

    pub fn excluded_filenames(&self) -> impl Iterator<Item = &str> {
        self.excluded_filenames.iter().map(String::as_str)
    }

    /// Whether a file at `path` named `name` is excluded.
    pub fn is_excluded(&self, path: &str, name: &str) -> bool {
        self.excluded_extensions
            .iter()
            .any(|ext| path.ends_with(ext.as_str()))
            || self.excluded_filenames.contains(name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn rule() -> ExclusionRule {
        ExclusionRule::new([".md", ".png"], ["Cargo.lock"])
    }

    #[test]
    fn test_extension_matches_at_any_depth() {
        let rule = rule();
        assert!(rule.is_excluded("README.md", "README.md"));
        assert!(rule.is_excluded("docs/guide/intro.md", "intro.md"));
        assert!(rule.is_excluded("assets/logo.png", "logo.png"));
        assert!(!rule.is_excluded("src/main.rs", "main.rs"));
    }

    #[test]
    fn test_extension_is_a_plain_suffix() {
        // No dot handling: the configured string is matched verbatim.
        let rule = ExclusionRule::new(["rc"], Vec::<String>::new());
        assert!(rule.is_excluded(".bashrc", ".bashrc"));
        assert!(rule.is_excluded("src.rc", "src.rc"));
    }

    #[test]
    fn test_filename_is_exact_match() {
        let rule = rule();
        assert!(rule.is_excluded("Cargo.lock", "Cargo.lock"));
        assert!(rule.is_excluded("crates/core/Cargo.lock", "Cargo.lock"));
        assert!(!rule.is_excluded("Cargo.lock.bak", "Cargo.lock.bak"));
        assert!(!rule.is_excluded("cargo.lock", "cargo.lock"));
    }

    #[test]
    fn test_empty_rule_excludes_nothing() {
        let rule = ExclusionRule::default();
        assert!(!rule.is_excluded("anything.md", "anything.md"));
    }

    #[test]
    fn test_from_config_and_extra() {
        let config = FilterConfig {
            exclude_extensions: vec![".zip".to_string()],
            exclude_filenames: vec!["LICENSE".to_string()],
        };
        let rule = ExclusionRule::from_config(&config).with_extra([".md"], ["NOTICE"]);
        assert_eq!(
            rule.excluded_extensions().collect::<Vec<_>>(),
            vec![".md", ".zip"]
        );
        assert_eq!(
            rule.excluded_filenames().collect::<Vec<_>>(),
            vec!["LICENSE", "NOTICE"]
        );
    }
}
