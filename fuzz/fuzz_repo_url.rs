//! Fuzz target for repository URL parsing and the exclusion rule.
//!
//! Run with: cargo +nightly fuzz run fuzz_repo_url
//!
//! The first byte picks a split point. The bytes before it are a repository
//! URL and the rest is a file path checked against the default exclusions.

#![no_main]

use libfuzzer_sys::fuzz_target;
use repotext_core::{ExclusionRule, RepositoryRef};

fuzz_target!(|data: &[u8]| {
    if data.len() < 2 {
        return;
    }
    let split = (data[0] as usize % (data.len() - 1)) + 1;
    let Ok(url) = std::str::from_utf8(&data[1..split]) else {
        return;
    };
    let path = std::str::from_utf8(&data[split..]).unwrap_or("");

    if let Ok(repo) = RepositoryRef::parse(url) {
        assert!(!repo.owner.is_empty());
        assert!(!repo.name.is_empty());
    }

    let rule = ExclusionRule::from_config(&repotext_config::FilterConfig::default());
    let name = path.rsplit('/').next().unwrap_or(path);
    let _ = rule.is_excluded(path, name);
});
