//! End-to-end consolidation runs against an in-memory repository.

use pretty_assertions::assert_eq;

use repotext_core::host::HostError;
use repotext_core::observer::ErrorKind;
use repotext_core::{
    Concatenator, ConsolidateError, ConsolidateRequest, Consolidator, ExclusionRule, WalkOptions,
    write_document,
};
use repotext_test_utils::{MemoryHost, RecordingObserver, TestConfigBuilder};

fn request() -> ConsolidateRequest {
    ConsolidateRequest::new("https://github.com/octo/demo", "main")
}

#[test_log::test(tokio::test)]
async fn test_round_trip_document() {
    let host = MemoryHost::new()
        .file("a.txt", "A")
        .file("skip.md", "ignored")
        .file("sub/b.txt", "B");
    let rule = ExclusionRule::new([".md"], Vec::<String>::new());

    let doc = Consolidator::new(&host, rule, WalkOptions::default())
        .run(&request(), &RecordingObserver::new())
        .await
        .unwrap();

    assert_eq!(doc.text(), "### a.txt\n\nA\n\n### sub/b.txt\n\nB\n\n");
    assert_eq!(doc.paths(), ["a.txt", "sub/b.txt"]);
    assert_eq!(doc.skipped(), 0);
}

#[tokio::test]
async fn test_downloads_follow_walk_order() {
    let host = MemoryHost::new()
        .file("c.txt", "C")
        .file("d/a.txt", "DA")
        .file("b.txt", "B");
    let rule = ExclusionRule::default();

    let doc = Consolidator::new(&host, rule, WalkOptions::default())
        .run(&request(), &RecordingObserver::new())
        .await
        .unwrap();

    assert_eq!(doc.paths(), ["c.txt", "d/a.txt", "b.txt"]);
    assert_eq!(
        host.fetched(),
        vec![
            MemoryHost::url_for("c.txt"),
            MemoryHost::url_for("d/a.txt"),
            MemoryHost::url_for("b.txt"),
        ]
    );
}

#[tokio::test]
async fn test_failed_download_leaves_no_stray_header() {
    let host = MemoryHost::new()
        .file("a.txt", "A")
        .file("b.txt", "B")
        .file("c.txt", "C")
        .fail_download("b.txt", HostError::Network("connection reset".to_string()));
    let observer = RecordingObserver::new();

    let doc = Consolidator::new(&host, ExclusionRule::default(), WalkOptions::default())
        .run(&request(), &observer)
        .await
        .unwrap();

    assert_eq!(doc.text(), "### a.txt\n\nA\n\n### c.txt\n\nC\n\n");
    assert_eq!(doc.skipped(), 1);
    assert_eq!(doc.walked(), 3);
    let errors = observer.errors(ErrorKind::Download);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("b.txt"));
    assert!(errors[0].contains("connection reset"));
}

#[tokio::test]
async fn test_file_without_download_url_is_left_out() {
    let host = MemoryHost::new().file("a.txt", "A").file_without_url("weird");

    let doc = Consolidator::new(&host, ExclusionRule::default(), WalkOptions::default())
        .run(&request(), &RecordingObserver::new())
        .await
        .unwrap();

    assert_eq!(doc.paths(), ["a.txt"]);
    assert_eq!(host.fetched().len(), 1);
}

#[tokio::test]
async fn test_root_access_failure_produces_nothing() {
    let host = MemoryHost::new()
        .file("a.txt", "A")
        .fail_listing("", HostError::Denied("API rate limit exceeded".to_string()));
    let observer = RecordingObserver::new();

    let err = Consolidator::new(&host, ExclusionRule::default(), WalkOptions::default())
        .run(&request(), &observer)
        .await
        .unwrap_err();

    assert!(matches!(err, ConsolidateError::Access(_)));
    assert!(host.fetched().is_empty());
    assert!(observer.progress().is_empty());
    let errors = observer.errors(ErrorKind::Access);
    assert_eq!(errors.len(), 1);
    assert!(errors[0].contains("rate limit"));
}

#[tokio::test]
async fn test_everything_excluded_is_an_empty_success() {
    let host = MemoryHost::new().file("logo.png", "").file("LICENSE", "MIT");

    let doc = Consolidator::from_config(&host, &TestConfigBuilder::new().build())
        .run(&request(), &RecordingObserver::new())
        .await
        .unwrap();

    assert!(doc.is_empty());
    assert_eq!(doc.walked(), 0);
    assert_eq!(doc.text(), "");
    assert!(host.fetched().is_empty());
}

#[tokio::test]
async fn test_every_download_failing_is_still_a_success() {
    let host = MemoryHost::new()
        .file("a.txt", "A")
        .file("b.txt", "B")
        .fail_download("a.txt", HostError::Network("reset".to_string()))
        .fail_download("b.txt", HostError::Network("reset".to_string()));
    let observer = RecordingObserver::new();

    let doc = Consolidator::new(&host, ExclusionRule::default(), WalkOptions::default())
        .run(&request(), &observer)
        .await
        .unwrap();

    assert!(doc.is_empty());
    assert_eq!(doc.walked(), 2);
    assert_eq!(doc.skipped(), 2);
    assert_eq!(observer.errors(ErrorKind::Download).len(), 2);
}

#[tokio::test]
async fn test_config_drives_exclusions_and_sorting() {
    let host = MemoryHost::new()
        .file("notes.md", "N")
        .file("b.rs", "B")
        .file("a.rs", "A");
    let config = TestConfigBuilder::new()
        .exclude_extensions(&[".md"])
        .exclude_filenames(&[])
        .sort_entries(true)
        .build();

    let doc = Consolidator::from_config(&host, &config)
        .run(&request(), &RecordingObserver::new())
        .await
        .unwrap();

    assert_eq!(doc.text(), "### a.rs\n\nA\n\n### b.rs\n\nB\n\n");
}

#[tokio::test]
async fn test_concatenator_alone_keeps_input_order() {
    let host = MemoryHost::new().file("x.txt", "X").file("y.txt", "Y");
    let rule = ExclusionRule::default();
    let files = repotext_core::TreeWalker::new(&host, &rule, WalkOptions::default())
        .walk(
            &repotext_core::RepositoryRef::new("o", "r"),
            "main",
            &RecordingObserver::new(),
        )
        .await
        .unwrap();
    let reversed: Vec<_> = files.into_iter().rev().collect();

    let doc = Concatenator::new(&host)
        .concatenate(reversed, &RecordingObserver::new())
        .await;

    assert_eq!(doc.text(), "### y.txt\n\nY\n\n### x.txt\n\nX\n\n");
}

#[tokio::test]
async fn test_document_written_to_disk() {
    let host = MemoryHost::new().file("a.txt", "A");
    let doc = Consolidator::new(&host, ExclusionRule::default(), WalkOptions::default())
        .run(&request(), &RecordingObserver::new())
        .await
        .unwrap();

    let dir = tempfile::TempDir::new().unwrap();
    let dest = dir.path().join("consolidated_text.txt");
    write_document(&doc, &dest).unwrap();

    assert_eq!(std::fs::read_to_string(&dest).unwrap(), "### a.txt\n\nA\n\n");
}
