//! Tracing initialisation for tests.
//!
//! [`init_test_tracing`] installs a subscriber that writes through the test
//! harness, so log lines only show up for failing tests or with
//! `--nocapture`. Installing happens at most once per process; later calls
//! are no-ops.

use tracing_subscriber::EnvFilter;

/// Filter used when `RUST_LOG` is unset: quiet dependencies, chatty repotext.
pub const DEFAULT_TEST_FILTER: &str = "warn,repotext_core=debug";

/// Install the test subscriber, honouring `RUST_LOG` when set.
///
/// ```ignore
/// #[tokio::test]
/// async fn my_test() {
///     repotext_test_utils::tracing_setup::init_test_tracing();
///     tracing::debug!("visible for failing tests");
/// }
/// ```
pub fn init_test_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_TEST_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
