//! Tracing subscriber setup shared by tests and tooling.

use tracing_subscriber::EnvFilter;

/// Filter applied when `RUST_LOG` is unset: codec crates at debug,
/// everything else at warn.
const DEFAULT_FILTER: &str = "warn,strand_transactions=debug,strand_format=debug,strand_crypto=debug";

/// Install the global tracing subscriber.
///
/// Filtering comes from `RUST_LOG`, falling back to [`DEFAULT_FILTER`].
/// Later calls are no-ops, so every test can call this unconditionally.
pub fn init_tracing() {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER));
    let _ = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_test_writer()
        .try_init();
}
