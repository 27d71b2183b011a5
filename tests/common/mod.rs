//! Common test utilities for integration tests.

use std::time::Duration;

use tempfile::TempDir;

use flowsync::domain::models::config::{ReadinessConfig, WatcherConfig};
use flowsync::{BackendClient, EngineClient, FlowIdStore};

/// An address nothing listens on; any request against it fails fast.
#[allow(dead_code)]
pub const UNROUTABLE: &str = "http://127.0.0.1:1";

/// Create a temporary shared-storage directory and a store over it.
#[allow(dead_code)]
pub fn temp_store() -> (TempDir, FlowIdStore) {
    let dir = tempfile::tempdir().expect("Failed to create temp dir");
    let store = FlowIdStore::new(dir.path());
    (dir, store)
}

/// Engine client pointed at a mock server (or an unroutable address).
#[allow(dead_code)]
pub fn engine_client(base_url: &str) -> EngineClient {
    EngineClient::new(base_url, Duration::from_secs(2))
}

/// Backend client pointed at a mock server (or an unroutable address).
#[allow(dead_code)]
pub fn backend_client(base_url: &str) -> BackendClient {
    BackendClient::new(base_url, Duration::from_secs(2))
}

/// Readiness config tuned for fast test turnaround.
#[allow(dead_code)]
pub fn fast_readiness(max_attempts: u32) -> ReadinessConfig {
    ReadinessConfig {
        poll_interval_secs: 1,
        max_attempts,
        probe_timeout_secs: 1,
        progress_every: 0,
    }
}

/// Watcher config tuned for fast test turnaround.
#[allow(dead_code)]
pub fn fast_watcher() -> WatcherConfig {
    WatcherConfig {
        poll_interval_secs: 1,
    }
}

/// Setup test logging.
#[allow(dead_code)]
pub fn setup_test_logging() {
    use tracing_subscriber::fmt;

    let _ = fmt()
        .with_test_writer()
        .with_max_level(tracing::Level::DEBUG)
        .try_init();
}
