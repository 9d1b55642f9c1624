//! Shared helpers for document integration tests.

#![allow(dead_code)]

use std::path::PathBuf;
use std::sync::Once;

use tracing_subscriber::EnvFilter;

pub const CONTRACT: &str = include_str!("../fixtures/templates/contract.html.tera");
pub const ORDERING: &str = include_str!("../fixtures/templates/ordering.html.tera");
pub const INVOICE: &str = include_str!("../fixtures/templates/invoice.html.tera");

static INIT: Once = Once::new();

/// Install a test-writer subscriber once per test binary. Filter with `RUST_LOG`.
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

pub fn fixture_path(name: &str) -> PathBuf {
    PathBuf::from(env!("CARGO_MANIFEST_DIR"))
        .join("tests/fixtures/templates")
        .join(name)
}
