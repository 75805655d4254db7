//! Shared helpers for integration suites that need embedded PostgreSQL.
//!
//! Each integration test compiles as its own crate, so suites pull this
//! module in with `mod support;`.

#![allow(dead_code)]

pub mod embedded_postgres;

pub use embedded_postgres::{provision_template_database, shared_cluster};

/// Returns true when `SKIP_TEST_CLUSTER` is set to `1`, `true` or `yes`.
pub fn should_skip_test_cluster() -> bool {
    std::env::var("SKIP_TEST_CLUSTER")
        .map(|value| matches!(value.to_lowercase().as_str(), "1" | "true" | "yes"))
        .unwrap_or(false)
}

/// Skip the test when the cluster may be absent, otherwise fail loudly.
pub fn handle_cluster_setup_failure<T>(reason: impl std::fmt::Display) -> Option<T> {
    if should_skip_test_cluster() {
        eprintln!("SKIP-TEST-CLUSTER: {reason}");
        None
    } else {
        panic!("Test cluster setup failed: {reason}. Set SKIP_TEST_CLUSTER=1 to skip.");
    }
}
