//! Shared setup for the integration tests.
//!
//! Output is filtered with `RUST_LOG`, e.g.
//! `RUST_LOG=xfast_rs=trace cargo test --features tracing`.

#![allow(dead_code)]

use std::sync::Once;

use tracing_subscriber::EnvFilter;

static INIT: Once = Once::new();

/// Installs a fmt subscriber once per test binary.
pub fn init_tracing() {
    INIT.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}

/// Largest element of `keys` strictly below `key`.
pub fn reference_predecessor(keys: &[u64], key: u64) -> Option<u64> {
    keys.iter().copied().filter(|&k| k < key).max()
}

/// Smallest element of `keys` strictly above `key`.
pub fn reference_successor(keys: &[u64], key: u64) -> Option<u64> {
    keys.iter().copied().filter(|&k| k > key).min()
}
