//! # Axle Test Suite
//!
//! Unified test crate for scenarios that span more than one workspace
//! member. Per-crate behavior lives in each crate's own `#[cfg(test)]`
//! modules; this crate covers the seams:
//!
//! ```text
//! tests/src/
//! └── integration/
//!     ├── pipeline.rs   # pool → pack → execute → commit → finalize
//!     └── backends.rs   # the same flows over the disk storage engines
//! ```
//!
//! ## Running Tests
//!
//! ```bash
//! # All tests
//! cargo test -p axle-tests
//!
//! # By category
//! cargo test -p axle-tests integration::pipeline
//! cargo test -p axle-tests integration::backends
//! ```

#![allow(dead_code)]

pub mod integration;

use std::sync::Once;

static TRACING: Once = Once::new();

/// Install the tracing subscriber once for the whole suite. Honors
/// `RUST_LOG`; silent by default.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_test_writer()
            .try_init();
    });
}
