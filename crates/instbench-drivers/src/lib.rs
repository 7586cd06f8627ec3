//! Shared plumbing for the instruction-variant driver binaries.
//!
//! Each binary enumerates one instruction family (shared loads, shared
//! stores, shared atomics, global atomics, packed math), benches every
//! variant the device supports through the executor, and prints a report
//! block per variant. The binaries are deliberately near-identical; all
//! logic that can be shared lives here.

#![warn(missing_docs)]

pub mod payload;
pub mod report;

use tracing_subscriber::EnvFilter;

/// Initializes tracing output for a driver binary.
///
/// Verbosity comes from `RUST_LOG`; the default shows warnings only so the
/// benchmark report stays readable.
pub fn setup_logging() {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_target(false)
        .without_time()
        .init();
}
