//! Host-side building blocks for the instbench harness.
//!
//! This crate carries everything that does not touch a GPU: the workspace
//! error taxonomy, the [`Size`]/[`Throughput`] unit-conversion value types,
//! and the [`Statistics`] aggregation used by the benchmark executor. All of
//! it is pure host code and unit-testable without CUDA hardware.

#![warn(missing_docs)]

pub mod error;
pub mod size;
pub mod stats;

pub use error::{InstBenchError, Result};
pub use size::{Size, Throughput};
pub use stats::Statistics;
