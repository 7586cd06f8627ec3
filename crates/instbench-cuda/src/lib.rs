//! CUDA backend for the instbench microbenchmark harness.
//!
//! This crate wraps the `cudarc` driver bindings into the minimal surface
//! the harness needs: a device handle with cached properties, reusable
//! streams with ordered submission, NVRTC-compiled payload kernels, and the
//! [`Executor`] that turns a "launch one unit of work" closure into stable
//! timing statistics.
//!
//! # Example
//!
//! ```ignore
//! use instbench_cuda::{Executor, LaunchConfig, OpKernel};
//!
//! let mut executor = Executor::new()?;
//! let kernel = OpKernel::compile(executor.device(), "noop", SOURCE)?;
//! let config = LaunchConfig::new(256, 256);
//! let mut buf = executor.device().alloc_zeros::<u32>(1 << 20)?;
//!
//! let stats = executor.bench(|stream| {
//!     stream.launch(&kernel, &config, &mut buf, 0xdead_beef)
//! })?;
//! println!("{:.2} us", stats.average_us());
//! ```

#![warn(missing_docs)]

mod caps;
mod device;
mod executor;
mod kernel;
mod launch;
mod stream;

pub use caps::DeviceCaps;
pub use device::{CudaDevice, DeviceProperties};
pub use executor::{Executor, DEFAULT_TRIALS, DEFAULT_WARMUP};
pub use kernel::OpKernel;
pub use launch::LaunchConfig;
pub use stream::BenchStream;

/// Check if CUDA is available at runtime.
///
/// Returns false if the driver libraries are not installed or no device is
/// present. cudarc panics when the libraries cannot be loaded, so the probe
/// runs under `catch_unwind`.
pub fn is_cuda_available() -> bool {
    std::panic::catch_unwind(|| {
        cudarc::driver::CudaContext::device_count()
            .map(|c| c > 0)
            .unwrap_or(false)
    })
    .unwrap_or(false)
}

/// Get the CUDA device count, or 0 when CUDA is unavailable.
pub fn cuda_device_count() -> usize {
    std::panic::catch_unwind(|| {
        cudarc::driver::CudaContext::device_count().unwrap_or(0) as usize
    })
    .unwrap_or(0)
}
