//! Error types for the instbench workspace.

use thiserror::Error;

/// Result type alias used throughout the workspace.
pub type Result<T> = std::result::Result<T, InstBenchError>;

/// Workspace error type.
///
/// Device-side failures carry a capture-time diagnostic trace where the
/// driver made one available. Errors are never retried: any failure during
/// a benchmark aborts the call and propagates to the driver binary, which is
/// the only recovery boundary.
#[derive(Debug, Error)]
pub enum InstBenchError {
    /// No usable device, or device selection failed.
    #[error("no CUDA device available: {0}")]
    DeviceUnavailable(String),

    /// Kernel-launch failure or a device-side fault surfaced at
    /// synchronize time.
    #[error("device error: {message}")]
    Device {
        /// Human-readable failure description.
        message: String,
        /// Diagnostic trace captured from the driver, if available.
        trace: Option<String>,
    },

    /// The device could not satisfy an allocation request.
    #[error("out of device memory: requested {requested} bytes")]
    OutOfMemory {
        /// Size of the failed request in bytes.
        requested: usize,
    },

    /// NVRTC failed to compile a payload kernel.
    #[error("kernel compilation failed: {0}")]
    CompilationFailed(String),

    /// A launch configuration violates the device's limits.
    #[error("invalid launch configuration: {0}")]
    InvalidLaunchConfig(String),

    /// Any other host-side failure.
    #[error("host error: {0}")]
    Host(String),
}

impl InstBenchError {
    /// Builds a device error from a message and a driver-level error whose
    /// debug representation serves as the diagnostic trace.
    pub fn device(message: impl Into<String>, source: impl std::fmt::Debug) -> Self {
        InstBenchError::Device {
            message: message.into(),
            trace: Some(format!("{source:?}")),
        }
    }

    /// Returns the captured diagnostic trace, if any.
    #[must_use]
    pub fn trace(&self) -> Option<&str> {
        match self {
            InstBenchError::Device { trace, .. } => trace.as_deref(),
            _ => None,
        }
    }

    /// Returns whether this error originated on the device side.
    #[must_use]
    pub fn is_device_error(&self) -> bool {
        matches!(
            self,
            InstBenchError::DeviceUnavailable(_)
                | InstBenchError::Device { .. }
                | InstBenchError::OutOfMemory { .. }
        )
    }
}
