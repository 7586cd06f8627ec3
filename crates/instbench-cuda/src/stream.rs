//! Ordered asynchronous command streams.

use std::sync::Arc;

use cudarc::driver::{CudaSlice, CudaStream, PushKernelArg};

use instbench_core::error::{InstBenchError, Result};

use crate::device::CudaDevice;
use crate::kernel::OpKernel;
use crate::launch::LaunchConfig;

/// An ordered execution context bound to one device.
///
/// Work submitted to the same stream executes in submission order on the
/// device; `launch` returns as soon as the work is enqueued. Streams are
/// owned by the [`crate::Executor`] and reused across many launches.
pub struct BenchStream {
    inner: Arc<CudaStream>,
    index: usize,
}

impl BenchStream {
    pub(crate) fn new(device: &CudaDevice, index: usize) -> Result<Self> {
        let inner = device
            .context()
            .new_stream()
            .map_err(|e| InstBenchError::device(format!("failed to create stream {index}"), e))?;

        tracing::debug!(index, "Created benchmark stream");

        Ok(Self { inner, index })
    }

    /// Returns this stream's index within the executor's pool.
    #[must_use]
    pub fn index(&self) -> usize {
        self.index
    }

    /// Enqueues one payload kernel dispatch.
    ///
    /// Asynchronous: the call returns once the work is queued, not when it
    /// completes. Completion is observed through [`BenchStream::synchronize`].
    pub fn launch(
        &self,
        kernel: &OpKernel,
        config: &LaunchConfig,
        buf: &mut CudaSlice<u32>,
        value: u32,
    ) -> Result<()> {
        let mut builder = self.inner.launch_builder(kernel.func());
        builder.arg(buf);
        builder.arg(&value);

        // Safety: the entry signature is fixed by OpKernel compilation and
        // matches the two arguments pushed above.
        unsafe { builder.launch(config.to_cuda()) }
            .map(|_| ())
            .map_err(|e| {
                InstBenchError::device(format!("launch of {} failed", kernel.name()), e)
            })
    }

    /// Blocks until all work previously enqueued on this stream completes.
    ///
    /// A device-side fault in any enqueued work surfaces here as a device
    /// error carrying the driver's diagnostic trace.
    pub fn synchronize(&self) -> Result<()> {
        self.inner
            .synchronize()
            .map_err(|e| InstBenchError::device("stream synchronization failed", e))
    }
}
