//! CUDA device management.

use std::sync::Arc;

use cudarc::driver::sys::CUdevice_attribute;
use cudarc::driver::{CudaContext, CudaSlice, CudaStream, DeviceRepr, ValidAsZeroBits};

use instbench_core::error::{InstBenchError, Result};

/// Read-only device properties, queried once at open time.
#[derive(Debug, Clone)]
pub struct DeviceProperties {
    /// Device name reported by the driver.
    pub name: String,
    /// Compute capability (major, minor).
    pub compute_capability: (u32, u32),
    /// Number of multiprocessors (compute units).
    pub multiprocessor_count: u32,
    /// Hardware warp width in lanes.
    pub warp_size: u32,
    /// Core clock rate in kilohertz.
    pub clock_rate_khz: u32,
    /// Maximum threads per block.
    pub max_threads_per_block: u32,
}

impl DeviceProperties {
    /// Core clock rate in hertz.
    #[must_use]
    pub fn clock_hz(&self) -> f64 {
        f64::from(self.clock_rate_khz) * 1e3
    }

    /// Architecture identifier string, e.g. `sm_89`.
    #[must_use]
    pub fn arch(&self) -> String {
        format!(
            "sm_{}{}",
            self.compute_capability.0, self.compute_capability.1
        )
    }
}

/// Wrapper around a cudarc context for one physical device.
///
/// Opened once at process start and unique for its lifetime: the handle is
/// deliberately not `Clone`. All allocations made through it are released
/// when their `CudaSlice` goes out of scope, on every exit path.
pub struct CudaDevice {
    /// The underlying cudarc context.
    ctx: Arc<CudaContext>,
    /// Default stream, used for allocations and transfers.
    stream: Arc<CudaStream>,
    /// Device ordinal.
    ordinal: usize,
    /// Cached properties record.
    props: DeviceProperties,
}

impl CudaDevice {
    /// Opens the default (first) device.
    pub fn open_default() -> Result<Self> {
        Self::new(0)
    }

    /// Opens the device with the given ordinal.
    pub fn new(ordinal: usize) -> Result<Self> {
        let count = CudaContext::device_count().map_err(|e| {
            InstBenchError::DeviceUnavailable(format!("failed to count devices: {e}"))
        })? as usize;
        if count == 0 {
            return Err(InstBenchError::DeviceUnavailable(
                "no devices present".to_string(),
            ));
        }
        if ordinal >= count {
            return Err(InstBenchError::DeviceUnavailable(format!(
                "device {ordinal} out of range ({count} present)"
            )));
        }

        let ctx = CudaContext::new(ordinal)
            .map_err(|e| InstBenchError::device(format!("failed to open device {ordinal}"), e))?;

        let name = ctx
            .name()
            .map_err(|e| InstBenchError::device("failed to query device name", e))?;

        let (major, minor) = ctx
            .compute_capability()
            .map_err(|e| InstBenchError::device("failed to query compute capability", e))?;

        let attr = |a: CUdevice_attribute| -> Result<u32> {
            let v = ctx
                .attribute(a)
                .map_err(|e| InstBenchError::device(format!("failed to query {a:?}"), e))?;
            Ok(v as u32)
        };

        let props = DeviceProperties {
            name,
            compute_capability: (major as u32, minor as u32),
            multiprocessor_count: attr(CUdevice_attribute::CU_DEVICE_ATTRIBUTE_MULTIPROCESSOR_COUNT)?,
            warp_size: attr(CUdevice_attribute::CU_DEVICE_ATTRIBUTE_WARP_SIZE)?,
            clock_rate_khz: attr(CUdevice_attribute::CU_DEVICE_ATTRIBUTE_CLOCK_RATE)?,
            max_threads_per_block: attr(CUdevice_attribute::CU_DEVICE_ATTRIBUTE_MAX_THREADS_PER_BLOCK)?,
        };

        let stream = ctx.default_stream();

        tracing::info!(
            ordinal,
            name = %props.name,
            arch = %props.arch(),
            multiprocessors = props.multiprocessor_count,
            "Opened CUDA device"
        );

        Ok(Self {
            ctx,
            stream,
            ordinal,
            props,
        })
    }

    /// Returns the device ordinal.
    #[must_use]
    pub fn ordinal(&self) -> usize {
        self.ordinal
    }

    /// Returns the cached properties record.
    #[must_use]
    pub fn properties(&self) -> &DeviceProperties {
        &self.props
    }

    /// Returns the underlying cudarc context.
    pub(crate) fn context(&self) -> &Arc<CudaContext> {
        &self.ctx
    }

    /// Allocates uninitialized device memory for `len` elements.
    ///
    /// Safe as long as the device only writes before the host reads; every
    /// payload kernel here writes its buffer before anything reads it back.
    pub fn alloc<T: DeviceRepr>(&self, len: usize) -> Result<CudaSlice<T>> {
        // Uninitialized GPU memory is fine until something reads it; the
        // caller is responsible for initialization.
        unsafe {
            self.stream
                .alloc::<T>(len)
                .map_err(|_| InstBenchError::OutOfMemory {
                    requested: len * std::mem::size_of::<T>(),
                })
        }
    }

    /// Allocates zero-initialized device memory for `len` elements.
    ///
    /// The zero-fill runs on the device's default stream and is drained
    /// before returning, so the buffer may be used from any stream.
    pub fn alloc_zeros<T: DeviceRepr + ValidAsZeroBits>(&self, len: usize) -> Result<CudaSlice<T>> {
        let buf = self
            .stream
            .alloc_zeros::<T>(len)
            .map_err(|_| InstBenchError::OutOfMemory {
                requested: len * std::mem::size_of::<T>(),
            })?;
        self.stream
            .synchronize()
            .map_err(|e| InstBenchError::device("failed to drain allocation stream", e))?;
        Ok(buf)
    }

    /// Copies device data back to the host.
    pub fn read_back<T: DeviceRepr + Clone + Default>(&self, src: &CudaSlice<T>) -> Result<Vec<T>> {
        let mut dst = vec![T::default(); src.len()];
        self.stream
            .memcpy_dtoh(src, &mut dst)
            .map_err(|e| InstBenchError::device("device-to-host copy failed", e))?;
        self.stream
            .synchronize()
            .map_err(|e| InstBenchError::device("failed to drain copy stream", e))?;
        Ok(dst)
    }
}
