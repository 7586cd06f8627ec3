//! Kernel launch configuration.

use instbench_core::error::{InstBenchError, Result};

use crate::device::DeviceProperties;

/// Grid/block dimensions for one dispatch.
///
/// Immutable value: grid size is the number of thread groups, block size
/// the threads per group. The harness only launches 1D grids.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaunchConfig {
    /// Number of thread groups.
    pub grid_size: u32,
    /// Threads per group.
    pub block_size: u32,
    /// Dynamic shared memory per block in bytes.
    pub shared_mem_bytes: u32,
}

impl LaunchConfig {
    /// Creates a configuration with the given grid and block sizes.
    #[must_use]
    pub const fn new(grid_size: u32, block_size: u32) -> Self {
        Self {
            grid_size,
            block_size,
            shared_mem_bytes: 0,
        }
    }

    /// Creates a 1D configuration covering `elements` with the given block size.
    #[must_use]
    pub const fn for_elements(elements: u32, block_size: u32) -> Self {
        Self::new(elements.div_ceil(block_size), block_size)
    }

    /// Builder method to set dynamic shared memory.
    #[must_use]
    pub const fn with_shared_mem(mut self, bytes: u32) -> Self {
        self.shared_mem_bytes = bytes;
        self
    }

    /// Total threads across the dispatch.
    #[must_use]
    pub const fn total_threads(&self) -> u64 {
        self.grid_size as u64 * self.block_size as u64
    }

    /// Validates the configuration against the device's limits.
    pub fn validate(&self, props: &DeviceProperties) -> Result<()> {
        if self.grid_size == 0 {
            return Err(InstBenchError::InvalidLaunchConfig(
                "grid size must be > 0".to_string(),
            ));
        }
        if self.block_size == 0 {
            return Err(InstBenchError::InvalidLaunchConfig(
                "block size must be > 0".to_string(),
            ));
        }
        if self.block_size > props.max_threads_per_block {
            return Err(InstBenchError::InvalidLaunchConfig(format!(
                "block size {} exceeds device maximum {}",
                self.block_size, props.max_threads_per_block
            )));
        }
        Ok(())
    }

    pub(crate) fn to_cuda(self) -> cudarc::driver::LaunchConfig {
        cudarc::driver::LaunchConfig {
            grid_dim: (self.grid_size, 1, 1),
            block_dim: (self.block_size, 1, 1),
            shared_mem_bytes: self.shared_mem_bytes,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props() -> DeviceProperties {
        DeviceProperties {
            name: "Test Device".to_string(),
            compute_capability: (8, 0),
            multiprocessor_count: 84,
            warp_size: 32,
            clock_rate_khz: 1_500_000,
            max_threads_per_block: 1024,
        }
    }

    #[test]
    fn test_for_elements_rounds_up() {
        let config = LaunchConfig::for_elements(1000, 256);
        assert_eq!(config.grid_size, 4);
        assert_eq!(config.block_size, 256);
        assert_eq!(config.total_threads(), 1024);
    }

    #[test]
    fn test_validate_accepts_device_limits() {
        let config = LaunchConfig::new(65535, 1024);
        assert!(config.validate(&props()).is_ok());
    }

    #[test]
    fn test_validate_rejects_zero_grid() {
        let config = LaunchConfig::new(0, 256);
        assert!(matches!(
            config.validate(&props()),
            Err(InstBenchError::InvalidLaunchConfig(_))
        ));
    }

    #[test]
    fn test_validate_rejects_oversized_block() {
        let config = LaunchConfig::new(1, 2048);
        assert!(matches!(
            config.validate(&props()),
            Err(InstBenchError::InvalidLaunchConfig(_))
        ));
    }
}
