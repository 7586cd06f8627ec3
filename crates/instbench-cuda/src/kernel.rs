//! Payload kernel compilation.

use std::sync::Arc;

use cudarc::driver::{CudaFunction, CudaModule};
use cudarc::nvrtc::CompileOptions;

use instbench_core::error::{InstBenchError, Result};

use crate::caps::DeviceCaps;
use crate::device::CudaDevice;

/// A compiled device routine with the fixed benchmark entry signature
/// `(unsigned int* buf, unsigned int value)`.
///
/// The harness treats the routine as opaque: what the body does is decided
/// entirely by the driver that supplied the source. Compilation targets the
/// device's own architecture so inline instruction sequences legalize.
#[derive(Debug)]
pub struct OpKernel {
    name: String,
    func: CudaFunction,
    // Keeps the module alive for as long as the function is launchable.
    _module: Arc<CudaModule>,
}

impl OpKernel {
    /// Compiles a CUDA C source and loads the entry point named `name`.
    pub fn compile(device: &CudaDevice, name: &str, source: &str) -> Result<Self> {
        let caps = DeviceCaps::resolve(device.properties());
        let opts = CompileOptions {
            arch: Some(caps.nvrtc_arch()),
            ..Default::default()
        };

        let ptx = cudarc::nvrtc::compile_ptx_with_opts(source, opts)
            .map_err(|e| InstBenchError::CompilationFailed(format!("{name}: {e}")))?;

        let module = device
            .context()
            .load_module(ptx)
            .map_err(|e| InstBenchError::device(format!("failed to load module for {name}"), e))?;

        let func = module
            .load_function(name)
            .map_err(|e| InstBenchError::device(format!("entry point {name} not found"), e))?;

        tracing::debug!(kernel = name, arch = caps.nvrtc_arch(), "Compiled payload kernel");

        Ok(Self {
            name: name.to_string(),
            func,
            _module: module,
        })
    }

    /// Returns the entry point name.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }

    pub(crate) fn func(&self) -> &CudaFunction {
        &self.func
    }
}
