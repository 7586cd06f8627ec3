//! Hardware-dependent integration tests.
//!
//! These run the full device -> stream -> executor path and therefore need
//! a CUDA device; run with `cargo test -- --ignored` on a GPU host.

use instbench_cuda::{CudaDevice, Executor, LaunchConfig, OpKernel};

const STORE_LOOP: &str = r#"
extern "C" __global__ void store_loop(unsigned int* buf, unsigned int value) {
    const unsigned int gid = blockIdx.x * blockDim.x + threadIdx.x;
    for (unsigned int i = 0; i < 1024u; ++i) {
        buf[(gid + i) & 0xfffffu] = value + i;
    }
}
"#;

// Writes far past the end of any buffer the test allocates.
const FAULTING: &str = r#"
extern "C" __global__ void faulting(unsigned int* buf, unsigned int value) {
    buf[0x40000000u + threadIdx.x] = value;
}
"#;

#[test]
#[ignore] // Requires CUDA hardware
fn test_bench_end_to_end() {
    let mut executor = Executor::new().expect("open executor");
    let props = executor.properties().clone();

    let kernel = OpKernel::compile(executor.device(), "store_loop", STORE_LOOP).expect("compile");
    let config = LaunchConfig::new(props.multiprocessor_count * 4, 256);
    config.validate(&props).expect("config fits device");

    let mut buf = executor.device().alloc_zeros::<u32>(1 << 20).expect("alloc");

    let stats = executor
        .bench(|stream| stream.launch(&kernel, &config, &mut buf, 0xdead_beef))
        .expect("bench completes");

    assert_eq!(stats.trials, instbench_cuda::DEFAULT_TRIALS);
    assert!(stats.fastest > std::time::Duration::ZERO);
    assert!(stats.average >= stats.fastest);

    // The kernel stores value-derived words; the device must observe them.
    let host = executor.device().read_back(&buf).expect("read back");
    assert!(host.iter().any(|&w| w != 0));
}

#[test]
#[ignore] // Requires CUDA hardware
fn test_device_fault_propagates() {
    let mut executor = Executor::new().expect("open executor");
    let kernel = OpKernel::compile(executor.device(), "faulting", FAULTING).expect("compile");
    let config = LaunchConfig::new(1, 32);

    let mut buf = executor.device().alloc_zeros::<u32>(256).expect("alloc");

    let result = executor.bench(|stream| stream.launch(&kernel, &config, &mut buf, 1));
    let err = result.expect_err("fault must surface, not produce statistics");
    assert!(err.is_device_error());
}

#[test]
#[ignore] // Requires CUDA hardware
fn test_allocations_release_on_drop() {
    let device = CudaDevice::open_default().expect("open device 0");

    // A quarter-gigabyte allocation, dropped and re-made several times.
    // Leaked device memory would run the loop out of memory.
    const WORDS: usize = 64 << 20;
    for _ in 0..8 {
        let buf = device.alloc_zeros::<u32>(WORDS).expect("alloc");
        drop(buf);
    }
    let survivor = device.alloc_zeros::<u32>(WORDS).expect("final alloc");
    assert_eq!(survivor.len(), WORDS);
}

#[test]
#[ignore] // Requires CUDA hardware
fn test_allocation_released_after_error_path() {
    let device = CudaDevice::open_default().expect("open device 0");
    let mut executor = Executor::with_device(device).expect("executor");

    const WORDS: usize = 64 << 20;
    {
        let _buf = executor.device().alloc_zeros::<u32>(WORDS).expect("alloc");
        // Host-side failure before any launch; the bench aborts and the
        // allocation leaves scope through the error path.
        let result = executor.bench(|_| {
            Err(instbench_core::InstBenchError::Host("injected".to_string()))
        });
        assert!(result.is_err());
    }

    let buf = executor.device().alloc_zeros::<u32>(WORDS).expect("realloc after error");
    assert_eq!(buf.len(), WORDS);
}
