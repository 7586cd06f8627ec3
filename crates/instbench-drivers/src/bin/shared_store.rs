//! Shared-memory store throughput across bank-conflict strides.

use std::process::ExitCode;

use instbench_core::{Result, Size};
use instbench_cuda::{Executor, LaunchConfig, OpKernel};
use instbench_drivers::{payload, report, setup_logging};

const STRIDES: &[u32] = &[1, 2, 4, 8, 16, 32];

fn main() -> ExitCode {
    setup_logging();
    match run() {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            report::print_error(&e);
            ExitCode::FAILURE
        }
    }
}

fn run() -> Result<()> {
    let mut executor = Executor::new()?;
    let props = executor.properties().clone();
    report::print_device(&props);

    let config = LaunchConfig::new(
        props.multiprocessor_count * payload::BLOCKS_PER_CU,
        payload::BLOCK_SIZE,
    );
    config.validate(&props)?;
    let ops = Size::new(config.total_threads() * u64::from(payload::OP_ITERS));

    let mut buf = executor
        .device()
        .alloc_zeros::<u32>(payload::GLOBAL_BUF_WORDS as usize)?;

    for &stride in STRIDES {
        let name = format!("st_shared_u32_stride{stride}");
        let source = payload::shared_store_kernel(&name, stride);
        let kernel = OpKernel::compile(executor.device(), &name, &source)?;

        let stats =
            executor.bench(|stream| stream.launch(&kernel, &config, &mut buf, payload::SEED))?;
        report::print_variant(&name, &stats, ops, &props);
    }

    Ok(())
}
