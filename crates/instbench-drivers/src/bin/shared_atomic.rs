//! Group-local (shared-memory) atomic RMW throughput.
//!
//! Each lane hammers its own shared-memory slot, so the numbers reflect
//! the RMW instruction cost rather than contention serialization.

use std::process::ExitCode;

use instbench_core::{Result, Size};
use instbench_cuda::{DeviceCaps, Executor, LaunchConfig, OpKernel};
use instbench_drivers::payload::OpVariant;
use instbench_drivers::{payload, report, setup_logging};

const VARIANTS: &[OpVariant] = &[
    OpVariant {
        name: "atomic_shared_add_u32",
        body: "acc += atomicAdd(slot, value);",
        min_cc: (5, 2),
    },
    OpVariant {
        name: "atomic_shared_exch_u32",
        body: "acc += atomicExch(slot, acc);",
        min_cc: (5, 2),
    },
    OpVariant {
        name: "atomic_shared_min_u32",
        body: "acc += atomicMin(slot, acc);",
        min_cc: (5, 2),
    },
    OpVariant {
        name: "atomic_shared_max_u32",
        body: "acc += atomicMax(slot, acc);",
        min_cc: (5, 2),
    },
    OpVariant {
        name: "atomic_shared_and_u32",
        body: "acc += atomicAnd(slot, value);",
        min_cc: (5, 2),
    },
    OpVariant {
        name: "atomic_shared_or_u32",
        body: "acc += atomicOr(slot, value);",
        min_cc: (5, 2),
    },
    OpVariant {
        name: "atomic_shared_xor_u32",
        body: "acc += atomicXor(slot, value);",
        min_cc: (5, 2),
    },
    OpVariant {
        name: "atomic_shared_cas_u32",
        body: "acc += atomicCAS(slot, acc, value);",
        min_cc: (5, 2),
    },
];

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
    let caps = DeviceCaps::resolve(&props);
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

    for variant in VARIANTS {
        if !caps.meets(variant.min_cc) {
            report::print_skipped(variant.name, variant.min_cc);
            continue;
        }
        let source = payload::shared_atomic_kernel(variant);
        let kernel = OpKernel::compile(executor.device(), variant.name, &source)?;

        let stats =
            executor.bench(|stream| stream.launch(&kernel, &config, &mut buf, payload::SEED))?;
        report::print_variant(variant.name, &stats, ops, &props);
    }

    Ok(())
}
