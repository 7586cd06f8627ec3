//! Device-global atomic RMW throughput.
//!
//! Uncontended variants give each lane its own cache line; the contended
//! variant funnels every lane through one word. Wide-format atomics are
//! capability-gated and skipped on devices that cannot legalize them.

use std::process::ExitCode;

use instbench_core::{Result, Size};
use instbench_cuda::{DeviceCaps, Executor, LaunchConfig, OpKernel};
use instbench_drivers::payload::OpVariant;
use instbench_drivers::{payload, report, setup_logging};

const VARIANTS: &[OpVariant] = &[
    OpVariant {
        name: "atomic_global_add_u32",
        body: "acc += atomicAdd(slot, value);",
        min_cc: (5, 2),
    },
    OpVariant {
        name: "atomic_global_add_u32_contended",
        body: "acc += atomicAdd(buf, value);",
        min_cc: (5, 2),
    },
    OpVariant {
        name: "atomic_global_exch_u32",
        body: "acc += atomicExch(slot, acc);",
        min_cc: (5, 2),
    },
    OpVariant {
        name: "atomic_global_min_u32",
        body: "acc += atomicMin(slot, acc);",
        min_cc: (5, 2),
    },
    OpVariant {
        name: "atomic_global_cas_u32",
        body: "acc += atomicCAS(slot, acc, value);",
        min_cc: (5, 2),
    },
    OpVariant {
        name: "atomic_global_add_f32",
        body: "acc += (unsigned int)atomicAdd((float*)slot, 1.0f);",
        min_cc: (5, 2),
    },
    OpVariant {
        name: "atomic_global_add_f64",
        body: "acc += (unsigned int)atomicAdd((double*)slot, 1.0);",
        min_cc: (6, 0),
    },
    OpVariant {
        name: "red_global_add_f16x2",
        body: r#"asm volatile("red.add.noftz.f16x2 [%0], %1;" :: "l"(slot), "r"(value) : "memory");"#,
        min_cc: (6, 0),
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
        let source = payload::global_atomic_kernel(variant);
        let kernel = OpKernel::compile(executor.device(), variant.name, &source)?;

        let stats =
            executor.bench(|stream| stream.launch(&kernel, &config, &mut buf, payload::SEED))?;
        report::print_variant(variant.name, &stats, ops, &props);
    }

    Ok(())
}
