//! Packed-format ALU throughput.
//!
//! Scalar u32 ops give the baseline; the packed fp16 and dp4a variants
//! show the per-generation gains the packed formats were added for. Each
//! body is a dependent accumulator chain, so the numbers are latency-bound.

use std::process::ExitCode;

use instbench_core::{Result, Size};
use instbench_cuda::{DeviceCaps, Executor, LaunchConfig, OpKernel};
use instbench_drivers::payload::OpVariant;
use instbench_drivers::{payload, report, setup_logging};

const VARIANTS: &[OpVariant] = &[
    OpVariant {
        name: "add_u32",
        body: r#"asm volatile("add.u32 %0, %0, %1;" : "+r"(a) : "r"(b));"#,
        min_cc: (5, 2),
    },
    OpVariant {
        name: "mad_lo_u32",
        body: r#"asm volatile("mad.lo.u32 %0, %0, %1, %2;" : "+r"(a) : "r"(b), "r"(c));"#,
        min_cc: (5, 2),
    },
    OpVariant {
        name: "add_f16x2",
        body: r#"asm volatile("add.rn.f16x2 %0, %0, %1;" : "+r"(a) : "r"(b));"#,
        min_cc: (5, 3),
    },
    OpVariant {
        name: "mul_f16x2",
        body: r#"asm volatile("mul.rn.f16x2 %0, %0, %1;" : "+r"(a) : "r"(b));"#,
        min_cc: (5, 3),
    },
    OpVariant {
        name: "fma_f16x2",
        body: r#"asm volatile("fma.rn.f16x2 %0, %0, %1, %2;" : "+r"(a) : "r"(b), "r"(c));"#,
        min_cc: (5, 3),
    },
    OpVariant {
        name: "dp4a_u32",
        body: r#"asm volatile("dp4a.u32.u32 %0, %1, %2, %0;" : "+r"(a) : "r"(b), "r"(c));"#,
        min_cc: (6, 1),
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
        let source = payload::packed_math_kernel(variant);
        let kernel = OpKernel::compile(executor.device(), variant.name, &source)?;

        let stats =
            executor.bench(|stream| stream.launch(&kernel, &config, &mut buf, payload::SEED))?;
        report::print_variant(variant.name, &stats, ops, &props);
    }

    Ok(())
}
