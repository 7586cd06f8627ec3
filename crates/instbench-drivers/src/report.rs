//! Console report formatting.

use colored::Colorize;

use instbench_core::stats::estimated_cycles_per_op;
use instbench_core::{InstBenchError, Size, Statistics, Throughput};
use instbench_cuda::DeviceProperties;

/// Prints the device banner for a driver run.
pub fn print_device(props: &DeviceProperties) {
    println!(
        "{} {}",
        format!("== {} ==", props.name).bright_white().bold(),
        format!("({})", props.arch()).dimmed()
    );
    println!(
        "   multiprocessors: {}   warp: {}   clock: {} MHz\n",
        props.multiprocessor_count,
        props.warp_size,
        props.clock_rate_khz / 1000
    );
}

/// Prints one per-variant result block.
///
/// Throughput and bandwidth come from the average trial; the cycles/op
/// estimate uses the fastest trial so thermal and scheduling noise do not
/// inflate it.
pub fn print_variant(name: &str, stats: &Statistics, ops: Size, props: &DeviceProperties) {
    let rate = Throughput::new(ops, stats.average);
    let bytes = Throughput::from_bytes(ops.to_bytes::<u32>(), stats.average);
    let peak = Throughput::new(ops, stats.fastest);

    let cycles = estimated_cycles_per_op(
        props.clock_hz(),
        props.multiprocessor_count,
        props.warp_size,
        peak.per_second(),
    );

    println!(
        "  {:<28} {:>9.2} ± {:<6.2} us  {:>8.3} Gop/s  {:>8.3} GB/s  {:>7.2} cycles/op",
        name.bold(),
        stats.average_us(),
        stats.stddev_us(),
        rate.giga(),
        bytes.giga(),
        cycles
    );
}

/// Prints a skip line for a variant the device cannot legalize.
pub fn print_skipped(name: &str, min_cc: (u32, u32)) {
    println!(
        "  {:<28} {}",
        name.dimmed(),
        format!("skipped (requires sm_{}{})", min_cc.0, min_cc.1).dimmed()
    );
}

/// Prints a fatal error, with the device-side diagnostic trace if one was
/// captured, before the driver exits non-zero.
pub fn print_error(err: &InstBenchError) {
    eprintln!("{} {err}", "error:".bright_red().bold());
    if let Some(trace) = err.trace() {
        eprintln!("{}", trace.dimmed());
    }
}
