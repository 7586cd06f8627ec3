//! Benchmarks for the host-side aggregation path.
//!
//! The aggregation runs once per `bench` call between GPU launches, so it
//! must stay cheap relative to the microsecond-scale work it measures.

use std::time::Duration;

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};

use instbench_core::{Size, Statistics, Throughput};

fn bench_from_samples(c: &mut Criterion) {
    let mut group = c.benchmark_group("statistics");
    group.sample_size(200);

    for &n in &[32usize, 256, 4096] {
        let samples: Vec<Duration> = (0..n)
            .map(|i| Duration::from_nanos(10_000 + (i as u64 * 37) % 500))
            .collect();

        group.bench_with_input(BenchmarkId::new("from_samples", n), &samples, |b, s| {
            b.iter(|| black_box(Statistics::from_samples(s)));
        });
    }
    group.finish();
}

fn bench_throughput_math(c: &mut Criterion) {
    let mut group = c.benchmark_group("throughput");
    group.sample_size(500);

    group.bench_function("rate_and_scale", |b| {
        let d = Duration::from_micros(12);
        b.iter(|| {
            let rate = Throughput::new(black_box(Size::new(1 << 24)), black_box(d));
            black_box(rate.tera())
        });
    });
    group.finish();
}

criterion_group!(benches, bench_from_samples, bench_throughput_math);
criterion_main!(benches);
