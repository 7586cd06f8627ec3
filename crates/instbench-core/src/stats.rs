//! Trial-duration aggregation and derived metrics.

use std::time::Duration;

/// Fixed per-cycle issue-width constant used by [`estimated_cycles_per_op`].
///
/// Reproduced from the original harness as-is; its derivation is not
/// documented there either. Treat every number that flows through it as a
/// heuristic normalization, not a measured cycle count.
pub const PER_CYCLE_ISSUE_WIDTH: f64 = 4.0;

/// Aggregated timing statistics over a fixed number of timed trials.
///
/// Produced once per `bench` call and immutable afterwards. The average
/// and standard deviation characterize run-to-run variance; the fastest
/// trial isolates best-case throughput from frequency scaling and
/// scheduling jitter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Statistics {
    /// Arithmetic mean of the trial durations.
    pub average: Duration,
    /// Sample standard deviation of the trial durations.
    pub stddev: Duration,
    /// Minimum observed trial duration.
    pub fastest: Duration,
    /// Number of timed trials aggregated.
    pub trials: usize,
}

impl Statistics {
    /// Aggregates a list of trial durations.
    ///
    /// Durations are carried as f64 seconds internally, so sub-microsecond
    /// inputs keep their precision; rounding happens only at display time.
    /// The standard deviation is the sample (n-1) form, zero for a single
    /// trial.
    ///
    /// # Panics
    /// Panics if `samples` is empty. The executor always times at least
    /// one trial.
    #[must_use]
    pub fn from_samples(samples: &[Duration]) -> Self {
        assert!(!samples.is_empty(), "samples must not be empty");

        let n = samples.len();
        let secs: Vec<f64> = samples.iter().map(Duration::as_secs_f64).collect();

        let mean = secs.iter().sum::<f64>() / n as f64;

        let stddev = if n > 1 {
            let variance =
                secs.iter().map(|s| (s - mean) * (s - mean)).sum::<f64>() / (n as f64 - 1.0);
            variance.sqrt()
        } else {
            0.0
        };

        let fastest = samples.iter().min().copied().unwrap_or_default();

        Statistics {
            average: Duration::from_secs_f64(mean),
            stddev: Duration::from_secs_f64(stddev),
            fastest,
            trials: n,
        }
    }

    /// Average duration in microseconds.
    #[must_use]
    pub fn average_us(&self) -> f64 {
        self.average.as_secs_f64() * 1e6
    }

    /// Standard deviation in microseconds.
    #[must_use]
    pub fn stddev_us(&self) -> f64 {
        self.stddev.as_secs_f64() * 1e6
    }

    /// Fastest trial in microseconds.
    #[must_use]
    pub fn fastest_us(&self) -> f64 {
        self.fastest.as_secs_f64() * 1e6
    }
}

/// Estimates cycles per operation from a measured rate.
///
/// `cycles/op = clock_hz * compute_units * issue_width * warp_size / rate`.
/// The model assumes every compute unit issues `PER_CYCLE_ISSUE_WIDTH`
/// warp-wide instructions each cycle at full occupancy, so the result is an
/// approximation useful for comparing operations on one device, not a
/// hardware-verified cycle count.
#[must_use]
pub fn estimated_cycles_per_op(
    clock_hz: f64,
    compute_units: u32,
    warp_size: u32,
    ops_per_second: f64,
) -> f64 {
    clock_hz * f64::from(compute_units) * PER_CYCLE_ISSUE_WIDTH * f64::from(warp_size)
        / ops_per_second
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_equal_samples_have_zero_stddev() {
        let samples = vec![Duration::from_micros(10); 32];
        let stats = Statistics::from_samples(&samples);

        assert_eq!(stats.average, Duration::from_micros(10));
        assert_eq!(stats.stddev, Duration::ZERO);
        assert_eq!(stats.fastest, Duration::from_micros(10));
        assert_eq!(stats.trials, 32);
    }

    #[test]
    fn test_mixed_samples_aggregation() {
        let samples: Vec<Duration> = [8u64, 12, 10, 10]
            .iter()
            .map(|&us| Duration::from_micros(us))
            .collect();
        let stats = Statistics::from_samples(&samples);

        assert_eq!(stats.average, Duration::from_micros(10));
        assert_eq!(stats.fastest, Duration::from_micros(8));
        // Sample stddev of [8, 12, 10, 10] us = sqrt(8/3) ~= 1.633 us.
        // Duration stores whole nanoseconds, so compare at that granularity.
        let expected = (8.0f64 / 3.0).sqrt();
        assert!((stats.stddev_us() - expected).abs() < 1e-3);
    }

    #[test]
    fn test_single_sample() {
        let stats = Statistics::from_samples(&[Duration::from_nanos(250)]);
        assert_eq!(stats.average, Duration::from_nanos(250));
        assert_eq!(stats.stddev, Duration::ZERO);
        assert_eq!(stats.fastest, Duration::from_nanos(250));
        assert_eq!(stats.trials, 1);
    }

    #[test]
    fn test_sub_microsecond_precision() {
        let samples = [Duration::from_nanos(100), Duration::from_nanos(300)];
        let stats = Statistics::from_samples(&samples);
        assert_eq!(stats.average, Duration::from_nanos(200));
        assert_eq!(stats.fastest, Duration::from_nanos(100));
    }

    #[test]
    #[should_panic(expected = "samples must not be empty")]
    fn test_empty_samples_panics() {
        let _ = Statistics::from_samples(&[]);
    }

    #[test]
    fn test_cycle_estimate() {
        // 1 GHz, 1 CU, warp 32, issue width 4 => 1.28e11 lane-cycles/s.
        // At 1.28e11 ops/s that is exactly 1 cycle per op.
        let cycles = estimated_cycles_per_op(1e9, 1, 32, 1.28e11);
        assert!((cycles - 1.0).abs() < 1e-12);

        // Halving the rate doubles the estimate.
        let cycles = estimated_cycles_per_op(1e9, 1, 32, 6.4e10);
        assert!((cycles - 2.0).abs() < 1e-12);
    }
}
