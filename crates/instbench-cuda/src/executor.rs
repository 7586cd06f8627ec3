//! The benchmark executor and timing loop.

use std::time::{Duration, Instant};

use instbench_core::error::Result;
use instbench_core::stats::Statistics;

use crate::device::{CudaDevice, DeviceProperties};
use crate::stream::BenchStream;

/// Default number of timed trials per `bench` call.
pub const DEFAULT_TRIALS: usize = 32;

/// Default number of discarded warmup launches per `bench` call.
pub const DEFAULT_WARMUP: usize = 4;

/// Streams kept in the executor's pool.
const POOL_SIZE: usize = 2;

/// Owns a device and a pool of streams, and runs the calibrated
/// benchmarking loop for user-supplied launch closures.
///
/// Per `bench` call: a warmup phase primes one-time device-side costs, then
/// each timed trial wraps exactly one launch between an `Instant` start and
/// the stream's `synchronize` — the only suspension point. Trials never
/// overlap, so each duration sample covers exactly one unit of work. Any
/// failure aborts the call immediately with no partial statistics.
pub struct Executor {
    device: CudaDevice,
    streams: Vec<BenchStream>,
    next_stream: usize,
    warmup: usize,
    trials: usize,
}

impl Executor {
    /// Creates an executor bound to the default device.
    pub fn new() -> Result<Self> {
        Self::with_device(CudaDevice::open_default()?)
    }

    /// Creates an executor bound to an already-open device.
    pub fn with_device(device: CudaDevice) -> Result<Self> {
        let mut streams = Vec::with_capacity(POOL_SIZE);
        for i in 0..POOL_SIZE {
            streams.push(BenchStream::new(&device, i)?);
        }

        Ok(Self {
            device,
            streams,
            next_stream: 0,
            warmup: DEFAULT_WARMUP,
            trials: DEFAULT_TRIALS,
        })
    }

    /// Builder method to set the timed trial count (at least 1).
    #[must_use]
    pub fn with_trials(mut self, trials: usize) -> Self {
        self.trials = trials.max(1);
        self
    }

    /// Builder method to set the warmup launch count.
    #[must_use]
    pub fn with_warmup(mut self, warmup: usize) -> Self {
        self.warmup = warmup;
        self
    }

    /// Returns the owned device.
    #[must_use]
    pub fn device(&self) -> &CudaDevice {
        &self.device
    }

    /// Returns the device's cached properties.
    #[must_use]
    pub fn properties(&self) -> &DeviceProperties {
        self.device.properties()
    }

    /// Benchmarks a launch closure and returns its timing statistics.
    ///
    /// The closure must issue exactly one kernel launch on the stream it is
    /// given; the executor times launch-to-completion, so extra work inside
    /// the closure pollutes the sample.
    pub fn bench<F>(&mut self, mut launch: F) -> Result<Statistics>
    where
        F: FnMut(&BenchStream) -> Result<()>,
    {
        let index = self.next_stream;
        self.next_stream = (self.next_stream + 1) % self.streams.len();
        let stream = &self.streams[index];

        // Warmup: primes module load and instruction caches, timing discarded.
        for _ in 0..self.warmup {
            launch(stream)?;
        }
        stream.synchronize()?;

        let samples = run_trials(self.trials, |_| {
            let start = Instant::now();
            launch(stream)?;
            stream.synchronize()?;
            Ok(start.elapsed())
        })?;

        let stats = Statistics::from_samples(&samples);
        tracing::debug!(
            stream = index,
            trials = stats.trials,
            average_us = stats.average_us(),
            fastest_us = stats.fastest_us(),
            "Completed benchmark"
        );
        Ok(stats)
    }
}

/// Runs `trials` timed steps, aborting at the first failure.
///
/// No retry logic and no partial results: an error from step `i` means
/// steps `i+1..` never run.
fn run_trials<F>(trials: usize, mut step: F) -> Result<Vec<Duration>>
where
    F: FnMut(usize) -> Result<Duration>,
{
    let mut samples = Vec::with_capacity(trials);
    for i in 0..trials {
        samples.push(step(i)?);
    }
    Ok(samples)
}
