//! Latency tracking and run statistics.
//!
//! Submit latencies go into an HdrHistogram; execution counts are tallied
//! from the reports the engine emits.

use std::fmt;

use hdrhistogram::Histogram;

pub mod stats;

pub use stats::ExecutionStats;

/// Submit latency histogram, in nanoseconds.
pub struct LatencyHistogram {
    histogram: Histogram<u64>,
}

impl LatencyHistogram {
    /// Create a new histogram with 3 significant digits.
    pub fn new() -> Self {
        Self::with_precision(3)
    }

    /// Create with custom precision (clamped to 1-5 significant digits).
    pub fn with_precision(sigfig: u8) -> Self {
        Self {
            histogram: Histogram::new(sigfig.clamp(1, 5)).expect("1-5 significant digits is always valid"),
        }
    }

    /// Record a latency value in nanoseconds.
    #[inline(always)]
    pub fn record(&mut self, nanos: u64) {
        // auto-resizing histogram, only u64 overflow can fail
        let _ = self.histogram.record(nanos);
    }

    /// Get value at percentile (0.0 - 100.0).
    pub fn value_at_percentile(&self, percentile: f64) -> u64 {
        self.histogram.value_at_quantile(percentile / 100.0)
    }

    /// Get P50 (median) latency.
    pub fn p50(&self) -> u64 {
        self.value_at_percentile(50.0)
    }

    /// Get P99 latency.
    pub fn p99(&self) -> u64 {
        self.value_at_percentile(99.0)
    }

    /// Get P99.9 latency.
    pub fn p999(&self) -> u64 {
        self.value_at_percentile(99.9)
    }

    /// Get maximum latency.
    pub fn max(&self) -> u64 {
        self.histogram.max()
    }

    /// Get minimum latency.
    pub fn min(&self) -> u64 {
        self.histogram.min()
    }

    /// Get mean latency.
    pub fn mean(&self) -> f64 {
        self.histogram.mean()
    }

    /// Get total count of recorded values.
    pub fn count(&self) -> u64 {
        self.histogram.len()
    }

    /// Reset the histogram.
    pub fn reset(&mut self) {
        self.histogram.reset();
    }

    /// Snapshot of the headline percentiles.
    pub fn summary(&self) -> LatencySummary {
        LatencySummary {
            count: self.count(),
            p50: self.p50(),
            p99: self.p99(),
            p999: self.p999(),
            max: self.max(),
        }
    }

    /// Format latency with appropriate units.
    pub fn format_latency(nanos: u64) -> String {
        if nanos < 1_000 {
            format!("{} ns", nanos)
        } else if nanos < 1_000_000 {
            format!("{:.2} μs", nanos as f64 / 1_000.0)
        } else if nanos < 1_000_000_000 {
            format!("{:.2} ms", nanos as f64 / 1_000_000.0)
        } else {
            format!("{:.2} s", nanos as f64 / 1_000_000_000.0)
        }
    }
}

impl Default for LatencyHistogram {
    fn default() -> Self {
        Self::new()
    }
}

/// Headline latency percentiles.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct LatencySummary {
    pub count: u64,
    pub p50: u64,
    pub p99: u64,
    pub p999: u64,
    pub max: u64,
}

impl fmt::Display for LatencySummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "n={} p50={} p99={} p99.9={} max={}",
            self.count,
            LatencyHistogram::format_latency(self.p50),
            LatencyHistogram::format_latency(self.p99),
            LatencyHistogram::format_latency(self.p999),
            LatencyHistogram::format_latency(self.max),
        )
    }
}

/// Low-overhead interval timer.
pub struct Stopwatch {
    clock: quanta::Clock,
}

impl Stopwatch {
    pub fn new() -> Self {
        Self {
            clock: quanta::Clock::new(),
        }
    }

    /// Get current raw timestamp.
    #[inline(always)]
    pub fn start(&self) -> u64 {
        self.clock.raw()
    }

    /// Nanoseconds since `start`.
    #[inline(always)]
    pub fn elapsed_nanos(&self, start: u64) -> u64 {
        self.clock.delta_as_nanos(start, self.clock.raw())
    }

    /// Run `f` and record how long it took.
    #[inline]
    pub fn time<T>(&self, histogram: &mut LatencyHistogram, f: impl FnOnce() -> T) -> T {
        let start = self.start();
        let out = f();
        histogram.record(self.elapsed_nanos(start));
        out
    }
}

impl Default for Stopwatch {
    fn default() -> Self {
        Self::new()
    }
}
