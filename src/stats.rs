//! Latency and bandwidth summaries.
//!
//! The two benchmark variants report bandwidth with different formulas and
//! the difference is observable in the output, so both are kept as distinct
//! constructors instead of being unified:
//!
//! * the NUMA variant derives bandwidth from the *mean latency*,
//! * the GPU variant averages the *per-sample bandwidths*.

pub const GIB: f64 = (1024u64 * 1024 * 1024) as f64;
pub const MIB: f64 = (1024u64 * 1024) as f64;

/// Averaged results of one benchmark run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Summary {
    pub avg_latency_ms: f64,
    pub avg_bandwidth_gib_s: f64,
    pub samples: usize,
}

impl Summary {
    /// Mean latency over all samples; bandwidth is `bytes` divided by that
    /// mean, in GiB/s.
    pub fn from_mean_latency(bytes: usize, samples_ms: &[f64]) -> Self {
        if samples_ms.is_empty() {
            return Self::empty();
        }

        let avg_latency_ms = samples_ms.iter().sum::<f64>() / samples_ms.len() as f64;
        let bytes_per_sec = bytes as f64 / (avg_latency_ms / 1000.0);
        Summary {
            avg_latency_ms,
            avg_bandwidth_gib_s: bytes_per_sec / GIB,
            samples: samples_ms.len(),
        }
    }

    /// Mean latency over all samples; bandwidth is computed per sample as
    /// `bytes / latency` and the per-sample bandwidths are averaged.
    pub fn from_mean_bandwidth(bytes: usize, samples_ms: &[f64]) -> Self {
        if samples_ms.is_empty() {
            return Self::empty();
        }

        let n = samples_ms.len() as f64;
        let avg_latency_ms = samples_ms.iter().sum::<f64>() / n;
        let sum_bytes_per_sec: f64 = samples_ms.iter().map(|ms| bytes as f64 / (ms / 1000.0)).sum();
        Summary {
            avg_latency_ms,
            avg_bandwidth_gib_s: sum_bytes_per_sec / n / GIB,
            samples: samples_ms.len(),
        }
    }

    // Zero devices produce zero samples; report zeroes rather than NaN.
    fn empty() -> Self {
        Summary {
            avg_latency_ms: 0.0,
            avg_bandwidth_gib_s: 0.0,
            samples: 0,
        }
    }
}
