//! Latency statistics for registered pipelines.

use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use parking_lot::RwLock;

const MAX_BUFFER_SIZE: usize = 1000;

/// Latency statistics for a single pipeline.
///
/// Counters use relaxed atomics; the percentile buffer keeps the most
/// recent measurements only.
#[derive(Debug, Default)]
pub struct LatencyStats {
    /// Sum of all latencies in microseconds.
    total_latency_us: AtomicU64,
    /// Number of completed requests.
    request_count: AtomicU64,
    /// Recent latencies for percentile calculation.
    recent_latencies: RwLock<Vec<u64>>,
}

impl LatencyStats {
    /// Creates new latency stats.
    #[must_use]
    pub fn new() -> Self {
        Self {
            total_latency_us: AtomicU64::new(0),
            request_count: AtomicU64::new(0),
            recent_latencies: RwLock::new(Vec::with_capacity(MAX_BUFFER_SIZE)),
        }
    }

    /// Records a latency measurement.
    pub fn record(&self, duration: Duration) {
        let us = u64::try_from(duration.as_micros()).unwrap_or(u64::MAX);
        self.total_latency_us.fetch_add(us, Ordering::Relaxed);
        self.request_count.fetch_add(1, Ordering::Relaxed);

        let mut recent = self.recent_latencies.write();
        if recent.len() >= MAX_BUFFER_SIZE {
            recent.remove(0);
        }
        recent.push(us);
    }

    /// Returns the average latency in milliseconds.
    #[must_use]
    pub fn average_latency_ms(&self) -> f64 {
        let count = self.request_count.load(Ordering::Relaxed);
        if count == 0 {
            return 0.0;
        }
        let total = self.total_latency_us.load(Ordering::Relaxed);
        (total as f64 / count as f64) / 1000.0
    }

    /// Returns the P50 latency in milliseconds.
    #[must_use]
    pub fn p50_latency_ms(&self) -> f64 {
        self.percentile_latency_ms(50)
    }

    /// Returns the P99 latency in milliseconds.
    #[must_use]
    pub fn p99_latency_ms(&self) -> f64 {
        self.percentile_latency_ms(99)
    }

    /// Returns the specified percentile latency in milliseconds.
    #[must_use]
    pub fn percentile_latency_ms(&self, percentile: u8) -> f64 {
        let recent = self.recent_latencies.read();
        if recent.is_empty() {
            return 0.0;
        }

        let mut sorted: Vec<_> = recent.clone();
        sorted.sort_unstable();

        let idx = ((f64::from(percentile) / 100.0) * (sorted.len() - 1) as f64) as usize;
        sorted.get(idx).copied().unwrap_or(0) as f64 / 1000.0
    }

    /// Returns the request count.
    #[must_use]
    pub fn request_count(&self) -> u64 {
        self.request_count.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_latency_stats() {
        let stats = LatencyStats::new();

        stats.record(Duration::from_millis(10));
        stats.record(Duration::from_millis(20));
        stats.record(Duration::from_millis(30));

        assert_eq!(stats.request_count(), 3);
        assert!((stats.average_latency_ms() - 20.0).abs() < 0.1);
        assert!(stats.p99_latency_ms() >= stats.p50_latency_ms());
    }

    #[test]
    fn test_empty_stats() {
        let stats = LatencyStats::new();
        assert_eq!(stats.request_count(), 0);
        assert!((stats.average_latency_ms() - 0.0).abs() < f64::EPSILON);
        assert!((stats.p50_latency_ms() - 0.0).abs() < f64::EPSILON);
    }
}
