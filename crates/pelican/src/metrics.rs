//! Request-level metrics for the summarization services.

use std::sync::atomic::{AtomicU64, Ordering};

/// Counters for summarization request handling.
#[derive(Debug, Default)]
pub struct ServiceMetrics {
    /// Total requests served successfully.
    total_requests: AtomicU64,
    /// Requests rejected before reaching a model (unsupported task or
    /// unknown model id).
    total_rejections: AtomicU64,
    /// Requests that failed inside the model invocation.
    total_errors: AtomicU64,
}

impl ServiceMetrics {
    /// Records a completed request.
    pub fn record_request(&self) {
        self.total_requests.fetch_add(1, Ordering::Relaxed);
    }

    /// Records a request rejected by validation.
    pub fn record_rejection(&self) {
        self.total_rejections.fetch_add(1, Ordering::Relaxed);
    }

    /// Records an inference failure.
    pub fn record_error(&self) {
        self.total_errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Returns the total number of completed requests.
    #[must_use]
    pub fn requests(&self) -> u64 {
        self.total_requests.load(Ordering::Relaxed)
    }

    /// Returns the total number of rejected requests.
    #[must_use]
    pub fn rejections(&self) -> u64 {
        self.total_rejections.load(Ordering::Relaxed)
    }

    /// Returns the total number of inference failures.
    #[must_use]
    pub fn errors(&self) -> u64 {
        self.total_errors.load(Ordering::Relaxed)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_counters() {
        let metrics = ServiceMetrics::default();
        metrics.record_request();
        metrics.record_request();
        metrics.record_rejection();
        metrics.record_error();

        assert_eq!(metrics.requests(), 2);
        assert_eq!(metrics.rejections(), 1);
        assert_eq!(metrics.errors(), 1);
    }
}
