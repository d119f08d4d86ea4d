//! Observability metrics for the admission gate.
//!
//! Provides counters about gate behavior for monitoring and debugging.
//! Metrics are observability only: admission decisions are made against the
//! lock-owned window counter, never against these atomics.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Metrics tracking admission-gate statistics.
///
/// All metrics use atomic operations for thread-safe updates and reads.
/// Metrics are collected throughout the gate's lifetime and can be queried
/// at any time.
#[derive(Debug, Clone)]
pub struct GateMetrics {
    inner: Arc<MetricsInner>,
}

#[derive(Debug)]
struct MetricsInner {
    /// Total number of callers admitted
    calls_admitted: AtomicU64,
    /// Total number of non-blocking probes rejected at capacity
    calls_rejected: AtomicU64,
    /// Total number of acquires that had to wait for a reset
    waits: AtomicU64,
    /// Total number of bounded waits that timed out
    wait_timeouts: AtomicU64,
    /// Total number of window resets
    window_resets: AtomicU64,
}

impl GateMetrics {
    /// Create a new metrics tracker.
    pub fn new() -> Self {
        Self {
            inner: Arc::new(MetricsInner {
                calls_admitted: AtomicU64::new(0),
                calls_rejected: AtomicU64::new(0),
                waits: AtomicU64::new(0),
                wait_timeouts: AtomicU64::new(0),
                window_resets: AtomicU64::new(0),
            }),
        }
    }

    /// Record an admitted caller.
    pub(crate) fn record_admitted(&self) {
        self.inner.calls_admitted.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a rejected non-blocking probe.
    pub(crate) fn record_rejected(&self) {
        self.inner.calls_rejected.fetch_add(1, Ordering::Relaxed);
    }

    /// Record an acquire that blocked.
    pub(crate) fn record_wait(&self) {
        self.inner.waits.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a bounded wait that timed out.
    pub(crate) fn record_timeout(&self) {
        self.inner.wait_timeouts.fetch_add(1, Ordering::Relaxed);
    }

    /// Record a window reset.
    pub(crate) fn record_reset(&self) {
        self.inner.window_resets.fetch_add(1, Ordering::Relaxed);
    }

    /// Get the total number of callers admitted.
    pub fn calls_admitted(&self) -> u64 {
        self.inner.calls_admitted.load(Ordering::Relaxed)
    }

    /// Get the total number of rejected non-blocking probes.
    pub fn calls_rejected(&self) -> u64 {
        self.inner.calls_rejected.load(Ordering::Relaxed)
    }

    /// Get the total number of acquires that blocked.
    pub fn waits(&self) -> u64 {
        self.inner.waits.load(Ordering::Relaxed)
    }

    /// Get the total number of bounded waits that timed out.
    pub fn wait_timeouts(&self) -> u64 {
        self.inner.wait_timeouts.load(Ordering::Relaxed)
    }

    /// Get the total number of window resets.
    pub fn window_resets(&self) -> u64 {
        self.inner.window_resets.load(Ordering::Relaxed)
    }

    /// Get a snapshot of all metrics.
    pub fn snapshot(&self) -> MetricsSnapshot {
        MetricsSnapshot {
            calls_admitted: self.calls_admitted(),
            calls_rejected: self.calls_rejected(),
            waits: self.waits(),
            wait_timeouts: self.wait_timeouts(),
            window_resets: self.window_resets(),
        }
    }

    /// Reset all metrics to zero.
    ///
    /// Useful for testing or when starting a new monitoring period.
    pub fn reset(&self) {
        self.inner.calls_admitted.store(0, Ordering::Relaxed);
        self.inner.calls_rejected.store(0, Ordering::Relaxed);
        self.inner.waits.store(0, Ordering::Relaxed);
        self.inner.wait_timeouts.store(0, Ordering::Relaxed);
        self.inner.window_resets.store(0, Ordering::Relaxed);
    }
}

impl Default for GateMetrics {
    fn default() -> Self {
        Self::new()
    }
}

/// A point-in-time snapshot of gate metrics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
pub struct MetricsSnapshot {
    /// Total number of callers admitted
    pub calls_admitted: u64,
    /// Total number of non-blocking probes rejected at capacity
    pub calls_rejected: u64,
    /// Total number of acquires that had to wait for a reset
    pub waits: u64,
    /// Total number of bounded waits that timed out
    pub wait_timeouts: u64,
    /// Total number of window resets
    pub window_resets: u64,
}

impl MetricsSnapshot {
    /// Calculate the rejection rate (0.0 to 1.0).
    ///
    /// Returns the ratio of rejected probes to total decided calls.
    /// Returns 0.0 if no calls have been decided.
    pub fn rejection_rate(&self) -> f64 {
        let total = self.calls_admitted.saturating_add(self.calls_rejected);
        if total == 0 {
            0.0
        } else {
            self.calls_rejected as f64 / total as f64
        }
    }
}
