//! The admission gate - a blocking monitor around the window counter.
//!
//! One `parking_lot::Mutex` owns the counter end-to-end, paired with one
//! `Condvar`. `acquire` waits on the condvar while the window is at
//! capacity; `reset_and_wake_all` zeroes the counter and broadcasts, so all
//! waiters race to re-check the predicate. No fairness ordering is promised
//! among waiters; losers of the re-check race simply re-wait.
//!
//! Critical sections are O(1) and never perform I/O, so contention is
//! bounded by window length and waiter count.

use crate::application::metrics::GateMetrics;
use crate::application::ports::Clock;
use crate::domain::config::GateConfig;
use crate::domain::window::{AdmissionDecision, WindowState};
use crate::infrastructure::clock::SystemClock;

use parking_lot::{Condvar, Mutex};
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{debug, trace};

/// Error returned when a blocking acquire does not end in admission.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AcquireError {
    /// The gate was closed while (or before) waiting
    Closed,
    /// The deadline elapsed before capacity became available
    TimedOut,
}

impl std::fmt::Display for AcquireError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            AcquireError::Closed => write!(f, "admission gate is closed"),
            AcquireError::TimedOut => {
                write!(f, "timed out waiting for window capacity")
            }
        }
    }
}

impl std::error::Error for AcquireError {}

/// Outcome of a non-blocking admission probe.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Admission {
    /// The caller was admitted
    Admitted,
    /// The window is at capacity
    AtCapacity {
        /// Best-effort hint: time left until the next window reset.
        retry_after: Duration,
    },
}

impl Admission {
    /// Check if this outcome is Admitted.
    pub fn is_admitted(&self) -> bool {
        matches!(self, Admission::Admitted)
    }
}

/// State owned by the gate's mutex.
#[derive(Debug)]
struct GateState {
    window: WindowState,
    /// When the current window opened (construction or last reset).
    window_started: Instant,
    closed: bool,
}

#[derive(Debug)]
struct GateInner {
    config: GateConfig,
    state: Mutex<GateState>,
    capacity_freed: Condvar,
    clock: Arc<dyn Clock>,
    metrics: GateMetrics,
}

/// Thread-safe, window-based admission gate.
///
/// Cheap to clone; clones share the same counter, condvar and metrics.
/// Construct one with a validated [`GateConfig`], call
/// [`acquire`](AdmissionGate::acquire) before each gated operation, and
/// drive [`reset_and_wake_all`](AdmissionGate::reset_and_wake_all) from a
/// [`WindowResetScheduler`](crate::application::scheduler::WindowResetScheduler)
/// (or manually in tests).
///
/// # Example
/// ```
/// use window_gate::{AdmissionGate, GateConfig, TimeUnit};
///
/// let gate = AdmissionGate::new(GateConfig::new(TimeUnit::Seconds, 2)?);
/// assert!(gate.try_acquire().is_admitted());
/// assert!(gate.try_acquire().is_admitted());
/// assert!(!gate.try_acquire().is_admitted());
///
/// gate.reset_and_wake_all();
/// assert!(gate.try_acquire().is_admitted());
/// # Ok::<(), window_gate::ConfigError>(())
/// ```
#[derive(Debug, Clone)]
pub struct AdmissionGate {
    inner: Arc<GateInner>,
}

impl AdmissionGate {
    /// Create a gate using the system clock.
    pub fn new(config: GateConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock::new()))
    }

    /// Create a gate with a custom clock.
    ///
    /// The clock is only consulted for window-start timestamps (the
    /// `retry_after` hint and [`time_until_reset`](Self::time_until_reset));
    /// blocking waits always measure real time.
    pub fn with_clock(config: GateConfig, clock: Arc<dyn Clock>) -> Self {
        let state = GateState {
            window: WindowState::new(config.limit()),
            window_started: clock.now(),
            closed: false,
        };
        Self {
            inner: Arc::new(GateInner {
                config,
                state: Mutex::new(state),
                capacity_freed: Condvar::new(),
                clock,
                metrics: GateMetrics::new(),
            }),
        }
    }

    /// Block until admitted into the current window.
    ///
    /// Returns as soon as the window has capacity, incrementing the count
    /// by exactly one. Callers that find the window full wait on the
    /// condvar and re-check after every wakeup, so no more than
    /// `limit` callers are ever admitted between consecutive resets.
    ///
    /// # Errors
    /// Returns [`AcquireError::Closed`] if the gate is closed before the
    /// caller is admitted.
    pub fn acquire(&self) -> Result<(), AcquireError> {
        let mut state = self.inner.state.lock();
        let mut waited = false;
        loop {
            if state.closed {
                return Err(AcquireError::Closed);
            }
            if state.window.try_admit() == AdmissionDecision::Admitted {
                self.inner.metrics.record_admitted();
                trace!(count = state.window.count(), "caller admitted");
                return Ok(());
            }
            if !waited {
                waited = true;
                self.inner.metrics.record_wait();
                trace!("window at capacity, waiting for reset");
            }
            self.inner.capacity_freed.wait(&mut state);
        }
    }

    /// Block until admitted, or until `timeout` elapses.
    ///
    /// Bounded-wait variant of [`acquire`](Self::acquire).
    ///
    /// # Errors
    /// Returns [`AcquireError::TimedOut`] if the timeout elapses while the
    /// window is still at capacity, or [`AcquireError::Closed`] if the gate
    /// is closed first.
    pub fn acquire_timeout(&self, timeout: Duration) -> Result<(), AcquireError> {
        let deadline = Instant::now() + timeout;
        let mut state = self.inner.state.lock();
        let mut waited = false;
        loop {
            if state.closed {
                return Err(AcquireError::Closed);
            }
            if state.window.try_admit() == AdmissionDecision::Admitted {
                self.inner.metrics.record_admitted();
                trace!(count = state.window.count(), "caller admitted");
                return Ok(());
            }
            if !waited {
                waited = true;
                self.inner.metrics.record_wait();
            }
            if self
                .inner
                .capacity_freed
                .wait_until(&mut state, deadline)
                .timed_out()
            {
                // One final re-check: a reset may have raced the timeout.
                if state.closed {
                    return Err(AcquireError::Closed);
                }
                return match state.window.try_admit() {
                    AdmissionDecision::Admitted => {
                        self.inner.metrics.record_admitted();
                        Ok(())
                    }
                    AdmissionDecision::AtCapacity => {
                        self.inner.metrics.record_timeout();
                        Err(AcquireError::TimedOut)
                    }
                };
            }
        }
    }

    /// Probe for admission without blocking.
    ///
    /// At capacity, the returned [`Admission::AtCapacity`] carries a
    /// best-effort `retry_after` hint: the time left until the next reset,
    /// measured from the window-start timestamp.
    pub fn try_acquire(&self) -> Admission {
        let mut state = self.inner.state.lock();
        if state.closed {
            // A closed gate admits nobody; retrying will not help either.
            self.inner.metrics.record_rejected();
            return Admission::AtCapacity {
                retry_after: Duration::ZERO,
            };
        }
        match state.window.try_admit() {
            AdmissionDecision::Admitted => {
                self.inner.metrics.record_admitted();
                Admission::Admitted
            }
            AdmissionDecision::AtCapacity => {
                let elapsed = self
                    .inner
                    .clock
                    .now()
                    .saturating_duration_since(state.window_started);
                self.inner.metrics.record_rejected();
                Admission::AtCapacity {
                    retry_after: self.inner.config.window().saturating_sub(elapsed),
                }
            }
        }
    }

    /// Zero the counter and wake every waiter.
    ///
    /// The reset and the broadcast happen under the same lock, so a caller
    /// can never observe a half-reset window or be admitted across the
    /// boundary beyond the limit. Safe to call with no waiters and a count
    /// of zero; that is a no-op apart from restamping the window start.
    pub fn reset_and_wake_all(&self) {
        let mut state = self.inner.state.lock();
        let closing_count = state.window.reset();
        state.window_started = self.inner.clock.now();
        let woken = self.inner.capacity_freed.notify_all();
        drop(state);
        self.inner.metrics.record_reset();
        trace!(closing_count, woken, "window reset");
    }

    /// Close the gate, waking all waiters with [`AcquireError::Closed`].
    ///
    /// Blocked and future acquires fail; the counter state is left intact.
    /// Idempotent.
    pub fn close(&self) {
        let mut state = self.inner.state.lock();
        if state.closed {
            return;
        }
        state.closed = true;
        let woken = self.inner.capacity_freed.notify_all();
        drop(state);
        debug!(woken, "admission gate closed");
    }

    /// Whether the gate has been closed.
    pub fn is_closed(&self) -> bool {
        self.inner.state.lock().closed
    }

    /// Admissions in the current window.
    pub fn count(&self) -> u64 {
        self.inner.state.lock().window.count()
    }

    /// Remaining capacity in the current window.
    pub fn remaining(&self) -> u64 {
        self.inner.state.lock().window.remaining()
    }

    /// Best-effort time left until the next window reset.
    pub fn time_until_reset(&self) -> Duration {
        let state = self.inner.state.lock();
        let elapsed = self
            .inner
            .clock
            .now()
            .saturating_duration_since(state.window_started);
        self.inner.config.window().saturating_sub(elapsed)
    }

    /// The gate's configuration.
    pub fn config(&self) -> &GateConfig {
        &self.inner.config
    }

    /// Observability metrics for this gate.
    pub fn metrics(&self) -> &GateMetrics {
        &self.inner.metrics
    }
}
