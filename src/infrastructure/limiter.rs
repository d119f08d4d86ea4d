//! The `WindowLimiter` facade.
//!
//! Wires an [`AdmissionGate`] to its [`WindowResetScheduler`] and ties both
//! to one owned lifecycle: building the limiter starts the reset thread,
//! shutting it down (or dropping it) stops the thread and closes the gate.
//! Nothing is process-global, so limiters built in tests never share a
//! hidden timer.

use crate::application::gate::{AcquireError, Admission, AdmissionGate};
use crate::application::metrics::GateMetrics;
use crate::application::ports::Clock;
use crate::application::scheduler::{SchedulerHandle, WindowResetScheduler};
use crate::domain::config::{ConfigError, GateConfig, TimeUnit};
use crate::infrastructure::clock::SystemClock;

use std::sync::Arc;
use std::time::Duration;
use tracing::debug;

/// Error returned when building a [`WindowLimiter`] fails.
#[derive(Debug)]
pub enum BuildError {
    /// Gate configuration validation failed
    Config(ConfigError),
    /// The reset thread could not be spawned
    Spawn(std::io::Error),
}

impl std::fmt::Display for BuildError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            BuildError::Config(e) => write!(f, "gate configuration error: {e}"),
            BuildError::Spawn(e) => write!(f, "failed to spawn reset thread: {e}"),
        }
    }
}

impl std::error::Error for BuildError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            BuildError::Config(e) => Some(e),
            BuildError::Spawn(e) => Some(e),
        }
    }
}

impl From<ConfigError> for BuildError {
    fn from(e: ConfigError) -> Self {
        BuildError::Config(e)
    }
}

/// Builder for constructing a [`WindowLimiter`].
#[derive(Debug)]
pub struct WindowLimiterBuilder {
    unit: TimeUnit,
    limit: u64,
    clock: Option<Arc<dyn Clock>>,
    start_scheduler: bool,
}

impl WindowLimiterBuilder {
    fn new() -> Self {
        Self {
            unit: TimeUnit::Seconds,
            limit: 1,
            clock: None,
            start_scheduler: true,
        }
    }

    /// Set the window time unit.
    pub fn with_unit(mut self, unit: TimeUnit) -> Self {
        self.unit = unit;
        self
    }

    /// Set the admissions-per-window limit.
    pub fn with_limit(mut self, limit: u64) -> Self {
        self.limit = limit;
        self
    }

    /// Use a custom clock for window-start timestamps.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = Some(clock);
        self
    }

    /// Do not start the reset scheduler.
    ///
    /// Resets must then be driven through
    /// [`WindowLimiter::reset_and_wake_all`]. Intended for tests that need
    /// deterministic window boundaries.
    pub fn manually_reset(mut self) -> Self {
        self.start_scheduler = false;
        self
    }

    /// Build the limiter, starting its reset scheduler.
    ///
    /// # Errors
    /// Returns [`BuildError::Config`] for an invalid `(unit, limit)` pair —
    /// before any scheduler is started — and [`BuildError::Spawn`] if the
    /// reset thread cannot be spawned.
    pub fn build(self) -> Result<WindowLimiter, BuildError> {
        let config = GateConfig::new(self.unit, self.limit)?;
        let clock = self
            .clock
            .unwrap_or_else(|| Arc::new(SystemClock::new()));
        let gate = AdmissionGate::with_clock(config.clone(), clock);
        let scheduler = if self.start_scheduler {
            Some(
                WindowResetScheduler::start(gate.clone(), config.window())
                    .map_err(BuildError::Spawn)?,
            )
        } else {
            None
        };
        debug!(
            unit = %config.unit(),
            limit = config.limit(),
            scheduled = scheduler.is_some(),
            "window limiter built"
        );
        Ok(WindowLimiter { gate, scheduler })
    }
}

/// A window-based call limiter with its own reset schedule.
///
/// The one-stop entry point: construction validates the configuration and
/// starts the periodic reset task; [`acquire`](WindowLimiter::acquire)
/// gates each rate-limited call; dropping the limiter (or calling
/// [`shutdown`](WindowLimiter::shutdown)) stops the reset task and releases
/// any blocked callers with [`AcquireError::Closed`].
///
/// # Example
/// ```no_run
/// use window_gate::{TimeUnit, WindowLimiter};
///
/// let limiter = WindowLimiter::new(TimeUnit::Seconds, 5)?;
/// for _ in 0..20 {
///     limiter.acquire()?; // blocks past 5 calls/second
///     // ... perform the rate-limited call ...
/// }
/// limiter.shutdown();
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Debug)]
pub struct WindowLimiter {
    gate: AdmissionGate,
    scheduler: Option<SchedulerHandle>,
}

impl WindowLimiter {
    /// Create a limiter with the given unit and limit.
    ///
    /// # Errors
    /// See [`WindowLimiterBuilder::build`].
    pub fn new(unit: TimeUnit, limit: u64) -> Result<Self, BuildError> {
        Self::builder().with_unit(unit).with_limit(limit).build()
    }

    /// Create a builder with defaults: 1 admission per second.
    pub fn builder() -> WindowLimiterBuilder {
        WindowLimiterBuilder::new()
    }

    /// Block until admitted into the current window.
    ///
    /// # Errors
    /// Returns [`AcquireError::Closed`] once the limiter is shut down.
    pub fn acquire(&self) -> Result<(), AcquireError> {
        self.gate.acquire()
    }

    /// Block until admitted, or until `timeout` elapses.
    ///
    /// # Errors
    /// See [`AdmissionGate::acquire_timeout`].
    pub fn acquire_timeout(&self, timeout: Duration) -> Result<(), AcquireError> {
        self.gate.acquire_timeout(timeout)
    }

    /// Probe for admission without blocking.
    pub fn try_acquire(&self) -> Admission {
        self.gate.try_acquire()
    }

    /// Zero the counter and wake every waiter.
    ///
    /// Only useful in manual-reset mode; with a running scheduler this just
    /// shortens the current window.
    pub fn reset_and_wake_all(&self) {
        self.gate.reset_and_wake_all();
    }

    /// The underlying gate, for sharing with worker threads.
    pub fn gate(&self) -> &AdmissionGate {
        &self.gate
    }

    /// The gate's configuration.
    pub fn config(&self) -> &GateConfig {
        self.gate.config()
    }

    /// Observability metrics.
    pub fn metrics(&self) -> &GateMetrics {
        self.gate.metrics()
    }

    /// Stop the reset scheduler and close the gate.
    ///
    /// Blocked callers are released with [`AcquireError::Closed`].
    pub fn shutdown(mut self) {
        self.teardown();
    }

    fn teardown(&mut self) {
        if let Some(scheduler) = self.scheduler.take() {
            scheduler.shutdown();
        }
        if !self.gate.is_closed() {
            self.gate.close();
        }
    }
}

impl Drop for WindowLimiter {
    fn drop(&mut self) {
        self.teardown();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_rejects_unsupported_unit() {
        // Construction fails before any scheduler starts.
        let result = WindowLimiter::new(TimeUnit::Days, 5);
        assert!(matches!(
            result,
            Err(BuildError::Config(ConfigError::UnsupportedUnit(
                TimeUnit::Days
            )))
        ));
    }

    #[test]
    fn test_build_rejects_zero_limit() {
        let result = WindowLimiter::builder().with_limit(0).build();
        assert!(matches!(
            result,
            Err(BuildError::Config(ConfigError::ZeroLimit))
        ));
    }

    #[test]
    fn test_manual_mode_has_no_scheduler() {
        let limiter = WindowLimiter::builder()
            .with_unit(TimeUnit::Minutes)
            .with_limit(2)
            .manually_reset()
            .build()
            .unwrap();

        assert!(limiter.try_acquire().is_admitted());
        assert!(limiter.try_acquire().is_admitted());
        assert!(!limiter.try_acquire().is_admitted());

        limiter.reset_and_wake_all();
        assert!(limiter.try_acquire().is_admitted());
        assert_eq!(limiter.metrics().window_resets(), 1);
    }

    #[test]
    fn test_shutdown_closes_gate() {
        let limiter = WindowLimiter::builder()
            .with_limit(1)
            .manually_reset()
            .build()
            .unwrap();
        let gate = limiter.gate().clone();

        limiter.shutdown();
        assert_eq!(gate.acquire(), Err(AcquireError::Closed));
    }

    #[test]
    fn test_drop_releases_blocked_caller() {
        let limiter = WindowLimiter::builder()
            .with_unit(TimeUnit::Hours)
            .with_limit(1)
            .manually_reset()
            .build()
            .unwrap();
        limiter.acquire().unwrap();

        let worker = {
            let gate = limiter.gate().clone();
            std::thread::spawn(move || gate.acquire())
        };
        std::thread::sleep(Duration::from_millis(50));

        drop(limiter);
        assert_eq!(worker.join().unwrap(), Err(AcquireError::Closed));
    }

    #[test]
    fn test_builder_defaults() {
        let limiter = WindowLimiter::builder().manually_reset().build().unwrap();
        assert_eq!(limiter.config().unit(), TimeUnit::Seconds);
        assert_eq!(limiter.config().limit(), 1);
    }
}
