//! # window-gate
//!
//! Blocking fixed-window admission control for rate-limited calls.
//!
//! This crate provides a thread-safe admission gate that allows up to N
//! operations per fixed time window (seconds, minutes or hours). Callers
//! that would exceed the limit block until the window resets; the reset
//! zeroes the counter and releases all waiters atomically. Place the gate
//! immediately before any externally rate-limited operation (an outbound
//! API call, a quota-bound job submission) and it will pace callers to the
//! configured budget.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use window_gate::{TimeUnit, WindowLimiter};
//!
//! // At most 5 calls per second; the reset scheduler starts with the limiter.
//! let limiter = WindowLimiter::new(TimeUnit::Seconds, 5)?;
//!
//! for job in 0..100 {
//!     limiter.acquire()?; // blocks once the window is full
//!     submit(job);        // the rate-limited call
//! }
//!
//! limiter.shutdown(); // stops the reset thread, releases any waiters
//! # fn submit(_job: u32) {}
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! ## Semantics
//!
//! - **Fixed window**: at most `limit` admissions between consecutive
//!   resets; a reset fires once per window and zeroes the count. No
//!   sliding-window precision.
//! - **Blocking**: [`acquire`](WindowLimiter::acquire) waits indefinitely;
//!   [`acquire_timeout`](WindowLimiter::acquire_timeout) gives up with
//!   [`AcquireError::TimedOut`];
//!   [`try_acquire`](WindowLimiter::try_acquire) never waits and reports a
//!   `retry_after` hint at capacity.
//! - **No fairness**: waiters woken by a reset race to re-check the
//!   predicate; losers re-wait. With more waiters than slots, the surplus
//!   waits for the next reset.
//! - **Single global limit**: one counter per gate; no per-key limits, no
//!   cross-process coordination.
//!
//! ## Lower-level use
//!
//! [`AdmissionGate`] and [`WindowResetScheduler`] can be wired manually
//! when the facade does not fit — for example to drive resets from an
//! existing timer, or to share one gate between thread pools:
//!
//! ```rust
//! use window_gate::{AdmissionGate, GateConfig, TimeUnit};
//!
//! let gate = AdmissionGate::new(GateConfig::new(TimeUnit::Seconds, 2)?);
//! assert!(gate.try_acquire().is_admitted());
//! gate.reset_and_wake_all(); // manual window boundary
//! # Ok::<(), window_gate::ConfigError>(())
//! ```
//!
//! ## Observability
//!
//! Every gate tracks admissions, rejections, waits, timeouts and resets:
//!
//! ```rust,no_run
//! # use window_gate::{TimeUnit, WindowLimiter};
//! # let limiter = WindowLimiter::new(TimeUnit::Seconds, 5).unwrap();
//! let snapshot = limiter.metrics().snapshot();
//! println!("admitted: {}", snapshot.calls_admitted);
//! println!("rejection rate: {:.2}%", snapshot.rejection_rate() * 100.0);
//! ```
//!
//! The crate also emits `tracing` events: `trace!` per admission and reset,
//! `debug!` for scheduler and gate lifecycle.
//!
//! ## Features
//!
//! - `async`: a tokio-based reset scheduler
//!   ([`WindowResetScheduler::start_async`]) for applications that prefer a
//!   task over a dedicated thread.
//! - `serde`: `Serialize`/`Deserialize` on [`TimeUnit`] and
//!   [`MetricsSnapshot`].
//! - `test-helpers`: exposes `infrastructure::mocks::MockClock` for
//!   deterministic window-timing tests outside this crate.

pub mod application;
pub mod domain;
pub mod infrastructure;

pub use application::gate::{AcquireError, Admission, AdmissionGate};
pub use application::metrics::{GateMetrics, MetricsSnapshot};
pub use application::ports::Clock;
pub use application::scheduler::{SchedulerHandle, WindowResetScheduler};
pub use domain::config::{ConfigError, GateConfig, TimeUnit};
pub use domain::window::{AdmissionDecision, WindowState};
pub use infrastructure::clock::SystemClock;
pub use infrastructure::limiter::{BuildError, WindowLimiter, WindowLimiterBuilder};

#[cfg(feature = "async")]
pub use application::scheduler::AsyncSchedulerHandle;
