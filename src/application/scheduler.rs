//! Periodic window-reset driver.
//!
//! One dedicated timer runs per gate, calling
//! [`reset_and_wake_all`](crate::AdmissionGate::reset_and_wake_all) once per
//! period. Firings never overlap: the thread variant is a single loop and
//! the async variant awaits each tick in turn. The callback is O(1)
//! (lock + zero + broadcast), so the cadence is stable.
//!
//! The first firing happens one full period after start. The reset a timer
//! could fire at t=0 would only zero an already-zero counter, so the no-op
//! initial tick is dropped and window boundaries align to scheduler start.

use crate::application::gate::AdmissionGate;

use parking_lot::{Condvar, Mutex};
use std::io;
use std::sync::Arc;
use std::thread::{self, JoinHandle};
use std::time::{Duration, Instant};
use tracing::debug;

/// Shared stop flag for the reset thread, with a condvar so shutdown
/// interrupts the inter-tick sleep immediately.
#[derive(Debug, Default)]
struct StopSignal {
    stopped: Mutex<bool>,
    wake: Condvar,
}

/// Handle owning a running reset thread.
///
/// Stopping is idempotent: call [`shutdown`](SchedulerHandle::shutdown), or
/// just drop the handle. Either way the thread is signalled and joined, so
/// gates constructed in tests never leave a timer running behind them.
#[derive(Debug)]
pub struct SchedulerHandle {
    signal: Arc<StopSignal>,
    thread: Option<JoinHandle<()>>,
}

impl SchedulerHandle {
    /// Stop future firings and wait for the reset thread to exit.
    pub fn shutdown(mut self) {
        self.stop_and_join();
    }

    fn stop_and_join(&mut self) {
        {
            let mut stopped = self.signal.stopped.lock();
            *stopped = true;
            self.signal.wake.notify_all();
        }
        if let Some(thread) = self.thread.take() {
            // The thread only parks on the signalled condvar, so this join
            // returns promptly.
            let _ = thread.join();
            debug!("window reset scheduler stopped");
        }
    }
}

impl Drop for SchedulerHandle {
    fn drop(&mut self) {
        self.stop_and_join();
    }
}

/// Spawns and owns the periodic reset task for an [`AdmissionGate`].
#[derive(Debug)]
pub struct WindowResetScheduler;

impl WindowResetScheduler {
    /// Start a dedicated thread resetting `gate` once per `period`.
    ///
    /// # Errors
    /// Returns the OS error if the thread cannot be spawned.
    pub fn start(gate: AdmissionGate, period: Duration) -> io::Result<SchedulerHandle> {
        let signal = Arc::new(StopSignal::default());
        let thread = thread::Builder::new().name("window-reset".into()).spawn({
            let signal = Arc::clone(&signal);
            move || run_reset_loop(&signal, &gate, period)
        })?;
        debug!(period_ms = period.as_millis() as u64, "window reset scheduler started");
        Ok(SchedulerHandle {
            signal,
            thread: Some(thread),
        })
    }

    /// Start a tokio task resetting `gate` once per `period`.
    ///
    /// The task keeps running until [`AsyncSchedulerHandle::shutdown`] is
    /// awaited (or the handle is aborted); dropping the handle does not
    /// stop it, matching tokio task semantics.
    #[cfg(feature = "async")]
    pub fn start_async(gate: AdmissionGate, period: Duration) -> AsyncSchedulerHandle {
        let (shutdown_tx, mut shutdown_rx) = tokio::sync::watch::channel(false);
        let task = tokio::spawn(async move {
            // interval_at skips the immediate tick a plain interval fires.
            let start = tokio::time::Instant::now() + period;
            let mut ticker = tokio::time::interval_at(start, period);
            ticker.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Delay);
            loop {
                tokio::select! {
                    _ = ticker.tick() => gate.reset_and_wake_all(),
                    _ = shutdown_rx.changed() => break,
                }
            }
        });
        debug!(period_ms = period.as_millis() as u64, "async window reset scheduler started");
        AsyncSchedulerHandle { shutdown_tx, task }
    }
}

fn run_reset_loop(signal: &StopSignal, gate: &AdmissionGate, period: Duration) {
    let mut deadline = Instant::now() + period;
    loop {
        {
            let mut stopped = signal.stopped.lock();
            while !*stopped {
                if signal.wake.wait_until(&mut stopped, deadline).timed_out() {
                    break;
                }
            }
            if *stopped {
                return;
            }
        }
        gate.reset_and_wake_all();
        deadline += period;
    }
}

/// Handle owning a running async reset task.
#[cfg(feature = "async")]
#[derive(Debug)]
pub struct AsyncSchedulerHandle {
    shutdown_tx: tokio::sync::watch::Sender<bool>,
    task: tokio::task::JoinHandle<()>,
}

#[cfg(feature = "async")]
impl AsyncSchedulerHandle {
    /// Stop future firings and wait for the task to finish.
    ///
    /// # Errors
    /// Returns the [`JoinError`](tokio::task::JoinError) if the task
    /// panicked.
    pub async fn shutdown(self) -> Result<(), tokio::task::JoinError> {
        let _ = self.shutdown_tx.send(true);
        self.task.await
    }

    /// Abort the task without waiting.
    pub fn abort(&self) {
        self.task.abort();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::config::{GateConfig, TimeUnit};

    fn gate(limit: u64) -> AdmissionGate {
        AdmissionGate::new(GateConfig::new(TimeUnit::Seconds, limit).unwrap())
    }

    #[test]
    fn test_scheduler_fires_periodically() {
        let gate = gate(1);
        let handle = WindowResetScheduler::start(gate.clone(), Duration::from_millis(40)).unwrap();

        thread::sleep(Duration::from_millis(220));
        handle.shutdown();

        // ~5 ticks elapsed; allow generous slack for slow CI.
        let resets = gate.metrics().window_resets();
        assert!(resets >= 2, "expected at least 2 resets, saw {resets}");
    }

    #[test]
    fn test_no_firing_before_first_period() {
        let gate = gate(1);
        let handle =
            WindowResetScheduler::start(gate.clone(), Duration::from_millis(200)).unwrap();

        thread::sleep(Duration::from_millis(60));
        assert_eq!(gate.metrics().window_resets(), 0);
        handle.shutdown();
    }

    #[test]
    fn test_shutdown_stops_firings() {
        let gate = gate(1);
        let handle = WindowResetScheduler::start(gate.clone(), Duration::from_millis(30)).unwrap();
        thread::sleep(Duration::from_millis(100));
        handle.shutdown();

        let after_shutdown = gate.metrics().window_resets();
        thread::sleep(Duration::from_millis(120));
        assert_eq!(gate.metrics().window_resets(), after_shutdown);
    }

    #[test]
    fn test_drop_stops_thread() {
        let gate = gate(1);
        {
            let _handle =
                WindowResetScheduler::start(gate.clone(), Duration::from_millis(30)).unwrap();
            thread::sleep(Duration::from_millis(80));
        }
        let after_drop = gate.metrics().window_resets();
        thread::sleep(Duration::from_millis(120));
        assert_eq!(gate.metrics().window_resets(), after_drop);
    }

    #[test]
    fn test_scheduler_releases_blocked_caller() {
        let gate = gate(1);
        gate.acquire().unwrap();
        let handle = WindowResetScheduler::start(gate.clone(), Duration::from_millis(50)).unwrap();

        let start = Instant::now();
        gate.acquire().unwrap();
        assert!(start.elapsed() < Duration::from_secs(1));
        handle.shutdown();
    }
}
