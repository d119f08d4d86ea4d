//! Integration tests for admission semantics across windows.

use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};
use window_gate::{
    AdmissionGate, GateConfig, TimeUnit, WindowLimiter, WindowResetScheduler,
};

#[test]
fn test_five_per_second_sixth_blocks_until_reset() {
    // limit=5, unit=SECONDS: five immediate admissions, the sixth blocks
    // and returns once the 1-second window resets.
    let limiter = WindowLimiter::new(TimeUnit::Seconds, 5).unwrap();

    let start = Instant::now();
    for _ in 0..5 {
        limiter.acquire().unwrap();
    }
    assert!(
        start.elapsed() < Duration::from_millis(200),
        "first five admissions must not block"
    );

    limiter.acquire().unwrap();
    let waited = start.elapsed();
    assert!(
        waited <= Duration::from_millis(1500),
        "sixth caller should be released by the next reset, waited {waited:?}"
    );
    limiter.shutdown();
}

#[test]
fn test_limit_one_second_caller_waits_for_next_window() {
    // Manual-reset analog of the limit=1 two-thread scenario: exactly one
    // caller gets in immediately, the other stays blocked until the window
    // boundary.
    let limiter = WindowLimiter::builder()
        .with_unit(TimeUnit::Minutes)
        .with_limit(1)
        .manually_reset()
        .build()
        .unwrap();

    let first = Arc::new(AtomicU64::new(0));
    let handles: Vec<_> = (0..2)
        .map(|_| {
            let gate = limiter.gate().clone();
            let first = Arc::clone(&first);
            thread::spawn(move || {
                gate.acquire().unwrap();
                first.fetch_add(1, Ordering::SeqCst);
            })
        })
        .collect();

    thread::sleep(Duration::from_millis(150));
    assert_eq!(first.load(Ordering::SeqCst), 1, "exactly one immediate admission");

    limiter.reset_and_wake_all();
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(first.load(Ordering::SeqCst), 2);
}

#[test]
fn test_unsupported_unit_fails_before_scheduler_starts() {
    assert!(WindowLimiter::new(TimeUnit::Days, 5).is_err());
    assert!(GateConfig::new(TimeUnit::Milliseconds, 5).is_err());
}

#[test]
fn test_hundred_callers_limit_ten_all_eventually_admitted() {
    // 100 concurrent callers, limit 10, fast reset cycles: everyone gets in
    // within a handful of windows, never more than 10 per window.
    let gate = AdmissionGate::new(GateConfig::new(TimeUnit::Seconds, 10).unwrap());
    let scheduler =
        WindowResetScheduler::start(gate.clone(), Duration::from_millis(50)).unwrap();

    let admitted = Arc::new(AtomicU64::new(0));
    let handles: Vec<_> = (0..100)
        .map(|_| {
            let gate = gate.clone();
            let admitted = Arc::clone(&admitted);
            thread::spawn(move || {
                gate.acquire().unwrap();
                admitted.fetch_add(1, Ordering::SeqCst);
            })
        })
        .collect();

    // The count is lock-owned, so a sample can never exceed the limit.
    let deadline = Instant::now() + Duration::from_secs(5);
    while admitted.load(Ordering::SeqCst) < 100 {
        assert!(gate.count() <= 10, "count above limit: {}", gate.count());
        assert!(Instant::now() < deadline, "callers starved past deadline");
        thread::sleep(Duration::from_millis(5));
    }
    for h in handles {
        h.join().unwrap();
    }

    assert_eq!(admitted.load(Ordering::SeqCst), 100);
    // 100 admissions at <=10 per window takes at least 9 windows past the
    // first.
    assert!(gate.metrics().window_resets() >= 9);
    scheduler.shutdown();
}

#[test]
fn test_bursts_never_exceed_limit_per_window() {
    // Drive windows manually and verify per-window burst sizes.
    let gate = AdmissionGate::new(GateConfig::new(TimeUnit::Seconds, 4).unwrap());

    let admitted = Arc::new(AtomicU64::new(0));
    let handles: Vec<_> = (0..10)
        .map(|_| {
            let gate = gate.clone();
            let admitted = Arc::clone(&admitted);
            thread::spawn(move || {
                gate.acquire().unwrap();
                admitted.fetch_add(1, Ordering::SeqCst);
            })
        })
        .collect();

    let mut last_total = 0u64;
    for _ in 0..4 {
        thread::sleep(Duration::from_millis(100));
        let total = admitted.load(Ordering::SeqCst);
        assert!(total - last_total <= 4, "burst exceeded window limit");
        last_total = total;
        gate.reset_and_wake_all();
    }
    for h in handles {
        h.join().unwrap();
    }
    assert_eq!(admitted.load(Ordering::SeqCst), 10);
}

#[test]
fn test_metrics_across_windows() {
    let limiter = WindowLimiter::builder()
        .with_unit(TimeUnit::Seconds)
        .with_limit(2)
        .manually_reset()
        .build()
        .unwrap();

    assert!(limiter.try_acquire().is_admitted());
    assert!(limiter.try_acquire().is_admitted());
    assert!(!limiter.try_acquire().is_admitted());
    limiter.reset_and_wake_all();
    assert!(limiter.try_acquire().is_admitted());

    let snapshot = limiter.metrics().snapshot();
    assert_eq!(snapshot.calls_admitted, 3);
    assert_eq!(snapshot.calls_rejected, 1);
    assert_eq!(snapshot.window_resets, 1);
    assert!(snapshot.rejection_rate() > 0.0);
}
