//! Basic example demonstrating window-based admission control.
//!
//! This example paces 12 simulated calls through a 3-per-second limiter:
//! each window admits a burst of 3, then the callers block until the next
//! reset.

use std::time::Instant;
use window_gate::{TimeUnit, WindowLimiter};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::DEBUG)
        .init();

    let limiter = WindowLimiter::builder()
        .with_unit(TimeUnit::Seconds)
        .with_limit(3)
        .build()?;

    println!("=== Window Gate Example ===\n");
    println!("Policy: at most 3 calls per second\n");

    let start = Instant::now();
    for call in 1..=12 {
        limiter.acquire()?;
        println!(
            "call {call:2} admitted at {:6.2}s (window count: {})",
            start.elapsed().as_secs_f64(),
            limiter.gate().count(),
        );
    }

    let snapshot = limiter.metrics().snapshot();
    println!("\nadmitted: {}", snapshot.calls_admitted);
    println!("blocked waits: {}", snapshot.waits);
    println!("window resets: {}", snapshot.window_resets);

    limiter.shutdown();
    println!("\n=== Example Complete ===");
    println!("Notice: admissions arrive in bursts of 3, one burst per second.");
    Ok(())
}
