//! Test doubles for deterministic testing.

mod clock;

pub use clock::MockClock;
