//! Infrastructure layer - adapters and the public facade.
//!
//! This layer provides:
//! - Clock adapter (system time vs mock)
//! - The `WindowLimiter` facade wiring a gate to its reset scheduler

pub mod clock;
pub mod limiter;

/// Mock implementations for testing.
///
/// This module is only available when the `test-helpers` feature is
/// enabled, or during test builds. It provides a controllable clock for
/// testing window timing deterministically.
///
/// To use the mocks in integration tests, add to your `Cargo.toml`:
/// ```toml
/// [dev-dependencies]
/// window-gate = { version = "*", features = ["test-helpers"] }
/// ```
#[cfg(any(test, feature = "test-helpers"))]
pub mod mocks;
