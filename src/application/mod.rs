//! Application layer - orchestration of the admission monitor.
//!
//! This layer coordinates the domain logic and manages runtime behavior:
//! - Admission gate (the blocking monitor around the window counter)
//! - Window reset scheduler (periodic reset driver)
//! - Gate metrics (observability counters)
//!
//! ## Ports
//!
//! The application layer defines ports (traits) that infrastructure
//! adapters must implement. This keeps the application layer independent
//! from infrastructure details.

pub mod gate;
pub mod metrics;
pub mod ports;
pub mod scheduler;
