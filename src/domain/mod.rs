//! Domain layer - pure admission-control logic with no external dependencies.
//!
//! This layer contains the core concepts and invariants of the admission
//! controller:
//! - Validated window configuration (time unit, limit)
//! - The fixed-window counter and its admission predicate
//!
//! All types in this layer are pure and easily testable.

pub mod config;
pub mod window;
