//! Window configuration for the admission gate.
//!
//! Configuration is validated once, at construction. A gate that exists is
//! a gate with a well-formed window: a positive limit and a unit that maps
//! to a known window duration. Nothing is re-checked at call time.

use std::str::FromStr;
use std::time::Duration;

#[cfg(feature = "serde")]
use serde::{Deserialize, Serialize};

/// Error returned when gate configuration validation fails.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfigError {
    /// The admission limit must be greater than zero
    ZeroLimit,
    /// The time unit does not map to a supported window duration
    UnsupportedUnit(TimeUnit),
    /// A unit name could not be parsed
    UnknownUnitName,
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::ZeroLimit => {
                write!(f, "admission limit must be greater than 0")
            }
            ConfigError::UnsupportedUnit(unit) => {
                write!(f, "unsupported window unit: {unit}")
            }
            ConfigError::UnknownUnitName => {
                write!(f, "unknown time unit name")
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Time unit a window can be expressed in.
///
/// Only [`Seconds`](TimeUnit::Seconds), [`Minutes`](TimeUnit::Minutes) and
/// [`Hours`](TimeUnit::Hours) map to a window duration; the remaining
/// variants are recognized names that fail [`GateConfig`] construction with
/// [`ConfigError::UnsupportedUnit`].
///
/// # Example
/// ```
/// use window_gate::{ConfigError, GateConfig, TimeUnit};
///
/// assert!(GateConfig::new(TimeUnit::Seconds, 5).is_ok());
/// assert_eq!(
///     GateConfig::new(TimeUnit::Days, 5),
///     Err(ConfigError::UnsupportedUnit(TimeUnit::Days)),
/// );
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(Serialize, Deserialize))]
#[cfg_attr(feature = "serde", serde(rename_all = "lowercase"))]
pub enum TimeUnit {
    /// Milliseconds (not a supported window unit)
    Milliseconds,
    /// Seconds - a 1 second window
    Seconds,
    /// Minutes - a 60 second window
    Minutes,
    /// Hours - a 3600 second window
    Hours,
    /// Days (not a supported window unit)
    Days,
}

impl TimeUnit {
    /// Map this unit to its window duration.
    ///
    /// # Errors
    /// Returns [`ConfigError::UnsupportedUnit`] for units without a defined
    /// window length.
    pub fn window_duration(self) -> Result<Duration, ConfigError> {
        match self {
            TimeUnit::Seconds => Ok(Duration::from_secs(1)),
            TimeUnit::Minutes => Ok(Duration::from_secs(60)),
            TimeUnit::Hours => Ok(Duration::from_secs(3600)),
            TimeUnit::Milliseconds | TimeUnit::Days => {
                Err(ConfigError::UnsupportedUnit(self))
            }
        }
    }

    /// The lowercase name of this unit.
    pub fn as_str(self) -> &'static str {
        match self {
            TimeUnit::Milliseconds => "milliseconds",
            TimeUnit::Seconds => "seconds",
            TimeUnit::Minutes => "minutes",
            TimeUnit::Hours => "hours",
            TimeUnit::Days => "days",
        }
    }
}

impl std::fmt::Display for TimeUnit {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for TimeUnit {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "milliseconds" => Ok(TimeUnit::Milliseconds),
            "seconds" => Ok(TimeUnit::Seconds),
            "minutes" => Ok(TimeUnit::Minutes),
            "hours" => Ok(TimeUnit::Hours),
            "days" => Ok(TimeUnit::Days),
            _ => Err(ConfigError::UnknownUnitName),
        }
    }
}

/// Validated, immutable gate configuration.
///
/// Holds the window unit, the admission limit and the resolved window
/// duration. Construction is the only place validation happens; every
/// accessor is infallible.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GateConfig {
    unit: TimeUnit,
    limit: u64,
    window: Duration,
}

impl GateConfig {
    /// Create a new gate configuration.
    ///
    /// # Arguments
    /// * `unit` - Window time unit (must map to a window duration)
    /// * `limit` - Maximum admissions per window (must be > 0)
    ///
    /// # Errors
    /// Returns [`ConfigError::ZeroLimit`] if `limit` is zero and
    /// [`ConfigError::UnsupportedUnit`] if `unit` has no window duration.
    pub fn new(unit: TimeUnit, limit: u64) -> Result<Self, ConfigError> {
        if limit == 0 {
            return Err(ConfigError::ZeroLimit);
        }
        let window = unit.window_duration()?;
        Ok(Self { unit, limit, window })
    }

    /// The window time unit.
    pub fn unit(&self) -> TimeUnit {
        self.unit
    }

    /// Maximum admissions per window.
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Length of one window.
    pub fn window(&self) -> Duration {
        self.window
    }
}
