//! Fixed-window admission counter.
//!
//! [`WindowState`] is the single piece of admission-relevant state in the
//! crate. It is deliberately not thread-safe on its own: the application
//! layer owns it behind one lock, so every read and write is linearized
//! there. There is no secondary atomic counter to fall out of sync with.

/// Decision made by the admission predicate.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AdmissionDecision {
    /// The caller is admitted and the count was incremented
    Admitted,
    /// The window is at capacity; nothing was changed
    AtCapacity,
}

impl AdmissionDecision {
    /// Check if this decision is Admitted.
    pub fn is_admitted(&self) -> bool {
        matches!(self, AdmissionDecision::Admitted)
    }

    /// Check if this decision is AtCapacity.
    pub fn is_at_capacity(&self) -> bool {
        matches!(self, AdmissionDecision::AtCapacity)
    }
}

/// Counter state for one fixed window.
///
/// Admission compares `count < limit`; the count only ever moves up by one
/// per admission and back to zero on reset, so it is never observed above
/// the limit between resets.
///
/// # Example
/// ```
/// use window_gate::WindowState;
///
/// let mut window = WindowState::new(2);
/// assert!(window.try_admit().is_admitted());
/// assert!(window.try_admit().is_admitted());
/// assert!(window.try_admit().is_at_capacity());
///
/// assert_eq!(window.reset(), 2);
/// assert!(window.try_admit().is_admitted());
/// ```
#[derive(Debug, Clone)]
pub struct WindowState {
    limit: u64,
    count: u64,
}

impl WindowState {
    /// Create counter state with the given admission limit.
    pub fn new(limit: u64) -> Self {
        Self { limit, count: 0 }
    }

    /// Admit one caller if the window has capacity.
    ///
    /// Increments the count by exactly one on admission; leaves it
    /// untouched at capacity.
    pub fn try_admit(&mut self) -> AdmissionDecision {
        if self.count < self.limit {
            self.count += 1;
            AdmissionDecision::Admitted
        } else {
            AdmissionDecision::AtCapacity
        }
    }

    /// Reset the count to zero, returning the count the window closed with.
    pub fn reset(&mut self) -> u64 {
        std::mem::take(&mut self.count)
    }

    /// Admissions in the current window.
    pub fn count(&self) -> u64 {
        self.count
    }

    /// The admission limit.
    pub fn limit(&self) -> u64 {
        self.limit
    }

    /// Remaining capacity in the current window.
    pub fn remaining(&self) -> u64 {
        self.limit - self.count
    }

    /// Whether another caller could be admitted right now.
    pub fn has_capacity(&self) -> bool {
        self.count < self.limit
    }
}
