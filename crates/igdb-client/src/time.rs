//! Clock abstraction for time-dependent logic
//!
//! Token expiry is computed against a `Clock` so tests can move time forward
//! without sleeping.

use chrono::{DateTime, Utc};

/// Trait for getting the current time
pub trait Clock: Send + Sync {
    /// Returns the current time
    fn now(&self) -> DateTime<Utc>;
}

/// System clock that returns the actual current time
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

/// Manually driven clock for testing
///
/// Clones share the same instant, so a test can keep one handle and advance
/// the clock seen by a `TokenManager` that owns another.
#[cfg(test)]
#[derive(Debug, Clone)]
pub struct MockClock(std::sync::Arc<std::sync::Mutex<DateTime<Utc>>>);

#[cfg(test)]
impl Clock for MockClock {
    fn now(&self) -> DateTime<Utc> {
        *self.0.lock().unwrap()
    }
}

#[cfg(test)]
impl MockClock {
    /// Creates a clock frozen at the given time
    pub fn new(time: DateTime<Utc>) -> Self {
        Self(std::sync::Arc::new(std::sync::Mutex::new(time)))
    }

    /// Creates a clock frozen at the current time
    pub fn now() -> Self {
        Self::new(Utc::now())
    }

    /// Moves the clock forward
    pub fn advance(&self, by: chrono::Duration) {
        let mut guard = self.0.lock().unwrap();
        *guard += by;
    }
}
