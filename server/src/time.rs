//! Time source abstraction.
//!
//! Token expiry and document timestamps read the current time through a
//! `Clock` so tests can pin or advance it deterministically.

use chrono::{DateTime, Utc};

/// Abstraction over the current wall-clock time.
pub trait Clock: Send + Sync {
    /// Get the current UTC time.
    fn now(&self) -> DateTime<Utc>;
}

/// Real time source using the system clock.
///
/// This is the implementation used in production.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_clock() {
        let clock = SystemClock;
        let t1 = clock.now();
        let t2 = clock.now();

        // 2020-01-01 00:00:00 UTC
        assert!(t1.timestamp() > 1_577_836_800);
        assert!(t2 >= t1);
    }
}
