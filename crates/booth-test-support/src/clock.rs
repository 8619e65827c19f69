//! Test clock — a `Clock` frozen at one instant.

use booth_core::clock::Clock;
use chrono::{DateTime, TimeZone, Utc};

/// A clock that always returns the same point in time.
#[derive(Debug, Clone, Copy)]
pub struct FixedClock(pub DateTime<Utc>);

impl FixedClock {
    /// The instant used across the booth test suites.
    ///
    /// # Panics
    ///
    /// Never; the literal date is valid.
    #[must_use]
    pub fn kiosk_opening() -> Self {
        Self(Utc.with_ymd_and_hms(2026, 3, 14, 9, 30, 0).unwrap())
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        self.0
    }
}
