//! Wall-clock abstraction used to timestamp kiosk sessions.

use chrono::{DateTime, Utc};

/// Source of the current wall-clock time.
///
/// Timers that drive polling and progress use `tokio::time` so they can be
/// paused in tests; this trait only covers timestamps that end up in session
/// records and logs.
pub trait Clock: Send + Sync {
    /// Returns the current time.
    fn now(&self) -> DateTime<Utc>;
}

/// Clock backed by the operating system.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Utc> {
        Utc::now()
    }
}
