use core::time::Duration;
use std::time::SystemTime;

use crate::time::{EPOCH, TimeSource};

/// A wall-clock time source returning milliseconds since a fixed epoch.
///
/// Unlike a monotonic ticker, this clock follows the host clock, including
/// step-backs from NTP corrections. Generators rely on observing those so they
/// can refuse to issue IDs rather than silently repeat a timestamp.
///
/// A host clock earlier than the configured epoch reads as `0`.
#[derive(Clone, Copy, Debug)]
pub struct SystemClock {
    epoch_millis: u64,
}

impl Default for SystemClock {
    /// Constructs a clock aligned to the Snowflake [`EPOCH`].
    fn default() -> Self {
        Self::with_epoch(EPOCH)
    }
}

impl SystemClock {
    /// Constructs a clock using `epoch`, given as a [`Duration`] since
    /// 1970-01-01 UTC, as the origin (t = 0).
    ///
    /// # Example
    ///
    /// ```
    /// use idgen::{SystemClock, TimeSource, UNIX_EPOCH};
    ///
    /// let clock = SystemClock::with_epoch(UNIX_EPOCH);
    /// assert!(clock.current_millis() > 1_700_000_000_000);
    /// ```
    pub const fn with_epoch(epoch: Duration) -> Self {
        Self {
            epoch_millis: epoch.as_millis() as u64,
        }
    }

    pub const fn epoch_millis(&self) -> u64 {
        self.epoch_millis
    }
}

impl TimeSource<u64> for SystemClock {
    fn current_millis(&self) -> u64 {
        let unix_millis = SystemTime::now()
            .duration_since(SystemTime::UNIX_EPOCH)
            .map_or(0, |d| d.as_millis() as u64);
        unix_millis.saturating_sub(self.epoch_millis)
    }
}
