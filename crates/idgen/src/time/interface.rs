use core::time::Duration;

/// Epoch of every [`SnowflakeId`]: 2019-12-31 16:00:00 UTC (midnight,
/// January 1, 2020 in UTC+8).
///
/// This is a deploy-time constant. IDs already in storage were packed
/// relative to it, so changing it would reorder or collide with them.
///
/// [`SnowflakeId`]: crate::SnowflakeId
pub const EPOCH: Duration = Duration::from_millis(1_577_808_000_000);

/// Standard UNIX epoch: Thursday, January 1, 1970 00:00:00 UTC. Used by
/// formats that embed raw Unix milliseconds, such as UUID v7.
pub const UNIX_EPOCH: Duration = Duration::from_millis(0);

/// A trait for time sources that return a wall-clock timestamp.
///
/// This abstraction allows you to plug in the system clock or a mocked time
/// source in tests.
///
/// The unit is expected to be **milliseconds** relative to a configurable
/// origin.
///
/// # Example
///
/// ```
/// use idgen::TimeSource;
///
/// struct FixedTime;
/// impl TimeSource<u64> for FixedTime {
///     fn current_millis(&self) -> u64 {
///         1234
///     }
/// }
///
/// let time = FixedTime;
/// assert_eq!(time.current_millis(), 1234);
/// ```
pub trait TimeSource<T> {
    /// Returns the current time in milliseconds since the configured epoch.
    fn current_millis(&self) -> T;
}
