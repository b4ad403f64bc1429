use core::cmp::Ordering;

use parking_lot::Mutex;
use tracing::instrument;

use crate::{
    Error, NodeId, Result, SnowflakeId,
    generator::SnowflakeGenerator,
    time::{SystemClock, TimeSource},
};

/// A lock-based Snowflake ID generator suitable for multi-threaded
/// environments.
///
/// The last issued ID is the generator state: its timestamp is the
/// last-observed millisecond and its sequence the per-millisecond counter.
/// Every call holds the lock for the whole read-compare-store sequence,
/// including the wait for the next millisecond when the sequence is exhausted.
/// Concurrent callers therefore queue behind one another, and the IDs they
/// observe are strictly increasing in lock order.
///
/// A clock that stops advancing while the sequence is exhausted blocks the
/// caller, and everyone queued behind it, until it moves again. Callers that
/// need a bound must impose it from outside.
///
/// Share one instance per process (behind an `Arc` or a reference); two
/// generators with the same node ID can issue duplicates.
pub struct LockSnowflakeGenerator<T = SystemClock>
where
    T: TimeSource<u64>,
{
    state: Mutex<SnowflakeId>,
    node_id: u64,
    time: T,
}

impl<T> LockSnowflakeGenerator<T>
where
    T: TimeSource<u64>,
{
    /// Creates a new [`LockSnowflakeGenerator`] for `node`.
    ///
    /// The initial timestamp and sequence are zero, so the first call rolls
    /// over to the current time.
    ///
    /// # Example
    /// ```
    /// use idgen::{FixedNodeId, LockSnowflakeGenerator, NodeIdProvider, SystemClock};
    ///
    /// let node = FixedNodeId::new(7).unwrap().resolve();
    /// let generator = LockSnowflakeGenerator::new(node, SystemClock::default());
    ///
    /// let id = generator.try_next_id().unwrap();
    /// assert_eq!(id.node_id(), 7);
    /// ```
    pub fn new(node: NodeId, time: T) -> Self {
        tracing::debug!(node_id = node.get(), origin = %node.origin(), "snowflake generator created");
        Self::from_components(0, node, 0, time)
    }

    /// Creates a generator from explicit component values.
    ///
    /// Useful for restoring state, such as the last ID persisted before a
    /// restart, so that the generator refuses to issue anything older. The
    /// node ID is taken as a validated [`NodeId`] so the IDs issued and
    /// [`Self::node_id`] always agree.
    ///
    /// # ⚠️ Note
    /// In typical use cases, you should prefer [`Self::new`].
    pub fn from_components(timestamp: u64, node: NodeId, sequence: u64, time: T) -> Self {
        let node_id = u64::from(node);
        Self {
            state: Mutex::new(SnowflakeId::from_components(timestamp, node_id, sequence)),
            node_id,
            time,
        }
    }

    pub const fn node_id(&self) -> u64 {
        self.node_id
    }

    /// Returns the last issued ID, or the seed state if none was issued yet.
    pub fn last_id(&self) -> SnowflakeId {
        *self.state.lock()
    }

    /// Generates the next ID.
    ///
    /// # Errors
    ///
    /// - [`Error::ClockRegression`] if the clock reads earlier than the last
    ///   issued ID. The state is untouched, so a later call succeeds once the
    ///   clock catches up.
    /// - [`Error::TimestampOverflow`] if the timestamp no longer fits the
    ///   42-bit field.
    ///
    /// # Example
    /// ```
    /// use idgen::{LockSnowflakeGenerator, RandomNodeId, NodeIdProvider, SystemClock, ThreadRandom};
    ///
    /// let node = RandomNodeId::<ThreadRandom>::default().resolve();
    /// let generator = LockSnowflakeGenerator::new(node, SystemClock::default());
    ///
    /// let a = generator.try_next_id().unwrap();
    /// let b = generator.try_next_id().unwrap();
    /// assert!(a < b);
    /// ```
    #[instrument(level = "trace", skip(self))]
    pub fn try_next_id(&self) -> Result<SnowflakeId> {
        let mut id = self.state.lock();

        let now = self.time.current_millis();
        let last = id.timestamp();
        match now.cmp(&last) {
            Ordering::Equal => {
                if id.has_sequence_room() {
                    *id = id.increment_sequence();
                } else {
                    let next = self.wait_next_millis(last);
                    *id = id.rollover_to_timestamp(Self::check_timestamp(next)?);
                }
            }
            Ordering::Greater => {
                *id = id.rollover_to_timestamp(Self::check_timestamp(now)?);
            }
            Ordering::Less => return Err(Self::cold_clock_behind(last, now)),
        }

        Ok(*id)
    }

    /// Spins, still holding the lock, until the clock passes `last`.
    fn wait_next_millis(&self, last: u64) -> u64 {
        loop {
            let now = self.time.current_millis();
            if now > last {
                return now;
            }
            core::hint::spin_loop();
        }
    }

    fn check_timestamp(ts: u64) -> Result<u64> {
        if ts > SnowflakeId::max_timestamp() {
            return Err(Error::TimestampOverflow {
                timestamp: ts,
                max: SnowflakeId::max_timestamp(),
            });
        }
        Ok(ts)
    }

    #[cold]
    #[inline(never)]
    fn cold_clock_behind(last: u64, now: u64) -> Error {
        tracing::warn!(last, now, behind_ms = last - now, "clock moved backwards, refusing to generate id");
        Error::ClockRegression { last, now }
    }
}

impl<T> SnowflakeGenerator for LockSnowflakeGenerator<T>
where
    T: TimeSource<u64>,
{
    fn node_id(&self) -> u64 {
        self.node_id()
    }

    fn try_next_id(&self) -> Result<SnowflakeId> {
        self.try_next_id()
    }
}
