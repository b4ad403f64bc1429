use tracing::instrument;
use uuid::Uuid;

use crate::{
    Error, Result,
    rand::{RandSource, ThreadRandom},
    time::{SystemClock, TimeSource, UNIX_EPOCH},
};

const TIMESTAMP_BITS: u32 = 48;
const MAX_TIMESTAMP: u64 = (1 << TIMESTAMP_BITS) - 1;
const RAND_A_MASK: u128 = (1 << 12) - 1;
const RAND_B_MASK: u128 = (1 << 62) - 1;
const VERSION: u128 = 0x7;
const VARIANT: u128 = 0b10;

/// A stateless generator of RFC 9562 version 7 UUIDs.
///
/// ```text
///  Bit Index:  127          80 79     76 75        64 63   62 61              0
///              +--------------+---------+------------+-------+----------------+
///  Field:      | unix_ms (48) | ver (4) | rand_a(12) | var(2)|  rand_b (62)   |
///              +--------------+---------+------------+-------+----------------+
/// ```
///
/// Unlike [`LockSnowflakeGenerator`], nothing is shared between calls: IDs
/// from the same millisecond are ordered by their random bits, not by a
/// counter, and carry no node identity.
///
/// The time source must report Unix milliseconds, so pair it with a clock
/// built from [`UNIX_EPOCH`]; [`Default`] does this for you.
///
/// [`LockSnowflakeGenerator`]: crate::LockSnowflakeGenerator
#[derive(Clone, Debug)]
pub struct UuidV7Generator<T = SystemClock, R = ThreadRandom>
where
    T: TimeSource<u64>,
    R: RandSource<u128>,
{
    time: T,
    rng: R,
}

impl Default for UuidV7Generator<SystemClock, ThreadRandom> {
    fn default() -> Self {
        Self::new(SystemClock::with_epoch(UNIX_EPOCH), ThreadRandom)
    }
}

impl<T, R> UuidV7Generator<T, R>
where
    T: TimeSource<u64>,
    R: RandSource<u128>,
{
    pub const fn new(time: T, rng: R) -> Self {
        Self { time, rng }
    }

    /// Generates a new UUID v7.
    ///
    /// # Errors
    ///
    /// Returns [`Error::TimestampOverflow`] if the clock no longer fits the
    /// 48-bit timestamp field (the year 10889).
    ///
    /// # Example
    /// ```
    /// use idgen::UuidV7Generator;
    ///
    /// let generator = UuidV7Generator::default();
    /// let uuid = generator.try_next_uuid().unwrap();
    /// assert_eq!(uuid.get_version_num(), 7);
    /// ```
    #[instrument(level = "trace", skip(self))]
    pub fn try_next_uuid(&self) -> Result<Uuid> {
        let millis = self.time.current_millis();
        if millis > MAX_TIMESTAMP {
            return Err(Error::TimestampOverflow {
                timestamp: millis,
                max: MAX_TIMESTAMP,
            });
        }

        let rand = self.rng.rand();
        let rand_a = (rand >> 64) & RAND_A_MASK;
        let rand_b = rand & RAND_B_MASK;

        let bits = (u128::from(millis) << 80)
            | (VERSION << 76)
            | (rand_a << 64)
            | (VARIANT << 62)
            | rand_b;
        Ok(Uuid::from_u128(bits))
    }

    /// Generates a new UUID v7, aborting the calling operation on failure.
    ///
    /// # Panics
    ///
    /// Panics if [`Self::try_next_uuid`] fails.
    pub fn next_uuid(&self) -> Uuid {
        match self.try_next_uuid() {
            Ok(uuid) => uuid,
            Err(e) => panic!("uuid v7 generation failed: {e}"),
        }
    }

    /// Generates a new UUID v7 as 32 lowercase hex characters, without
    /// hyphens.
    ///
    /// # Panics
    ///
    /// Panics if [`Self::try_next_uuid`] fails.
    pub fn next_uuid_dashless(&self) -> String {
        self.next_uuid().simple().to_string()
    }
}
