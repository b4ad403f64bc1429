use core::fmt;

use crate::{Error, Result, time::EPOCH};

/// A 64-bit Snowflake ID with a 9-bit node field.
///
/// - 1 bit reserved (always zero, so the value is a positive `i64`)
/// - 42 bits timestamp (ms since [`EPOCH`])
/// - 9 bits node ID
/// - 12 bits sequence
///
/// ```text
///  Bit Index:  63           63 62            21 20           12 11             0
///              +--------------+----------------+---------------+---------------+
///  Field:      | reserved (1) | timestamp (42) |  node ID (9)  | sequence (12) |
///              +--------------+----------------+---------------+---------------+
///              |<----------- MSB ---------- 64 bits ----------- LSB ---------->|
/// ```
///
/// The layout is a storage contract: identifiers already persisted were packed
/// with these exact widths and this epoch, so neither may change for a fleet
/// that has issued IDs.
///
/// # Example
///
/// ```
/// use idgen::SnowflakeId;
///
/// let id = SnowflakeId::from_components(1000, 2, 1);
/// assert_eq!(id.timestamp(), 1000);
/// assert_eq!(id.node_id(), 2);
/// assert_eq!(id.sequence(), 1);
/// assert!(id.to_i64() > 0);
/// ```
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SnowflakeId {
    id: u64,
}

impl SnowflakeId {
    /// Bitmask for extracting the 42-bit timestamp field. Occupies bits 21
    /// through 62.
    pub const TIMESTAMP_MASK: u64 = (1 << 42) - 1;

    /// Bitmask for extracting the 9-bit node ID field. Occupies bits 12
    /// through 20.
    pub const NODE_ID_MASK: u64 = (1 << 9) - 1;

    /// Bitmask for extracting the 12-bit sequence field. Occupies bits 0
    /// through 11.
    pub const SEQUENCE_MASK: u64 = (1 << 12) - 1;

    /// Number of bits to shift the timestamp to its correct position (bit 21).
    pub const TIMESTAMP_SHIFT: u64 = 21;

    /// Number of bits to shift the node ID to its correct position (bit 12).
    pub const NODE_ID_SHIFT: u64 = 12;

    /// Number of bits to shift the sequence field (bit 0).
    pub const SEQUENCE_SHIFT: u64 = 0;

    /// Packs the three fields into an ID. Each field is masked to its width,
    /// which keeps the reserved sign bit at zero.
    pub const fn from(timestamp: u64, node_id: u64, sequence: u64) -> Self {
        let timestamp = (timestamp & Self::TIMESTAMP_MASK) << Self::TIMESTAMP_SHIFT;
        let node_id = (node_id & Self::NODE_ID_MASK) << Self::NODE_ID_SHIFT;
        let sequence = (sequence & Self::SEQUENCE_MASK) << Self::SEQUENCE_SHIFT;
        Self {
            id: timestamp | node_id | sequence,
        }
    }

    /// Like [`Self::from`], but asserts in debug builds that no field
    /// overflows its width.
    pub fn from_components(timestamp: u64, node_id: u64, sequence: u64) -> Self {
        debug_assert!(timestamp <= Self::TIMESTAMP_MASK, "timestamp overflow");
        debug_assert!(node_id <= Self::NODE_ID_MASK, "node_id overflow");
        debug_assert!(sequence <= Self::SEQUENCE_MASK, "sequence overflow");
        Self::from(timestamp, node_id, sequence)
    }

    /// Extracts the timestamp (ms since [`EPOCH`]) from the packed ID.
    pub const fn timestamp(&self) -> u64 {
        (self.id >> Self::TIMESTAMP_SHIFT) & Self::TIMESTAMP_MASK
    }

    /// Extracts the node ID from the packed ID.
    pub const fn node_id(&self) -> u64 {
        (self.id >> Self::NODE_ID_SHIFT) & Self::NODE_ID_MASK
    }

    /// Extracts the sequence number from the packed ID.
    pub const fn sequence(&self) -> u64 {
        (self.id >> Self::SEQUENCE_SHIFT) & Self::SEQUENCE_MASK
    }

    pub const fn max_timestamp() -> u64 {
        Self::TIMESTAMP_MASK
    }

    pub const fn max_node_id() -> u64 {
        Self::NODE_ID_MASK
    }

    pub const fn max_sequence() -> u64 {
        Self::SEQUENCE_MASK
    }

    /// Milliseconds since the Unix epoch at which this ID was issued.
    pub const fn unix_millis(&self) -> u64 {
        self.timestamp() + EPOCH.as_millis() as u64
    }

    pub const fn to_raw(&self) -> u64 {
        self.id
    }

    /// Wraps a raw value without validation. The reserved bit is cleared.
    pub const fn from_raw(raw: u64) -> Self {
        Self {
            id: raw & (i64::MAX as u64),
        }
    }

    /// Returns the ID as the signed integer stored by databases. Always
    /// non-negative.
    pub const fn to_i64(&self) -> i64 {
        self.id as i64
    }

    /// Wraps a stored signed value.
    ///
    /// # Errors
    ///
    /// Returns [`Error::NegativeId`] if `value` is negative; no ID produced by
    /// this layout can be.
    pub fn try_from_i64(value: i64) -> Result<Self> {
        if value < 0 {
            return Err(Error::NegativeId { value });
        }
        Ok(Self { id: value as u64 })
    }

    /// Returns true if the current sequence value can be incremented.
    pub const fn has_sequence_room(&self) -> bool {
        self.sequence() < Self::SEQUENCE_MASK
    }

    /// Returns a new ID with the sequence incremented.
    pub fn increment_sequence(&self) -> Self {
        Self::from_components(self.timestamp(), self.node_id(), self.sequence() + 1)
    }

    /// Returns a new ID for a newer timestamp with sequence reset to zero.
    pub fn rollover_to_timestamp(&self, ts: u64) -> Self {
        Self::from_components(ts, self.node_id(), 0)
    }
}

impl From<SnowflakeId> for i64 {
    fn from(id: SnowflakeId) -> Self {
        id.to_i64()
    }
}

impl TryFrom<i64> for SnowflakeId {
    type Error = Error;

    fn try_from(value: i64) -> Result<Self> {
        Self::try_from_i64(value)
    }
}

impl core::str::FromStr for SnowflakeId {
    type Err = Error;

    /// Parses the decimal form produced by [`fmt::Display`].
    fn from_str(s: &str) -> Result<Self> {
        // Parsing as i64 rejects anything with the reserved bit set.
        let value: i64 = s.parse()?;
        Self::try_from_i64(value)
    }
}

impl fmt::Display for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.id)
    }
}

impl fmt::Debug for SnowflakeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SnowflakeId")
            .field("raw", &self.id)
            .field("timestamp", &self.timestamp())
            .field("node_id", &self.node_id())
            .field("sequence", &self.sequence())
            .finish()
    }
}
