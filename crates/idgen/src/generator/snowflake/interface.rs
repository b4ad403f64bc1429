use crate::{Result, SnowflakeId};

/// A minimal interface for generating Snowflake IDs.
///
/// Consumers that only need "a fresh ID" can depend on this trait and swap in
/// a deterministic implementation under test.
pub trait SnowflakeGenerator {
    /// Returns the node ID packed into every generated ID.
    fn node_id(&self) -> u64;

    /// Generates the next ID.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::ClockRegression`] if the clock reads earlier
    /// than the last issued ID, or [`crate::Error::TimestampOverflow`] once the
    /// clock outgrows the timestamp field.
    fn try_next_id(&self) -> Result<SnowflakeId>;

    /// Generates the next ID, aborting the calling operation on failure.
    ///
    /// This is the opt-in counterpart to [`Self::try_next_id`] for call sites
    /// that cannot continue without an ID.
    ///
    /// # Panics
    ///
    /// Panics with the underlying error if [`Self::try_next_id`] fails.
    fn next_id(&self) -> SnowflakeId {
        match self.try_next_id() {
            Ok(id) => id,
            Err(e) => panic!("snowflake id generation failed: {e}"),
        }
    }
}
