use crate::Base62Error;

/// A result type defaulting to the crate [`enum@Error`].
pub type Result<T, E = Error> = core::result::Result<T, E>;

/// All errors that `idgen` can surface.
///
/// Sequence exhaustion within a millisecond has no variant: the
/// generator absorbs it by waiting for the next millisecond under its lock.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Error {
    /// The host clock reads earlier than the timestamp of the last issued ID.
    ///
    /// Typically an NTP step-back. The generator is left untouched and will
    /// issue IDs again once the clock passes `last`. Retrying immediately is
    /// likely to fail again; callers should back off.
    #[error("clock moved backwards: last issued at {last}ms, now {now}ms; refusing to generate id")]
    ClockRegression {
        /// Timestamp (ms since the ID epoch) of the last issued ID.
        last: u64,
        /// Timestamp (ms since the ID epoch) read from the clock.
        now: u64,
    },

    /// The clock reading no longer fits in the timestamp field of the layout.
    #[error("timestamp {timestamp}ms exceeds the {max}ms capacity of the id layout")]
    TimestampOverflow { timestamp: u64, max: u64 },

    /// A node ID was supplied outside the representable range.
    #[error("node id {node_id} exceeds the maximum of {max}")]
    InvalidNodeId { node_id: u64, max: u64 },

    /// A node ID source string could not be understood.
    #[error("invalid node id source `{input}`; expected `network`, `random` or `fixed:<id>`")]
    InvalidNodeIdSource { input: String },

    /// A signed value below zero was offered as an ID.
    #[error("id {value} is negative")]
    NegativeId { value: i64 },

    /// A decimal ID string could not be parsed.
    #[error("invalid decimal id: {0}")]
    ParseInt(#[from] core::num::ParseIntError),

    /// Base62 encoding or decoding failed.
    #[error(transparent)]
    Base62(#[from] Base62Error),
}
