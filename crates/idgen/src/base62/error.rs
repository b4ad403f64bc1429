/// Errors produced by the Base62 codec.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum Base62Error {
    #[error("cannot decode an empty base62 string")]
    EmptyInput,

    /// A character outside `0-9a-zA-Z`. `index` is the byte offset of `ch`.
    #[error("invalid base62 character {ch:?} at index {index}")]
    InvalidCharacter { ch: char, index: usize },

    /// The decoded value does not fit the target width.
    #[error("base62 value does not fit in {bits} bits")]
    Overflow { bits: u32 },

    /// Zero is never a legitimate ID, and `"0"` is reserved for it.
    #[error("refusing to base62-encode zero")]
    ZeroValue,

    #[error("cannot base62-encode negative value {value}")]
    NegativeValue { value: i64 },

    #[error("invalid uuid: {0}")]
    InvalidUuid(#[from] uuid::Error),
}
