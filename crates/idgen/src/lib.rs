//! Unique, roughly time-ordered identifiers for persisted entities.
//!
//! - [`LockSnowflakeGenerator`]: 64-bit IDs packing a millisecond timestamp, a
//!   9-bit node ID and a per-millisecond sequence.
//! - [`UuidV7Generator`]: stateless, time-ordered UUIDs.
//! - [`base62`]: short, URL-safe renderings of both.
//! - [`shard`]: stable bucketing of identifiers into storage directories.
//!
//! [`IdService`] wires the generators together for a process.

pub mod base62;
mod config;
mod error;
mod generator;
mod id;
mod node;
mod rand;
#[cfg(feature = "serde")]
pub mod serde;
mod service;
pub mod shard;
mod time;

pub use crate::base62::{
    Base62Error, Base62Ext, decode_i64 as base62_decode, decode_uuid as base62_decode_uuid,
    encode_i64 as base62_encode, encode_uuid as base62_encode_uuid,
};
pub use crate::config::*;
pub use crate::error::*;
pub use crate::generator::*;
pub use crate::id::*;
pub use crate::node::*;
pub use crate::rand::*;
pub use crate::service::*;
pub use crate::shard::shard_label;
pub use crate::time::*;
