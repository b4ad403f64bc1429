//! Deterministic placement of stored objects into a bounded set of
//! directories.
//!
//! A label is `SHA-1(id) mod 36`, read as a big-endian integer, indexed into
//! [`SHARD_ALPHABET`]. It is never stored; readers recompute it from the
//! identifier. Changing [`SHARD_ALPHABET`] or [`SHARD_COUNT`] therefore moves
//! every existing object to a different directory as far as readers are
//! concerned, and requires relocating what is already on disk.
//!
//! Labels are balanced for identifiers that are themselves random or
//! hash-like. Chosen inputs can be steered into a single bucket.

use sha1::{Digest, Sha1};
use uuid::Uuid;

use crate::base62;

/// Shard labels: digits, then uppercase letters.
pub const SHARD_ALPHABET: &[u8; 36] = b"0123456789ABCDEFGHIJKLMNOPQRSTUVWXYZ";

pub const SHARD_COUNT: u32 = SHARD_ALPHABET.len() as u32;

/// Returns the shard label of `id`.
///
/// ```
/// use idgen::shard::{SHARD_ALPHABET, shard_label};
///
/// let label = shard_label("ru7l9yaTE4");
/// assert!(SHARD_ALPHABET.contains(&(label as u8)));
/// assert_eq!(label, shard_label("ru7l9yaTE4"));
/// ```
pub fn shard_label(id: &str) -> char {
    let digest = Sha1::digest(id.as_bytes());
    // (r * 256 + b) mod n over the big-endian bytes equals the digest's
    // integer value mod n.
    let index = digest
        .iter()
        .fold(0_u32, |r, &b| (r * 256 + u32::from(b)) % SHARD_COUNT);
    char::from(SHARD_ALPHABET[index as usize])
}

/// Returns `"<label>/<id>"`.
pub fn shard_path(id: &str) -> String {
    format!("{}/{id}", shard_label(id))
}

/// Object key for a short public upload: the Base62 form of `uuid`, placed
/// under its shard and keeping the extension of `file_name`.
///
/// The extension is everything from the last `.` of the final `/`-separated
/// component, dot included, so `.pdf` keeps `.pdf` and `notes.` keeps `.`.
///
/// ```
/// use idgen::shard::short_object_key;
/// use uuid::Uuid;
///
/// let uuid = Uuid::parse_str("0190a1b2-c3d4-7e5f-8a9b-0c1d2e3f4a5b").unwrap();
/// let key = short_object_key(uuid, "paper.final.pdf");
/// assert!(key.ends_with("/2X5wLl3Bri7wjSW0y1myL.pdf"));
/// ```
pub fn short_object_key(uuid: Uuid, file_name: &str) -> String {
    let id = base62::encode_uuid(uuid);
    let name = file_name.rsplit('/').next().unwrap_or(file_name);
    match name.rfind('.') {
        Some(dot) => format!("{}{}", shard_path(&id), &name[dot..]),
        None => shard_path(&id),
    }
}
