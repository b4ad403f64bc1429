use uuid::Uuid;

use crate::{Base62Error, Result};

/// The Base62 alphabet: digits, then lowercase, then uppercase.
///
/// The order is part of the encoding. Strings already handed out were
/// produced with it, so reordering silently changes what they decode to.
pub const ALPHABET: &[u8; 62] = b"0123456789abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ";

const BASE: u128 = 62;
const NO_VALUE: u8 = 255;

/// Digits needed for `u128::MAX`.
const MAX_U128_DIGITS: usize = 22;

/// Lookup table for Base62 decoding
const LOOKUP: [u8; 256] = {
    let mut lut = [NO_VALUE; 256];
    let mut i = 0_u8;
    while i < 62 {
        lut[ALPHABET[i as usize] as usize] = i;
        i += 1;
    }
    lut
};

/// Encodes `value` with the most significant digit first.
///
/// Zero encodes as `"0"`, the only value that produces a leading zero digit.
///
/// ```
/// use idgen::base62::encode_u128;
///
/// assert_eq!(encode_u128(0), "0");
/// assert_eq!(encode_u128(61), "Z");
/// assert_eq!(encode_u128(62), "10");
/// ```
pub fn encode_u128(mut value: u128) -> String {
    if value == 0 {
        return "0".to_string();
    }

    let mut buf = [0_u8; MAX_U128_DIGITS];
    let mut pos = buf.len();
    while value > 0 {
        pos -= 1;
        buf[pos] = ALPHABET[(value % BASE) as usize];
        value /= BASE;
    }
    buf[pos..].iter().map(|&b| char::from(b)).collect()
}

/// Decodes a Base62 string into a 128-bit value.
///
/// Leading `'0'` digits are accepted and contribute nothing, so `"0"` and
/// `"00"` both decode to zero.
///
/// # Errors
///
/// - [`Base62Error::EmptyInput`] for `""`.
/// - [`Base62Error::InvalidCharacter`] for the first character outside the
///   alphabet.
/// - [`Base62Error::Overflow`] if the value exceeds `u128::MAX`.
pub fn decode_u128(encoded: &str) -> Result<u128, Base62Error> {
    if encoded.is_empty() {
        return Err(Base62Error::EmptyInput);
    }

    let mut acc = 0_u128;
    for (index, ch) in encoded.char_indices() {
        let digit = if ch.is_ascii() {
            LOOKUP[ch as usize]
        } else {
            NO_VALUE
        };
        if digit == NO_VALUE {
            return Err(Base62Error::InvalidCharacter { ch, index });
        }
        acc = acc
            .checked_mul(BASE)
            .and_then(|acc| acc.checked_add(u128::from(digit)))
            .ok_or(Base62Error::Overflow { bits: u128::BITS })?;
    }
    Ok(acc)
}

/// Encodes a positive 64-bit ID.
///
/// # Errors
///
/// - [`Base62Error::ZeroValue`] for `0`. Generated IDs are never zero, so
///   this also catches uninitialized values.
/// - [`Base62Error::NegativeValue`] for anything below zero.
///
/// ```
/// use idgen::base62::encode_i64;
///
/// assert_eq!(encode_i64(372077392774041600).unwrap(), "ru7l9yaTE4");
/// assert!(encode_i64(0).is_err());
/// ```
pub fn encode_i64(value: i64) -> Result<String, Base62Error> {
    match value {
        0 => Err(Base62Error::ZeroValue),
        v if v < 0 => Err(Base62Error::NegativeValue { value }),
        v => Ok(encode_u128(v as u128)),
    }
}

/// Decodes a Base62 string into a 64-bit ID.
///
/// # Errors
///
/// As [`decode_u128`], with [`Base62Error::Overflow`] once the value exceeds
/// `i64::MAX`.
pub fn decode_i64(encoded: &str) -> Result<i64, Base62Error> {
    let value = decode_u128(encoded)?;
    i64::try_from(value).map_err(|_| Base62Error::Overflow { bits: 63 })
}

/// Encodes the 128-bit value of `uuid`. The nil UUID encodes as `"0"`.
pub fn encode_uuid(uuid: Uuid) -> String {
    encode_u128(uuid.as_u128())
}

/// Decodes a Base62 string into a UUID. Short strings are left-padded with
/// zero bits, so every value up to 128 bits round-trips.
///
/// # Errors
///
/// As [`decode_u128`].
pub fn decode_uuid(encoded: &str) -> Result<Uuid, Base62Error> {
    decode_u128(encoded).map(Uuid::from_u128)
}

/// Parses a textual UUID (hyphenated, simple, braced or URN) and encodes it.
///
/// # Errors
///
/// Returns [`Base62Error::InvalidUuid`] if `uuid` does not parse.
///
/// ```
/// use idgen::base62::encode_uuid_str;
///
/// let encoded = encode_uuid_str("0190a1b2-c3d4-7e5f-8a9b-0c1d2e3f4a5b").unwrap();
/// assert_eq!(encoded, "2X5wLl3Bri7wjSW0y1myL");
/// ```
pub fn encode_uuid_str(uuid: &str) -> Result<String, Base62Error> {
    Ok(encode_uuid(Uuid::parse_str(uuid)?))
}

/// Decodes a Base62 string into a hyphenated, lowercase UUID string.
///
/// # Errors
///
/// As [`decode_u128`].
pub fn decode_uuid_str(encoded: &str) -> Result<String, Base62Error> {
    Ok(decode_uuid(encoded)?.hyphenated().to_string())
}
