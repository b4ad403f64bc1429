//! `#[serde(with = ...)]` helpers for storing IDs in serialized records.
//!
//! ```
//! use idgen::{SnowflakeId, serde::{as_base62, as_string}};
//! use serde::{Deserialize, Serialize};
//!
//! #[derive(Serialize, Deserialize)]
//! struct Document {
//!     #[serde(with = "as_string")]
//!     id: SnowflakeId,
//!     #[serde(with = "as_base62")]
//!     share_code: SnowflakeId,
//! }
//! ```

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Serializes a [`SnowflakeId`](crate::SnowflakeId) as a signed 64-bit number.
pub mod as_native {
    use super::{Deserialize, Deserializer, Serialize, Serializer};
    use crate::SnowflakeId;

    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S>(id: &SnowflakeId, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        id.to_i64().serialize(s)
    }

    /// # Errors
    ///
    /// Returns an error if the underlying deserializer fails or the number is
    /// negative.
    pub fn deserialize<'de, D>(d: D) -> Result<SnowflakeId, D::Error>
    where
        D: Deserializer<'de>,
    {
        let n = i64::deserialize(d)?;
        SnowflakeId::try_from_i64(n).map_err(serde::de::Error::custom)
    }
}

/// Serializes a [`SnowflakeId`](crate::SnowflakeId) as a decimal string, for
/// JSON consumers that parse numbers as doubles.
pub mod as_string {
    use super::{Deserializer, Serializer};
    use crate::SnowflakeId;

    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<S>(id: &SnowflakeId, s: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        s.collect_str(id)
    }

    /// # Errors
    ///
    /// Returns an error if the underlying deserializer fails or the string is
    /// not a non-negative decimal `i64`.
    pub fn deserialize<'de, D>(d: D) -> Result<SnowflakeId, D::Error>
    where
        D: Deserializer<'de>,
    {
        struct DecimalVisitor;

        impl serde::de::Visitor<'_> for DecimalVisitor {
            type Value = SnowflakeId;

            fn expecting(&self, formatter: &mut core::fmt::Formatter) -> core::fmt::Result {
                formatter.write_str("a decimal snowflake id string")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                v.parse().map_err(E::custom)
            }
        }

        d.deserialize_str(DecimalVisitor)
    }
}

/// Serializes any [`Base62Ext`](crate::Base62Ext) ID as its Base62 string.
pub mod as_base62 {
    use super::{Deserializer, Serializer};
    use crate::Base62Ext;
    use core::marker::PhantomData;

    /// # Errors
    ///
    /// Returns an error if the underlying serializer fails.
    pub fn serialize<ID, S>(id: &ID, s: S) -> Result<S::Ok, S::Error>
    where
        ID: Base62Ext,
        S: Serializer,
    {
        s.serialize_str(&id.encode_base62())
    }

    /// # Errors
    ///
    /// Returns an error if the underlying deserializer fails or the string is
    /// not valid Base62 for `ID`.
    pub fn deserialize<'de, ID, D>(d: D) -> Result<ID, D::Error>
    where
        ID: Base62Ext,
        D: Deserializer<'de>,
    {
        struct Base62Visitor<ID>(PhantomData<ID>);

        impl<ID> serde::de::Visitor<'_> for Base62Visitor<ID>
        where
            ID: Base62Ext,
        {
            type Value = ID;

            fn expecting(&self, formatter: &mut core::fmt::Formatter) -> core::fmt::Result {
                formatter.write_str("a base62 encoded string")
            }

            fn visit_str<E>(self, v: &str) -> Result<Self::Value, E>
            where
                E: serde::de::Error,
            {
                ID::decode_base62(v).map_err(E::custom)
            }
        }

        d.deserialize_str(Base62Visitor(PhantomData))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::SnowflakeId;
    use serde_json::json;
    use uuid::Uuid;

    #[derive(PartialEq, Eq, Debug, Serialize, Deserialize)]
    struct Row {
        #[serde(with = "as_native")]
        native: SnowflakeId,
        #[serde(with = "as_string")]
        text: SnowflakeId,
        #[serde(with = "as_base62")]
        short: SnowflakeId,
        #[serde(with = "as_base62")]
        file: Uuid,
    }

    fn row() -> Row {
        let id = SnowflakeId::from_raw(372_077_392_774_041_600);
        Row {
            native: id,
            text: id,
            short: id,
            file: Uuid::from_u128(0x0190_a1b2_c3d4_7e5f_8a9b_0c1d_2e3f_4a5b),
        }
    }

    #[test]
    fn serializes_each_form() {
        let value = serde_json::to_value(row()).unwrap();
        assert_eq!(
            value,
            json!({
                "native": 372_077_392_774_041_600_i64,
                "text": "372077392774041600",
                "short": "ru7l9yaTE4",
                "file": "2X5wLl3Bri7wjSW0y1myL",
            })
        );
        assert_eq!(serde_json::from_value::<Row>(value).unwrap(), row());
    }

    #[test]
    fn negative_native_is_rejected() {
        let value = json!({
            "native": -1,
            "text": "1",
            "short": "1",
            "file": "1",
        });
        let err = serde_json::from_value::<Row>(value).unwrap_err();
        assert!(err.to_string().contains("negative"), "{err}");
    }

    #[test]
    fn malformed_strings_are_rejected() {
        let value = json!({
            "native": 1,
            "text": "12x",
            "short": "1",
            "file": "1",
        });
        assert!(serde_json::from_value::<Row>(value).is_err());

        let value = json!({
            "native": 1,
            "text": "1",
            "short": "not-base62",
            "file": "1",
        });
        let err = serde_json::from_value::<Row>(value).unwrap_err();
        assert!(err.to_string().contains("invalid base62 character '-'"), "{err}");
    }
}
