use uuid::Uuid;

use crate::{Result, SnowflakeId, base62};

/// Extension trait for IDs that render as short, URL-safe Base62 strings.
///
/// ```
/// use idgen::{Base62Ext, SnowflakeId};
///
/// let id = SnowflakeId::from_raw(372077392774041600);
/// let encoded = id.encode_base62();
/// assert_eq!(encoded, "ru7l9yaTE4");
/// assert_eq!(SnowflakeId::decode_base62(&encoded).unwrap(), id);
/// ```
pub trait Base62Ext: Sized {
    fn encode_base62(&self) -> String;

    /// # Errors
    ///
    /// Returns [`crate::Error::Base62`] if `encoded` is not valid Base62 for
    /// this type.
    fn decode_base62(encoded: &str) -> Result<Self>;
}

impl Base62Ext for SnowflakeId {
    /// The all-zero ID, which no generator issues, encodes as `"0"`.
    fn encode_base62(&self) -> String {
        base62::encode_u128(u128::from(self.to_raw()))
    }

    fn decode_base62(encoded: &str) -> Result<Self> {
        Self::try_from_i64(base62::decode_i64(encoded)?)
    }
}

impl Base62Ext for Uuid {
    fn encode_base62(&self) -> String {
        base62::encode_uuid(*self)
    }

    fn decode_base62(encoded: &str) -> Result<Self> {
        Ok(base62::decode_uuid(encoded)?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{Base62Error, Error};

    #[test]
    fn snowflake_round_trip() {
        let id = SnowflakeId::from_components(123_456_789, 300, 4095);
        assert_eq!(SnowflakeId::decode_base62(&id.encode_base62()).unwrap(), id);
    }

    #[test]
    fn snowflake_rejects_values_past_i64() {
        assert_eq!(
            SnowflakeId::decode_base62("aZl8N0y58M8").unwrap_err(),
            Error::Base62(Base62Error::Overflow { bits: 63 })
        );
    }

    #[test]
    fn uuid_round_trip() {
        let uuid = Uuid::from_u128(0x0190_a1b2_c3d4_7e5f_8a9b_0c1d_2e3f_4a5b);
        assert_eq!(uuid.encode_base62(), "2X5wLl3Bri7wjSW0y1myL");
        assert_eq!(Uuid::decode_base62("2X5wLl3Bri7wjSW0y1myL").unwrap(), uuid);
    }
}
