//! BSON encodings shared by the domain repositories.
//!
//! The driver serializes documents in non-human-readable mode, so a `Uuid`
//! field lands as Binary (generic subtype). Query filters have to use the
//! same encoding or they never match. Timestamps are written as BSON dates
//! so that sorting on them is chronological, while JSON keeps RFC 3339.

use chrono::{DateTime, Utc};
use mongodb::bson::{self, Binary, Bson, spec::BinarySubtype};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use uuid::Uuid;

/// Encode a `Uuid` the way the driver stores a `Uuid` field.
pub fn uuid_to_bson(id: &Uuid) -> Bson {
    Bson::Binary(Binary {
        subtype: BinarySubtype::Generic,
        bytes: id.as_bytes().to_vec(),
    })
}

/// `#[serde(with = "database::mongodb::datetime")]` for `DateTime<Utc>` fields.
///
/// Stored values are truncated to millisecond precision.
pub mod datetime {
    use super::*;
    use serde::de::Error as _;

    pub fn serialize<S>(value: &DateTime<Utc>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        if serializer.is_human_readable() {
            value.serialize(serializer)
        } else {
            bson::DateTime::from_millis(value.timestamp_millis()).serialize(serializer)
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<DateTime<Utc>, D::Error>
    where
        D: Deserializer<'de>,
    {
        if deserializer.is_human_readable() {
            DateTime::<Utc>::deserialize(deserializer)
        } else {
            let stored = bson::DateTime::deserialize(deserializer)?;
            DateTime::from_timestamp_millis(stored.timestamp_millis())
                .ok_or_else(|| D::Error::custom("stored date is out of range"))
        }
    }
}

/// Same as [`datetime`] for `Option<DateTime<Utc>>` fields.
pub mod option_datetime {
    use super::*;

    struct Stored(DateTime<Utc>);

    impl Serialize for Stored {
        fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
            super::datetime::serialize(&self.0, serializer)
        }
    }

    impl<'de> Deserialize<'de> for Stored {
        fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
            super::datetime::deserialize(deserializer).map(Stored)
        }
    }

    pub fn serialize<S>(value: &Option<DateTime<Utc>>, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        match value {
            Some(value) => serializer.serialize_some(&Stored(*value)),
            None => serializer.serialize_none(),
        }
    }

    pub fn deserialize<'de, D>(deserializer: D) -> Result<Option<DateTime<Utc>>, D::Error>
    where
        D: Deserializer<'de>,
    {
        Ok(Option::<Stored>::deserialize(deserializer)?.map(|stored| stored.0))
    }
}
