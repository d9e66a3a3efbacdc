//! Entity identifiers.
//!
//! The platform issues 64-bit snowflake identifiers whose upper bits encode
//! a creation timestamp. The wire format serializes them as decimal strings
//! to dodge JSON number precision limits, so [`Id`] accepts both forms on
//! input and always emits a string.

use chrono::{DateTime, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;

/// Milliseconds between the Unix epoch and the platform epoch.
const PLATFORM_EPOCH_MS: u64 = 1_420_070_400_000;

/// A snowflake entity identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Id(pub u64);

impl Id {
    /// Create an identifier from its raw value.
    pub const fn new(raw: u64) -> Self {
        Id(raw)
    }

    /// Raw 64-bit value.
    pub const fn get(self) -> u64 {
        self.0
    }

    /// Creation time encoded in the upper 42 bits, if representable.
    pub fn created_at(self) -> Option<DateTime<Utc>> {
        let ms = (self.0 >> 22) + PLATFORM_EPOCH_MS;
        DateTime::from_timestamp_millis(i64::try_from(ms).ok()?)
    }
}

impl fmt::Display for Id {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<u64> for Id {
    fn from(raw: u64) -> Self {
        Id(raw)
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(&self.0)
    }
}

struct IdVisitor;

impl Visitor<'_> for IdVisitor {
    type Value = Id;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a snowflake id as a string or integer")
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Id, E> {
        Ok(Id(v))
    }

    fn visit_str<E: de::Error>(self, v: &str) -> Result<Id, E> {
        v.parse::<u64>().map(Id).map_err(de::Error::custom)
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(IdVisitor)
    }
}
