//! UTC-normalised timestamp with fixed text, JSON and storage encodings.
//!
//! [`CTime`] is meant to replace raw `DateTime` values in records:
//!
//! ```rust
//! use errtrail_adapters::ctime::CTime;
//!
//! #[derive(serde::Serialize, serde::Deserialize)]
//! struct User {
//!     name: String,
//!     created_at: CTime,
//!     updated_at: CTime,
//! }
//! ```
//!
//! - Text is RFC 3339 at second precision (`2022-11-08T14:52:33Z`).
//! - JSON is that text, or `null` for the zero value.
//! - Storage goes through [`SqlValue`]: `NULL` for the zero value,
//!   otherwise a UTC timestamp.

pub mod timezone;

use std::fmt;

use chrono::{DateTime, FixedOffset, SecondsFormat, TimeZone, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TimeError;

pub use timezone::{TIMEZONE_HEADER, TIMEZONE_KEY, Zone, parse_timezone};

/// Seconds from the Unix epoch to `0001-01-01T00:00:00Z`.
const ZERO_UNIX_SECONDS: i64 = -62_135_596_800;

/// A point in time, stored in UTC unless re-expressed with
/// [`CTime::in_zone`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct CTime(DateTime<FixedOffset>);

impl CTime {
    /// Column type hint for schema generators.
    pub const SQL_DATA_TYPE: &'static str = "datetime";

    /// Normalise any `DateTime` to UTC.
    pub fn new<Tz: TimeZone>(datetime: DateTime<Tz>) -> Self {
        Self(datetime.with_timezone(&Utc).fixed_offset())
    }

    /// The current time in UTC.
    pub fn now() -> Self {
        Self::now_with(Utc::now)
    }

    /// The time reported by `clock`, in UTC.
    pub fn now_with(clock: impl FnOnce() -> DateTime<Utc>) -> Self {
        Self::new(clock())
    }

    /// `0001-01-01T00:00:00Z`, the "no value" timestamp.
    pub fn zero() -> Self {
        Self::new(
            DateTime::from_timestamp(ZERO_UNIX_SECONDS, 0).unwrap_or(DateTime::<Utc>::MIN_UTC),
        )
    }

    pub fn is_zero(&self) -> bool {
        *self == Self::zero()
    }

    /// The same instant expressed in `zone`, at the offset `zone` has at
    /// that instant. `None` returns `self`.
    pub fn in_zone(self, zone: Option<Zone>) -> Self {
        match zone {
            Some(zone) => {
                let offset = zone.offset_at(&self.to_utc());
                Self(self.0.with_timezone(&offset))
            }
            None => self,
        }
    }

    pub fn datetime(&self) -> DateTime<FixedOffset> {
        self.0
    }

    pub fn to_utc(&self) -> DateTime<Utc> {
        self.0.with_timezone(&Utc)
    }

    pub fn offset(&self) -> FixedOffset {
        *self.0.offset()
    }

    /// Parse RFC 3339 text and normalise it to UTC.
    pub fn parse(input: &str) -> Result<Self, TimeError> {
        DateTime::parse_from_rfc3339(input)
            .map(Self::new)
            .map_err(|source| TimeError::Parse {
                input: input.to_string(),
                source,
            })
    }

    /// Read a storage value. `NULL` gives the zero value.
    pub fn scan(src: SqlValue) -> Result<Self, TimeError> {
        match src {
            SqlValue::Null => Ok(Self::zero()),
            SqlValue::Timestamp(datetime) => Ok(Self::new(datetime)),
            other => Err(TimeError::InvalidScanValue(other.to_string())),
        }
    }

    /// Write a storage value. The zero value is stored as `NULL`.
    pub fn value(&self) -> SqlValue {
        if self.is_zero() {
            SqlValue::Null
        } else {
            SqlValue::Timestamp(self.to_utc())
        }
    }
}

impl Default for CTime {
    fn default() -> Self {
        Self::zero()
    }
}

impl fmt::Display for CTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0.to_rfc3339_opts(SecondsFormat::Secs, true))
    }
}

impl From<DateTime<Utc>> for CTime {
    fn from(datetime: DateTime<Utc>) -> Self {
        Self::new(datetime)
    }
}

impl Serialize for CTime {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        if self.is_zero() {
            serializer.serialize_none()
        } else {
            serializer.collect_str(self)
        }
    }
}

impl<'de> Deserialize<'de> for CTime {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Option::<String>::deserialize(deserializer)? {
            None => Ok(Self::zero()),
            Some(text) if text == "null" => Ok(Self::zero()),
            Some(text) => Self::parse(&text).map_err(serde::de::Error::custom),
        }
    }
}

// ── SqlValue ─────────────────────────────────────────────────────────────────

/// A column value as exchanged with a relational store.
#[derive(Debug, Clone, PartialEq)]
pub enum SqlValue {
    Null,
    Timestamp(DateTime<Utc>),
    Text(String),
    Integer(i64),
}

impl fmt::Display for SqlValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Null => f.write_str("NULL"),
            Self::Timestamp(datetime) => write!(f, "{}", datetime.to_rfc3339()),
            Self::Text(text) => write!(f, "{text:?}"),
            Self::Integer(value) => write!(f, "{value}"),
        }
    }
}

impl TryFrom<SqlValue> for CTime {
    type Error = TimeError;

    fn try_from(value: SqlValue) -> Result<Self, Self::Error> {
        Self::scan(value)
    }
}

impl From<CTime> for SqlValue {
    fn from(time: CTime) -> Self {
        time.value()
    }
}
