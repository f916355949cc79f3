//! Timezone descriptors carried in requests.

use std::fmt;
use std::sync::OnceLock;

use chrono::{DateTime, FixedOffset, Offset, TimeZone, Utc};
use chrono_tz::Tz;
use regex::Regex;
use tracing::debug;

/// HTTP header a client sends its timezone in.
pub const TIMEZONE_HEADER: &str = "X-Timezone";

/// Query or context key holding the timezone.
pub const TIMEZONE_KEY: &str = "timezone";

fn timezone_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"^UTC$|^UTC[+-][0-9]{1,2}$").expect("Valid timezone regex")
    })
}

/// A zone a [`CTime`](super::CTime) can be expressed in.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Zone {
    /// A constant offset such as `UTC+8`.
    Fixed(FixedOffset),
    /// An IANA zone whose offset follows its DST rules.
    Named(Tz),
}

impl Zone {
    pub fn utc() -> Self {
        Self::Fixed(Utc.fix())
    }

    /// The offset from UTC in force at `instant`.
    pub fn offset_at(&self, instant: &DateTime<Utc>) -> FixedOffset {
        match self {
            Self::Fixed(offset) => *offset,
            Self::Named(tz) => tz.offset_from_utc_datetime(&instant.naive_utc()).fix(),
        }
    }
}

impl Default for Zone {
    fn default() -> Self {
        Self::utc()
    }
}

impl From<FixedOffset> for Zone {
    fn from(offset: FixedOffset) -> Self {
        Self::Fixed(offset)
    }
}

impl From<Tz> for Zone {
    fn from(tz: Tz) -> Self {
        Self::Named(tz)
    }
}

impl fmt::Display for Zone {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Fixed(offset) => write!(f, "{offset}"),
            Self::Named(tz) => f.write_str(tz.name()),
        }
    }
}

/// Parse `UTC`, `UTC+8`, `UTC-6` or an IANA name such as `Asia/Shanghai`.
///
/// Anything else falls back to UTC, as does an offset beyond ±23 hours.
///
/// ```rust
/// use chrono::{TimeZone, Utc};
/// use errtrail_adapters::ctime::parse_timezone;
///
/// let at = Utc.with_ymd_and_hms(2022, 11, 8, 14, 52, 33).unwrap();
/// assert_eq!(parse_timezone("UTC+8").offset_at(&at).local_minus_utc(), 8 * 3600);
/// assert_eq!(parse_timezone(" UTC-6 ").offset_at(&at).local_minus_utc(), -6 * 3600);
/// assert_eq!(parse_timezone("Asia/Shanghai").offset_at(&at).local_minus_utc(), 8 * 3600);
/// assert_eq!(parse_timezone("Mars/Olympus").offset_at(&at).local_minus_utc(), 0);
/// ```
pub fn parse_timezone(input: &str) -> Zone {
    let input = input.trim();
    if timezone_pattern().is_match(input) {
        return parse_utc_offset(input).map_or_else(Zone::utc, Zone::Fixed);
    }

    match input.parse::<Tz>() {
        Ok(tz) => Zone::Named(tz),
        Err(_) => {
            debug!(timezone = input, "Unrecognized timezone, using UTC");
            Zone::utc()
        }
    }
}

/// `UTC` or `UTC±N` as a fixed offset. `None` if chrono rejects the offset.
fn parse_utc_offset(input: &str) -> Option<FixedOffset> {
    let Some(offset) = input.strip_prefix("UTC").filter(|rest| !rest.is_empty()) else {
        return Some(Utc.fix());
    };

    let (sign, digits) = offset.split_at(1);
    let hours = digits.parse::<i32>().ok()?;
    let seconds = match sign {
        "+" => hours * 3600,
        "-" => -hours * 3600,
        _ => return None,
    };
    FixedOffset::east_opt(seconds)
}
