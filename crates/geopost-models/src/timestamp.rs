//! Second-precision local timestamp.
//!
//! Messages carry the wall-clock time at which they were posted, in the
//! user's local time zone, with no offset and no sub-second part. On disk
//! the value is the string `YYYY-MM-DD HH:MM:SS`.

use std::fmt;
use std::str::FromStr;

use chrono::{Local, NaiveDate, NaiveDateTime, Timelike};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::ModelError;

/// `strftime` pattern of the serialized form.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// A local date-time truncated to whole seconds.
///
/// # Examples
///
/// ```
/// use geopost_models::Timestamp;
///
/// let ts: Timestamp = "2024-01-01 10:00:00".parse().unwrap();
/// assert_eq!(ts.to_string(), "2024-01-01 10:00:00");
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    /// Wrap a naive date-time, dropping any sub-second component.
    pub fn new(at: NaiveDateTime) -> Self {
        Self(at.with_nanosecond(0).unwrap_or(at))
    }

    /// Current local time.
    pub fn now() -> Self {
        Self::new(Local::now().naive_local())
    }

    /// Build from calendar fields. Returns `None` for impossible dates/times.
    pub fn from_ymd_hms(year: i32, month: u32, day: u32, hour: u32, min: u32, sec: u32) -> Option<Self> {
        NaiveDate::from_ymd_opt(year, month, day)
            .and_then(|d| d.and_hms_opt(hour, min, sec))
            .map(Self)
    }

    /// The wrapped date-time.
    pub fn as_naive(&self) -> NaiveDateTime {
        self.0
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.format(TIMESTAMP_FORMAT))
    }
}

impl FromStr for Timestamp {
    type Err = ModelError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let parsed = NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT).map_err(|e| {
            ModelError::InvalidTimestamp {
                value: s.to_string(),
                reason: e.to_string(),
            }
        })?;
        // chrono accepts unpadded fields; the stored form must be exact.
        if parsed.format(TIMESTAMP_FORMAT).to_string() != s {
            return Err(ModelError::InvalidTimestamp {
                value: s.to_string(),
                reason: "expected YYYY-MM-DD HH:MM:SS".to_string(),
            });
        }
        Ok(Self(parsed))
    }
}

impl From<NaiveDateTime> for Timestamp {
    fn from(at: NaiveDateTime) -> Self {
        Self::new(at)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = String::deserialize(deserializer)?;
        raw.parse().map_err(serde::de::Error::custom)
    }
}
