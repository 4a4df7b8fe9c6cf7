use std::{fmt, num::ParseIntError, str::FromStr};

use chrono::{DateTime, Utc};
use strum::IntoStaticStr;
use thiserror::Error;

/// Point in time with seconds resolution, counted from the UNIX epoch (January 1, 1970 UTC).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnixTimestamp(i64);

impl UnixTimestamp {
    pub const EPOCH: Self = Self(0);

    pub const fn from_secs(secs: i64) -> Self {
        Self(secs)
    }

    pub const fn as_secs(self) -> i64 {
        self.0
    }

    /// Calendar date of this timestamp, `None` if it lies outside the range chrono can represent.
    pub fn to_datetime(self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp(self.0, 0)
    }
}

impl fmt::Display for UnixTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error, IntoStaticStr)]
#[strum(serialize_all = "snake_case")]
pub enum TimestampParseError {
    #[error("invalid timestamp")]
    Invalid(#[source] ParseIntError),
    #[error("timestamp supplied is negative")]
    Negative(i64),
}

/// Parses a base-10 count of seconds. Only non-negative values are accepted.
impl FromStr for UnixTimestamp {
    type Err = TimestampParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let secs = s.parse::<i64>().map_err(TimestampParseError::Invalid)?;
        if secs < 0 {
            return Err(TimestampParseError::Negative(secs));
        }
        Ok(Self(secs))
    }
}
