use std::fmt;
use std::str::FromStr;

use chrono::{NaiveDateTime, SubsecRound, Utc};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

use crate::error::TypeError;

/// Textual format used for every persisted timestamp.
///
/// Example: `2017-09-28T21:05:54.119427`. Parsing accepts a missing or
/// shorter fractional part.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6f";

/// A naive UTC timestamp with microsecond precision.
///
/// Precision is truncated to microseconds on construction so that a value
/// always survives a format/parse cycle unchanged.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Timestamp(NaiveDateTime);

impl Timestamp {
    /// The current UTC time.
    pub fn now() -> Self {
        Self::from_naive(Utc::now().naive_utc())
    }

    /// Wrap an existing naive UTC datetime.
    pub fn from_naive(dt: NaiveDateTime) -> Self {
        Self(dt.trunc_subsecs(6))
    }

    /// The underlying naive UTC datetime.
    pub fn as_naive(&self) -> NaiveDateTime {
        self.0
    }

    /// Parse a timestamp written with [`TIMESTAMP_FORMAT`].
    pub fn parse(s: &str) -> Result<Self, TypeError> {
        NaiveDateTime::parse_from_str(s, TIMESTAMP_FORMAT)
            .map(Self::from_naive)
            .map_err(|e| TypeError::InvalidTimestamp {
                value: s.to_string(),
                reason: e.to_string(),
            })
    }

    /// Render with [`TIMESTAMP_FORMAT`].
    pub fn format(&self) -> String {
        self.0.format(TIMESTAMP_FORMAT).to_string()
    }
}

impl fmt::Debug for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Timestamp({})", self.format())
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.format())
    }
}

impl FromStr for Timestamp {
    type Err = TypeError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl Serialize for Timestamp {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

impl<'de> Deserialize<'de> for Timestamp {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        Self::parse(&s).map_err(serde::de::Error::custom)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{NaiveDate, Timelike};

    fn fixed() -> Timestamp {
        let dt = NaiveDate::from_ymd_opt(2017, 9, 28)
            .unwrap()
            .and_hms_micro_opt(21, 5, 54, 119_427)
            .unwrap();
        Timestamp::from_naive(dt)
    }

    #[test]
    fn format_is_fixed_width_microseconds() {
        assert_eq!(fixed().format(), "2017-09-28T21:05:54.119427");
    }

    #[test]
    fn parse_reads_formatted_output() {
        let ts = fixed();
        assert_eq!(Timestamp::parse(&ts.format()).unwrap(), ts);
    }

    #[test]
    fn parse_accepts_missing_fraction() {
        let ts = Timestamp::parse("2017-09-28T21:05:54").unwrap();
        assert_eq!(ts.as_naive().nanosecond(), 0);
        assert_eq!(ts.format(), "2017-09-28T21:05:54.000000");
    }

    #[test]
    fn parse_rejects_garbage() {
        let err = Timestamp::parse("yesterday").unwrap_err();
        assert!(matches!(err, TypeError::InvalidTimestamp { .. }));
    }

    #[test]
    fn now_is_truncated_to_microseconds() {
        let ts = Timestamp::now();
        assert_eq!(ts.as_naive().nanosecond() % 1_000, 0);
        assert_eq!(Timestamp::parse(&ts.format()).unwrap(), ts);
    }

    #[test]
    fn serde_uses_text_format() {
        let json = serde_json::to_string(&fixed()).unwrap();
        assert_eq!(json, "\"2017-09-28T21:05:54.119427\"");
        let back: Timestamp = serde_json::from_str(&json).unwrap();
        assert_eq!(back, fixed());
    }

    #[test]
    fn ordering_follows_time() {
        let earlier = fixed();
        let later = Timestamp::parse("2017-09-28T21:05:55.000000").unwrap();
        assert!(earlier < later);
    }
}
