//! RFC 7519 NumericDate at one-second precision

use std::fmt;

use chrono::{DateTime, TimeZone, Utc};
use serde::de::{self, Visitor};
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Seconds since the Unix epoch, truncated to whole seconds.
///
/// Serializes as an integer. Deserializes from any JSON number, including
/// fractional seconds, which are dropped.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct NumericDate(i64);

impl NumericDate {
    /// Date from whole seconds since the epoch
    #[inline]
    #[must_use]
    pub const fn from_seconds(seconds: i64) -> Self {
        Self(seconds)
    }

    /// Date from fractional seconds since the epoch, truncated
    #[must_use]
    #[allow(clippy::cast_possible_truncation)]
    pub fn from_seconds_f64(seconds: f64) -> Self {
        Self(seconds.trunc() as i64)
    }

    /// Current time, truncated
    #[must_use]
    pub fn now() -> Self {
        Self::from(Utc::now())
    }

    /// Seconds since the epoch
    #[inline]
    #[must_use]
    pub const fn seconds(self) -> i64 {
        self.0
    }

    /// UTC instant; out-of-range values clamp to the epoch
    #[must_use]
    pub fn to_datetime(self) -> DateTime<Utc> {
        Utc.timestamp_opt(self.0, 0).single().unwrap_or_default()
    }
}

impl From<DateTime<Utc>> for NumericDate {
    fn from(value: DateTime<Utc>) -> Self {
        Self(value.timestamp())
    }
}

impl From<NumericDate> for DateTime<Utc> {
    fn from(value: NumericDate) -> Self {
        value.to_datetime()
    }
}

impl From<NumericDate> for serde_json::Value {
    fn from(value: NumericDate) -> Self {
        Self::from(value.0)
    }
}

impl Serialize for NumericDate {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_i64(self.0)
    }
}

struct NumericDateVisitor;

impl Visitor<'_> for NumericDateVisitor {
    type Value = NumericDate;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a JSON number of seconds since the Unix epoch")
    }

    fn visit_i64<E: de::Error>(self, v: i64) -> Result<Self::Value, E> {
        Ok(NumericDate(v))
    }

    fn visit_u64<E: de::Error>(self, v: u64) -> Result<Self::Value, E> {
        i64::try_from(v)
            .map(NumericDate)
            .map_err(|_| E::custom("NumericDate out of range"))
    }

    fn visit_f64<E: de::Error>(self, v: f64) -> Result<Self::Value, E> {
        if v.is_finite() {
            Ok(NumericDate::from_seconds_f64(v))
        } else {
            Err(E::custom("NumericDate must be finite"))
        }
    }
}

impl<'de> Deserialize<'de> for NumericDate {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(NumericDateVisitor)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fractional_seconds_truncate() {
        let date: NumericDate = serde_json::from_str("1700000000.987").unwrap();
        assert_eq!(date.seconds(), 1_700_000_000);
        assert_eq!(serde_json::to_string(&date).unwrap(), "1700000000");
    }

    #[test]
    fn strings_are_rejected() {
        assert!(serde_json::from_str::<NumericDate>("\"1700000000\"").is_err());
    }

    #[test]
    fn converts_through_chrono() {
        let date = NumericDate::from_seconds(86_400);
        let instant: DateTime<Utc> = date.into();
        assert_eq!(instant.to_rfc3339(), "1970-01-02T00:00:00+00:00");
        assert_eq!(NumericDate::from(instant), date);
    }
}
