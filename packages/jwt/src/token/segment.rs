//! Ordered JSON object backing the default header and payload.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use crate::numeric_date::NumericDate;

/// Ordered mapping from member name to JSON value.
///
/// Insertion order is kept on output. The typed getters never fail: an absent
/// member, or one of the wrong shape, reads as the documented zero value.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Segment(Map<String, Value>);

impl Segment {
    /// Empty segment
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or replace a member
    pub fn add(&mut self, name: impl Into<String>, value: impl Into<Value>) -> &mut Self {
        self.0.insert(name.into(), value.into());
        self
    }

    /// Raw member value
    #[must_use]
    pub fn get(&self, name: &str) -> Option<&Value> {
        self.0.get(name)
    }

    /// Remove a member, returning its value
    pub fn remove(&mut self, name: &str) -> Option<Value> {
        self.0.shift_remove(name)
    }

    /// String member, or `""`
    #[must_use]
    pub fn get_string(&self, name: &str) -> &str {
        self.0.get(name).and_then(Value::as_str).unwrap_or_default()
    }

    /// Numeric member, or `0.0`
    #[must_use]
    pub fn get_f64(&self, name: &str) -> f64 {
        self.0.get(name).and_then(Value::as_f64).unwrap_or_default()
    }

    /// Boolean member, or `false`
    #[must_use]
    pub fn get_bool(&self, name: &str) -> bool {
        self.0.get(name).and_then(Value::as_bool).unwrap_or_default()
    }

    /// Date member.
    ///
    /// Numbers are seconds since the epoch; strings are parsed as RFC 3339.
    /// Anything else, and an unparseable string, reads as the Unix epoch.
    #[must_use]
    pub fn get_date(&self, name: &str) -> DateTime<Utc> {
        match self.0.get(name) {
            Some(Value::Number(seconds)) => seconds
                .as_f64()
                .map(|s| NumericDate::from_seconds_f64(s).to_datetime())
                .unwrap_or_default(),
            Some(Value::String(text)) => DateTime::parse_from_rfc3339(text)
                .map(|t| t.with_timezone(&Utc))
                .unwrap_or_default(),
            _ => DateTime::default(),
        }
    }

    /// A single string or the string elements of an array; other elements are skipped
    #[must_use]
    pub fn get_string_array(&self, name: &str) -> Vec<String> {
        match self.0.get(name) {
            Some(Value::String(single)) => vec![single.clone()],
            Some(Value::Array(items)) => items
                .iter()
                .filter_map(Value::as_str)
                .map(str::to_string)
                .collect(),
            _ => Vec::new(),
        }
    }

    /// Nested object member, or an empty segment
    #[must_use]
    pub fn get_segment(&self, name: &str) -> Segment {
        match self.0.get(name) {
            Some(Value::Object(map)) => Segment(map.clone()),
            _ => Segment::default(),
        }
    }

    /// Number of members
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// True when there are no members
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Members in insertion order
    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.0.iter()
    }
}

impl From<Map<String, Value>> for Segment {
    fn from(map: Map<String, Value>) -> Self {
        Self(map)
    }
}

impl From<Segment> for Value {
    fn from(segment: Segment) -> Self {
        Value::Object(segment.0)
    }
}
