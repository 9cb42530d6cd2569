//! Claims segment and the `aud` claim

use std::ops::{Deref, DerefMut};

use chrono::{DateTime, Utc};
use serde::de::{self, DeserializeOwned, Deserializer};
use serde::{Deserialize, Serialize};
use serde_json::Value;

use super::segment::Segment;

/// Contract the token engine needs from a claims shape.
///
/// Absent dates read as the Unix epoch and absent strings as `""`.
pub trait ClaimSet: Serialize + DeserializeOwned {
    /// Expiration time
    fn exp(&self) -> DateTime<Utc>;
    /// Not-before time
    fn nbf(&self) -> DateTime<Utc>;
    /// Issued-at time
    fn iat(&self) -> DateTime<Utc>;
    /// Issuer
    fn iss(&self) -> &str;
    /// Subject
    fn sub(&self) -> &str;
    /// Audience, normalized to a list
    fn aud(&self) -> Vec<String>;
}

/// Free-form claims backed by a [`Segment`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Payload(Segment);

impl Payload {
    /// Empty claim set
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Token id, `""` when absent
    #[must_use]
    pub fn jti(&self) -> &str {
        self.0.get_string("jti")
    }
}

impl ClaimSet for Payload {
    fn exp(&self) -> DateTime<Utc> {
        self.0.get_date("exp")
    }

    fn nbf(&self) -> DateTime<Utc> {
        self.0.get_date("nbf")
    }

    fn iat(&self) -> DateTime<Utc> {
        self.0.get_date("iat")
    }

    fn iss(&self) -> &str {
        self.0.get_string("iss")
    }

    fn sub(&self) -> &str {
        self.0.get_string("sub")
    }

    fn aud(&self) -> Vec<String> {
        self.0.get_string_array("aud")
    }
}

impl From<Segment> for Payload {
    fn from(segment: Segment) -> Self {
        Self(segment)
    }
}

impl Deref for Payload {
    type Target = Segment;

    fn deref(&self) -> &Segment {
        &self.0
    }
}

impl DerefMut for Payload {
    fn deref_mut(&mut self) -> &mut Segment {
        &mut self.0
    }
}

/// The `aud` claim: a single string or an array of strings on input, always
/// an array on output.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct Audience(Vec<String>);

impl Audience {
    /// Audience from any list of names
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    /// Audience names in order
    #[must_use]
    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    /// True when no audience was given
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// True when `name` is one of the audiences
    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.0.iter().any(|aud| aud == name)
    }
}

impl From<Audience> for Vec<String> {
    fn from(audience: Audience) -> Self {
        audience.0
    }
}

impl<'de> Deserialize<'de> for Audience {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        match Value::deserialize(deserializer)? {
            Value::Null => Ok(Self::default()),
            Value::String(single) => Ok(Self(vec![single])),
            Value::Array(items) => items
                .into_iter()
                .map(|item| match item {
                    Value::String(name) => Ok(name),
                    other => Err(de::Error::custom(format!(
                        "audience entries must be strings, got {other}"
                    ))),
                })
                .collect::<Result<_, _>>()
                .map(Self),
            other => Err(de::Error::custom(format!(
                "audience must be a string or an array, got {other}"
            ))),
        }
    }
}
