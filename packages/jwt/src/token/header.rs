//! JOSE header segment

use std::ops::{Deref, DerefMut};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use super::segment::Segment;

/// Contract the token engine needs from a header shape
pub trait JoseHeader: Serialize + DeserializeOwned {
    /// Algorithm name from the `alg` member, `""` when absent
    fn alg(&self) -> &str;
}

/// Free-form JOSE header backed by a [`Segment`]
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Header(Segment);

impl Header {
    /// Header with `alg` set and `typ` of `JWT`
    #[must_use]
    pub fn new(alg: impl Into<String>) -> Self {
        let mut segment = Segment::new();
        segment.add("alg", alg.into()).add("typ", "JWT");
        Self(segment)
    }

    /// Key id hint, `""` when absent
    #[must_use]
    pub fn kid(&self) -> &str {
        self.0.get_string("kid")
    }

    /// Media type, `""` when absent
    #[must_use]
    pub fn typ(&self) -> &str {
        self.0.get_string("typ")
    }
}

impl JoseHeader for Header {
    fn alg(&self) -> &str {
        self.0.get_string("alg")
    }
}

impl From<Segment> for Header {
    fn from(segment: Segment) -> Self {
        Self(segment)
    }
}

impl Deref for Header {
    type Target = Segment;

    fn deref(&self) -> &Segment {
        &self.0
    }
}

impl DerefMut for Header {
    fn deref_mut(&mut self) -> &mut Segment {
        &mut self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_members() {
        let mut header = Header::new("ES256");
        header.add("kid", "key-1");
        assert_eq!(header.alg(), "ES256");
        assert_eq!(header.typ(), "JWT");
        assert_eq!(header.kid(), "key-1");
        assert_eq!(
            serde_json::to_string(&header).unwrap(),
            r#"{"alg":"ES256","typ":"JWT","kid":"key-1"}"#
        );
    }

    #[test]
    fn non_string_alg_reads_empty() {
        let header: Header = serde_json::from_str(r#"{"alg":256}"#).unwrap();
        assert_eq!(header.alg(), "");
    }
}
