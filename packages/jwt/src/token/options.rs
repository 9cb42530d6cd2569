//! Token decoding and validation options.

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Options governing how a token is decoded, encoded and validated.
///
/// Loadable from configuration; the clock-skew tolerance is given in whole
/// seconds as `tolerance_secs`:
///
/// ```
/// let options: jwtv::TokenOptions = serde_json::from_str(
///     r#"{"allowable_signing_algorithms": ["RS256"], "tolerance_secs": 30}"#,
/// ).unwrap();
/// assert_eq!(options.tolerance.as_secs(), 30);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TokenOptions {
    /// Accept and emit `=` padding on segments
    pub allow_token_padding: bool,
    /// Reject encodings with non-zero trailing bits
    pub use_strict_decoding: bool,
    /// When set, only these `alg` values are accepted at extraction
    pub allowable_signing_algorithms: Option<Vec<String>>,
    /// Clock skew applied to `exp`, `nbf` and `iat`
    #[serde(
        rename = "tolerance_secs",
        serialize_with = "serialize_secs",
        deserialize_with = "deserialize_secs"
    )]
    pub tolerance: Duration,
    /// Skip the temporal checks entirely
    pub ignore_temporal_claims: bool,
}

fn serialize_secs<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(value.as_secs())
}

fn deserialize_secs<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    u64::deserialize(deserializer).map(Duration::from_secs)
}

impl TokenOptions {
    /// Toggle `=` padding
    #[must_use]
    pub fn with_token_padding(mut self, allow: bool) -> Self {
        self.allow_token_padding = allow;
        self
    }

    /// Toggle strict base64 decoding
    #[must_use]
    pub fn with_strict_decoding(mut self, strict: bool) -> Self {
        self.use_strict_decoding = strict;
        self
    }

    /// Restrict accepted `alg` values
    #[must_use]
    pub fn with_allowed_algorithms<I, S>(mut self, algorithms: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.allowable_signing_algorithms = Some(algorithms.into_iter().map(Into::into).collect());
        self
    }

    /// Set the clock-skew tolerance
    #[must_use]
    pub fn with_tolerance(mut self, tolerance: Duration) -> Self {
        self.tolerance = tolerance;
        self
    }

    /// Toggle the temporal checks
    #[must_use]
    pub fn with_ignore_temporal_claims(mut self, ignore: bool) -> Self {
        self.ignore_temporal_claims = ignore;
        self
    }

    /// True when `alg` passes the allow-list (always, without one)
    #[must_use]
    pub fn allows_algorithm(&self, alg: &str) -> bool {
        self.allowable_signing_algorithms
            .as_ref()
            .is_none_or(|allowed| allowed.iter().any(|name| name == alg))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_lenient_raw_url() {
        let options = TokenOptions::default();
        assert!(!options.allow_token_padding);
        assert!(!options.use_strict_decoding);
        assert!(options.allows_algorithm("anything"));
        assert_eq!(options.tolerance, Duration::ZERO);
    }

    #[test]
    fn empty_allow_list_rejects_everything() {
        let options = TokenOptions::default().with_allowed_algorithms(Vec::<String>::new());
        assert!(!options.allows_algorithm("HS256"));
    }

    #[test]
    fn deserializes_partial_config() {
        let options: TokenOptions =
            serde_json::from_str(r#"{"ignore_temporal_claims":true,"tolerance_secs":5}"#).unwrap();
        assert!(options.ignore_temporal_claims);
        assert_eq!(options.tolerance, Duration::from_secs(5));
        assert_eq!(options.allowable_signing_algorithms, None);
        let round = serde_json::to_value(&options).unwrap();
        assert_eq!(round["tolerance_secs"], 5);
    }
}
