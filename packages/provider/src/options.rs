//! Remote provider options

use std::time::Duration;

use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// Default HTTP timeout for key-set requests
pub const DEFAULT_HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Where and how often a remote provider fetches its key set.
///
/// Durations are whole seconds in configuration files:
///
/// ```
/// let options: jwtv_provider::RemoteJwkProviderOptions = serde_json::from_str(
///     r#"{"fetch_url": "https://example.com/.well-known/jwks.json", "fetch_interval_secs": 3600}"#,
/// ).unwrap();
/// assert_eq!(options.fetch_interval.as_secs(), 3600);
/// assert_eq!(options.http_timeout.as_secs(), 10);
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct RemoteJwkProviderOptions {
    /// Give up on a request after this long
    #[serde(
        rename = "http_timeout_secs",
        serialize_with = "serialize_secs",
        deserialize_with = "deserialize_secs"
    )]
    pub http_timeout: Duration,
    /// Period between background refreshes, or the age after which an
    /// on-demand key set is stale. Zero disables background refresh.
    #[serde(
        rename = "fetch_interval_secs",
        serialize_with = "serialize_secs",
        deserialize_with = "deserialize_secs"
    )]
    pub fetch_interval: Duration,
    /// Key-set URL, typically `.../.well-known/jwks.json`
    pub fetch_url: String,
}

/// On-demand providers take the same options
pub type OnDemandJwkProviderOptions = RemoteJwkProviderOptions;

impl Default for RemoteJwkProviderOptions {
    fn default() -> Self {
        Self {
            http_timeout: DEFAULT_HTTP_TIMEOUT,
            fetch_interval: Duration::ZERO,
            fetch_url: String::new(),
        }
    }
}

impl RemoteJwkProviderOptions {
    /// Options for `fetch_url` with the default timeout and no background refresh
    #[must_use]
    pub fn new(fetch_url: impl Into<String>) -> Self {
        Self {
            fetch_url: fetch_url.into(),
            ..Self::default()
        }
    }

    /// Set the request timeout
    #[must_use]
    pub fn with_http_timeout(mut self, timeout: Duration) -> Self {
        self.http_timeout = timeout;
        self
    }

    /// Set the refresh interval
    #[must_use]
    pub fn with_fetch_interval(mut self, interval: Duration) -> Self {
        self.fetch_interval = interval;
        self
    }
}

fn serialize_secs<S: Serializer>(value: &Duration, serializer: S) -> Result<S::Ok, S::Error> {
    serializer.serialize_u64(value.as_secs())
}

fn deserialize_secs<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Duration, D::Error> {
    u64::deserialize(deserializer).map(Duration::from_secs)
}
