//! Provider error types

use thiserror::Error;

/// Result alias for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Errors raised while building or refreshing a key set
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Client construction or the request itself failed
    #[error("HTTP request to {url} failed: {reason}")]
    Http {
        /// Key-set URL
        url: String,
        /// Transport error
        reason: String,
    },

    /// The endpoint answered with a non-success status
    #[error("key-set endpoint {url} returned status {status}")]
    HttpStatus {
        /// Key-set URL
        url: String,
        /// Status code, always >= 300
        status: u16,
    },

    /// The response body could not be decoded into JWKs
    #[error("failed to decode key set: {0}")]
    Decode(String),

    /// Error from the JWT core
    #[error(transparent)]
    Jwt(#[from] jwtv::JwtError),
}

impl ProviderError {
    /// Create a decode error
    pub fn decode(msg: impl Into<String>) -> Self {
        Self::Decode(msg.into())
    }

    pub(crate) fn http(url: &str, error: impl std::fmt::Display) -> Self {
        Self::Http {
            url: url.to_string(),
            reason: error.to_string(),
        }
    }
}

impl From<serde_json::Error> for ProviderError {
    fn from(err: serde_json::Error) -> Self {
        Self::Decode(err.to_string())
    }
}
