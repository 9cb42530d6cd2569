//! Error types for signing algorithms, the JWK codec and the token engine

use thiserror::Error;

/// Result alias used throughout the crate
pub type JwtResult<T> = Result<T, JwtError>;

/// Failures raised by a signing algorithm
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AlgorithmError {
    /// The name is not part of the supported JOSE vocabulary
    #[error("unrecognized algorithm: {0:?}")]
    UnrecognizedAlgorithm(String),

    /// The key variant cannot be used with this algorithm
    #[error("{algorithm}: wrong key type, expected {expected}")]
    WrongKeyType {
        /// Algorithm name
        algorithm: &'static str,
        /// Key kind the algorithm accepts
        expected: &'static str,
    },

    /// The key carries no usable material
    #[error("{0}: key is empty")]
    NilKey(&'static str),

    /// Signature length does not match the algorithm's fixed width
    #[error("{algorithm}: wrong signature length, expected {expected} bytes, got {actual}")]
    WrongSignatureLength {
        /// Algorithm name
        algorithm: &'static str,
        /// Required signature length in bytes
        expected: usize,
        /// Supplied signature length in bytes
        actual: usize,
    },

    /// Key curve does not match the algorithm's curve
    #[error("{algorithm}: key on {actual} does not match required curve {expected}")]
    WrongCurveSize {
        /// Algorithm name
        algorithm: &'static str,
        /// Curve required by the algorithm
        expected: &'static str,
        /// Curve of the supplied key
        actual: &'static str,
    },

    /// The signature did not verify under the supplied key
    #[error("{0}: verification failed")]
    VerificationFailed(&'static str),

    /// The underlying primitive refused to sign
    #[error("{algorithm}: signing failed: {reason}")]
    SigningFailed {
        /// Algorithm name
        algorithm: &'static str,
        /// Primitive error message
        reason: String,
    },
}

/// Failures raised while converting between JWK records and key material
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JwkError {
    /// A parameter required by the key type is absent
    #[error("{kty} requires parameters {parameters}")]
    MissingParameter {
        /// Key type being decoded
        kty: String,
        /// Human readable parameter list
        parameters: &'static str,
    },

    /// A parameter is not valid base64
    #[error("failed to decode parameter {parameter:?}: {reason}")]
    Base64 {
        /// Parameter name
        parameter: &'static str,
        /// Decoder message
        reason: String,
    },

    /// Curve is not one this crate can use
    #[error("unsupported curve {0:?}")]
    UnsupportedCurve(String),

    /// Key type is not one this crate can use
    #[error("unsupported key type {0:?}")]
    UnsupportedKeyType(String),

    /// A decoded value has the wrong byte length
    #[error("parameter {parameter:?} must be {expected} bytes, got {actual}")]
    InvalidKeySize {
        /// Parameter name
        parameter: &'static str,
        /// Required length
        expected: usize,
        /// Decoded length
        actual: usize,
    },

    /// RSA CRT parameters disagree with the private exponent and primes
    #[error("RSA CRT parameter {0:?} is inconsistent with the key")]
    CrtInconsistent(String),

    /// An x5c entry is not a valid certificate
    #[error("X.509 certificate error: {0}")]
    X509(String),

    /// The assembled key failed validation
    #[error("invalid key: {0}")]
    InvalidKey(String),
}

/// Top-level error for every public operation of the crate
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum JwtError {
    /// Signing algorithm failure
    #[error(transparent)]
    Algorithm(#[from] AlgorithmError),

    /// JWK codec failure
    #[error(transparent)]
    Jwk(#[from] JwkError),

    /// Compact string is malformed (segment count, base64 or JSON)
    #[error("malformed token: {0}")]
    TokenFormat(String),

    /// Token parsed but failed the algorithm or temporal checks
    #[error("token validation failed: {0}")]
    TokenValidation(String),

    /// No supplied key verified the token signature
    #[error("invalid signature: no supplied key verified the token")]
    Signature,

    /// JSON encoding of a header, payload or key failed
    #[error("serialization error: {0}")]
    Serialization(String),

    /// PEM text could not be turned into a key
    #[error("PEM error: {0}")]
    Pem(String),
}

impl JwtError {
    /// Create a token format error
    #[inline]
    #[must_use]
    pub fn token_format(msg: impl Into<String>) -> Self {
        Self::TokenFormat(msg.into())
    }

    /// Create a token validation error
    #[inline]
    #[must_use]
    pub fn token_validation(msg: impl Into<String>) -> Self {
        Self::TokenValidation(msg.into())
    }

    /// Create a serialization error
    #[inline]
    #[must_use]
    pub fn serialization(msg: impl Into<String>) -> Self {
        Self::Serialization(msg.into())
    }

    /// Create a PEM error
    #[inline]
    #[must_use]
    pub fn pem(msg: impl Into<String>) -> Self {
        Self::Pem(msg.into())
    }

    /// True when the input was well formed but the signature did not check out.
    ///
    /// Callers treat this as an expected, recoverable outcome.
    #[must_use]
    pub fn is_signature_failure(&self) -> bool {
        matches!(
            self,
            Self::Signature | Self::Algorithm(AlgorithmError::VerificationFailed(_))
        )
    }

    /// True when the input itself was malformed (token text, key record or PEM).
    #[must_use]
    pub fn is_malformed_input(&self) -> bool {
        matches!(
            self,
            Self::TokenFormat(_) | Self::Jwk(_) | Self::Pem(_) | Self::Serialization(_)
        )
    }
}

impl From<serde_json::Error> for JwtError {
    fn from(err: serde_json::Error) -> Self {
        Self::Serialization(err.to_string())
    }
}
