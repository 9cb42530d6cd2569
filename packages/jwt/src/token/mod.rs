//! Compact JWS token engine.
//!
//! A [`Token`] moves through three states. It starts empty, becomes
//! *extracted* once its header and payload are set (from a compact string or
//! directly), and becomes *signed* once a signature has been computed and the
//! compact string is final. Signing a signed token does nothing.

mod cognito;
mod header;
mod options;
mod payload;
mod segment;

use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use serde::de::DeserializeOwned;

pub use cognito::{
    CognitoAccessPayload, CognitoAccessToken, CognitoClaims, CognitoHeader, CognitoIdPayload,
    CognitoIdToken, CognitoIdentity,
};
pub use header::{Header, JoseHeader};
pub use options::TokenOptions;
pub use payload::{Audience, ClaimSet, Payload};
pub use segment::Segment;

use crate::alg::{self, SigningAlgorithm};
use crate::encoding::{decode_segment, encode_segment};
use crate::error::{JwtError, JwtResult};
use crate::key::KeyMaterial;

/// Token with the free-form [`Header`] and [`Payload`]
pub type Jwt = Token<Header, Payload>;

type Clock = Arc<dyn Fn() -> DateTime<Utc> + Send + Sync>;

/// Compact-serialized signed token over a header shape `H` and claims shape `P`
#[derive(Clone)]
pub struct Token<H = Header, P = Payload> {
    header: H,
    payload: P,
    signature: Vec<u8>,
    compact: Option<String>,
    options: TokenOptions,
    clock: Clock,
    extracted: bool,
    signed: bool,
}

impl<H: Default, P: Default> Default for Token<H, P> {
    fn default() -> Self {
        Self {
            header: H::default(),
            payload: P::default(),
            signature: Vec::new(),
            compact: None,
            options: TokenOptions::default(),
            clock: Arc::new(Utc::now),
            extracted: false,
            signed: false,
        }
    }
}

impl<H: fmt::Debug, P: fmt::Debug> fmt::Debug for Token<H, P> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Token")
            .field("header", &self.header)
            .field("payload", &self.payload)
            .field("signature_len", &self.signature.len())
            .field("compact", &self.compact)
            .field("options", &self.options)
            .field("extracted", &self.extracted)
            .field("signed", &self.signed)
            .finish_non_exhaustive()
    }
}

/// `instant + by`, saturating at the end of representable time
fn shifted(instant: DateTime<Utc>, by: Duration) -> DateTime<Utc> {
    chrono::Duration::from_std(by)
        .ok()
        .and_then(|delta| instant.checked_add_signed(delta))
        .unwrap_or(DateTime::<Utc>::MAX_UTC)
}

impl<H, P> Token<H, P>
where
    H: JoseHeader + Default,
    P: ClaimSet + Default,
{
    /// Empty token with default options
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the options
    #[must_use]
    pub fn with_options(mut self, options: TokenOptions) -> Self {
        self.options = options;
        self
    }

    /// Replace the time source used by the temporal checks
    #[must_use]
    pub fn with_clock<F>(mut self, clock: F) -> Self
    where
        F: Fn() -> DateTime<Utc> + Send + Sync + 'static,
    {
        self.clock = Arc::new(clock);
        self
    }

    /// Unsigned token holding `header` and `payload`, ready to [`sign`](Self::sign)
    #[must_use]
    pub fn from_segments(header: H, payload: P) -> Self {
        Self::new().with_segments(header, payload)
    }

    /// Set header and payload; the token becomes extracted and unsigned
    #[must_use]
    pub fn with_segments(mut self, header: H, payload: P) -> Self {
        self.header = header;
        self.payload = payload;
        self.signature.clear();
        self.compact = None;
        self.extracted = true;
        self.signed = false;
        self
    }

    /// Parse and validate a compact string under `options`.
    ///
    /// # Errors
    ///
    /// See [`Token::extract`].
    pub fn from_compact_string(compact: &str, options: TokenOptions) -> JwtResult<Self> {
        Self::new().with_options(options).extract(compact)
    }

    /// Parse a compact string with this token's options and clock.
    ///
    /// The header `alg` must be non-empty and pass the allow-list, and unless
    /// temporal claims are ignored `exp`, `nbf` and `iat` are checked against
    /// the clock with the configured tolerance. The signature is not checked;
    /// call [`verify`](Self::verify) for that.
    ///
    /// # Errors
    ///
    /// [`JwtError::TokenFormat`] for a wrong segment count or undecodable
    /// segments, [`JwtError::TokenValidation`] for a rejected algorithm or
    /// temporal claim.
    pub fn extract(mut self, compact: &str) -> JwtResult<Self> {
        let segments: Vec<&str> = compact.split('.').collect();
        let [header, payload, signature] = segments[..] else {
            tracing::debug!(segments = segments.len(), "rejecting token with wrong segment count");
            return Err(JwtError::token_format(format!(
                "expected 3 segments, found {}",
                segments.len()
            )));
        };
        self.header = self.decode_json("header", header)?;
        self.payload = self.decode_json("payload", payload)?;
        self.signature = self.decode("signature", signature)?;
        self.compact = Some(compact.to_string());
        self.extracted = true;
        self.signed = false;

        self.validate_required_fields()?;
        self.validate_temporal_claims()?;
        tracing::debug!(alg = self.header.alg(), "extracted token");
        Ok(self)
    }

    fn decode(&self, part: &str, segment: &str) -> JwtResult<Vec<u8>> {
        decode_segment(
            segment,
            self.options.allow_token_padding,
            self.options.use_strict_decoding,
        )
        .map_err(|e| {
            tracing::debug!(part, error = %e, "token segment is not valid base64");
            JwtError::token_format(format!("{part} is not valid base64: {e}"))
        })
    }

    fn decode_json<T: DeserializeOwned>(&self, part: &str, segment: &str) -> JwtResult<T> {
        let bytes = self.decode(part, segment)?;
        serde_json::from_slice(&bytes).map_err(|e| {
            tracing::debug!(part, error = %e, "token segment is not valid JSON");
            JwtError::token_format(format!("{part} is not valid JSON: {e}"))
        })
    }

    fn encode_json<T: Serialize>(&self, value: &T) -> JwtResult<String> {
        let json = serde_json::to_vec(value)?;
        Ok(self.encode(&json))
    }

    fn encode(&self, bytes: &[u8]) -> String {
        encode_segment(
            bytes,
            self.options.allow_token_padding,
            self.options.use_strict_decoding,
        )
    }

    fn validate_required_fields(&self) -> JwtResult<()> {
        let alg = self.header.alg();
        if alg.is_empty() {
            tracing::debug!("token header has no algorithm");
            return Err(JwtError::token_validation("header has no signing algorithm"));
        }
        if !self.options.allows_algorithm(alg) {
            tracing::debug!(alg, "token algorithm not in the allow-list");
            return Err(JwtError::token_validation(format!(
                "signing algorithm {alg} is not allowed"
            )));
        }
        Ok(())
    }

    fn validate_temporal_claims(&self) -> JwtResult<()> {
        if self.options.ignore_temporal_claims {
            return Ok(());
        }
        let now = (self.clock)();
        let tolerance = self.options.tolerance;
        let late = shifted(now, tolerance);

        let failed = if now > shifted(self.payload.exp(), tolerance) {
            Some("exp")
        } else if self.payload.nbf() > late {
            Some("nbf")
        } else if self.payload.iat() > late {
            Some("iat")
        } else {
            None
        };
        match failed {
            Some(claim) => {
                tracing::debug!(claim, %now, "token failed temporal validation");
                Err(JwtError::token_validation(format!("invalid claim, {claim}")))
            }
            None => Ok(()),
        }
    }

    /// Sign with `key` using the header's algorithm.
    ///
    /// Header and payload are serialized, encoded with the configured base64
    /// mode and signed; the compact string is then final. Does nothing if the
    /// token is already signed.
    ///
    /// # Errors
    ///
    /// Fails when serialization fails, the header names an unknown algorithm,
    /// or the algorithm rejects the key.
    pub fn sign(&mut self, key: &KeyMaterial) -> JwtResult<()> {
        if self.signed {
            return Ok(());
        }
        let header_payload = format!(
            "{}.{}",
            self.encode_json(&self.header)?,
            self.encode_json(&self.payload)?
        );
        let algorithm = alg::lookup(self.header.alg())?;
        let signature = algorithm.sign(&header_payload, key)?;
        let compact = format!("{header_payload}.{}", self.encode(&signature));

        self.signature = signature;
        self.compact = Some(compact);
        self.extracted = true;
        self.signed = true;
        tracing::trace!(alg = algorithm.name(), "signed token");
        Ok(())
    }

    /// Verify the signature against each key in turn using the header's algorithm.
    ///
    /// # Errors
    ///
    /// See [`Token::verify_with_algorithm`]; additionally fails when the header
    /// names an unknown algorithm.
    pub fn verify<'k, I>(&self, keys: I) -> JwtResult<()>
    where
        I: IntoIterator<Item = &'k KeyMaterial>,
    {
        let algorithm = alg::lookup(self.header.alg())?;
        self.verify_with_algorithm(algorithm, keys)
    }

    /// Verify the signature against each key in turn using `algorithm`.
    ///
    /// The signed input is the first two segments of the compact string as
    /// received. The first key that verifies wins.
    ///
    /// # Errors
    ///
    /// [`JwtError::TokenFormat`] when the token has no compact string yet, and
    /// [`JwtError::Signature`] when no key verifies.
    pub fn verify_with_algorithm<'k, I>(&self, algorithm: &SigningAlgorithm, keys: I) -> JwtResult<()>
    where
        I: IntoIterator<Item = &'k KeyMaterial>,
    {
        let compact = match &self.compact {
            Some(compact) if self.extracted => compact,
            _ => return Err(JwtError::token_format("token has not been extracted or signed")),
        };
        let Some((header_payload, _)) = compact.rsplit_once('.') else {
            return Err(JwtError::token_format("compact string has no signature segment"));
        };
        if header_payload.matches('.').count() != 1 {
            return Err(JwtError::token_format("expected 3 segments"));
        }
        for key in keys {
            match algorithm.verify(header_payload, &self.signature, key) {
                Ok(()) => return Ok(()),
                Err(error) => {
                    tracing::trace!(alg = algorithm.name(), key = key.kind(), %error, "key did not verify");
                }
            }
        }
        Err(JwtError::Signature)
    }
}

impl<H, P> Token<H, P> {
    /// Header segment
    pub fn header(&self) -> &H {
        &self.header
    }

    /// Payload segment
    pub fn payload(&self) -> &P {
        &self.payload
    }

    /// Raw signature bytes, empty until extracted or signed
    pub fn signature(&self) -> &[u8] {
        &self.signature
    }

    /// Compact string, once known
    pub fn compact(&self) -> Option<&str> {
        self.compact.as_deref()
    }

    /// Active options
    pub fn options(&self) -> &TokenOptions {
        &self.options
    }

    /// True once a signature has been computed
    pub fn is_signed(&self) -> bool {
        self.signed
    }

    /// True once header and payload are populated
    pub fn is_extracted(&self) -> bool {
        self.extracted
    }
}
