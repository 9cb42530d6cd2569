//! Native key material.
//!
//! [`KeyMaterial`] is the closed set of key forms the signing algorithms accept.
//! It is produced by the JWK codec, by the PEM helpers, or built directly by the
//! caller, and is immutable once constructed.

use std::fmt;

use ed25519_dalek::{SigningKey, VerifyingKey};
use rsa::traits::PublicKeyParts;
use rsa::{RsaPrivateKey, RsaPublicKey};
use zeroize::Zeroizing;

use crate::alg::ecdsa;
use crate::error::{JwkError, JwtResult};

/// NIST curves usable with ECDSA
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EcCurve {
    /// P-256 (secp256r1)
    P256,
    /// P-384 (secp384r1)
    P384,
    /// P-521 (secp521r1)
    P521,
}

impl EcCurve {
    /// JOSE curve name
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::P256 => "P-256",
            Self::P384 => "P-384",
            Self::P521 => "P-521",
        }
    }

    /// Field size in bits
    #[must_use]
    pub const fn bits(self) -> usize {
        match self {
            Self::P256 => 256,
            Self::P384 => 384,
            Self::P521 => 521,
        }
    }

    /// Width of a coordinate or scalar in bytes, `ceil(bits / 8)`
    #[must_use]
    pub const fn byte_len(self) -> usize {
        self.bits().div_ceil(8)
    }

    /// Resolve a JOSE curve name
    #[must_use]
    pub fn from_name(name: &str) -> Option<Self> {
        match name {
            "P-256" => Some(Self::P256),
            "P-384" => Some(Self::P384),
            "P-521" => Some(Self::P521),
            _ => None,
        }
    }
}

impl fmt::Display for EcCurve {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Left-pad a big-endian integer to `width` bytes, dropping redundant leading zeros.
pub(crate) fn fixed_width(
    parameter: &'static str,
    bytes: &[u8],
    width: usize,
) -> JwtResult<Vec<u8>> {
    let first = bytes.iter().position(|b| *b != 0).unwrap_or(bytes.len());
    let significant = &bytes[first..];
    if significant.len() > width {
        return Err(JwkError::InvalidKeySize {
            parameter,
            expected: width,
            actual: bytes.len(),
        }
        .into());
    }
    let mut out = vec![0u8; width - significant.len()];
    out.extend_from_slice(significant);
    Ok(out)
}

/// Public point of an EC key, coordinates stored at the curve's fixed width
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EcPublicKey {
    curve: EcCurve,
    x: Vec<u8>,
    y: Vec<u8>,
}

impl EcPublicKey {
    /// Build a public key from big-endian affine coordinates.
    ///
    /// Coordinates shorter than the curve width are zero-padded. The point is
    /// checked against the curve when it is first used to verify.
    ///
    /// # Errors
    ///
    /// Returns [`JwkError::InvalidKeySize`] when a coordinate is wider than the curve.
    pub fn new(curve: EcCurve, x: &[u8], y: &[u8]) -> JwtResult<Self> {
        Ok(Self {
            curve,
            x: fixed_width("x", x, curve.byte_len())?,
            y: fixed_width("y", y, curve.byte_len())?,
        })
    }

    /// Curve of the point
    #[must_use]
    pub fn curve(&self) -> EcCurve {
        self.curve
    }

    /// X coordinate, fixed width
    #[must_use]
    pub fn x(&self) -> &[u8] {
        &self.x
    }

    /// Y coordinate, fixed width
    #[must_use]
    pub fn y(&self) -> &[u8] {
        &self.y
    }

    /// SEC1 uncompressed encoding, `0x04 || x || y`
    pub(crate) fn to_sec1(&self) -> Vec<u8> {
        let mut out = Vec::with_capacity(1 + self.x.len() + self.y.len());
        out.push(0x04);
        out.extend_from_slice(&self.x);
        out.extend_from_slice(&self.y);
        out
    }
}

/// EC private key: public point plus the private scalar
#[derive(Clone, PartialEq, Eq)]
pub struct EcPrivateKey {
    public: EcPublicKey,
    d: Zeroizing<Vec<u8>>,
}

impl EcPrivateKey {
    /// Build a private key from its scalar and the matching public point.
    ///
    /// # Errors
    ///
    /// Fails when the scalar is out of range for the curve or does not
    /// correspond to `public`.
    pub fn new(public: EcPublicKey, d: &[u8]) -> JwtResult<Self> {
        let key = Self::from_scalar(public.curve, d)?;
        if key.public != public {
            return Err(JwkError::InvalidKey(format!(
                "{} private scalar does not match the public point",
                public.curve
            ))
            .into());
        }
        Ok(key)
    }

    /// Build a private key from its scalar alone, deriving the public point.
    ///
    /// # Errors
    ///
    /// Fails when the scalar is wider than the curve or not a valid scalar.
    pub fn from_scalar(curve: EcCurve, d: &[u8]) -> JwtResult<Self> {
        let d = Zeroizing::new(fixed_width("d", d, curve.byte_len())?);
        let (x, y) = ecdsa::public_coordinates(curve, &d)?;
        Ok(Self {
            public: EcPublicKey { curve, x, y },
            d,
        })
    }

    /// Public half
    #[must_use]
    pub fn public(&self) -> &EcPublicKey {
        &self.public
    }

    /// Curve of the key
    #[must_use]
    pub fn curve(&self) -> EcCurve {
        self.public.curve
    }

    /// Private scalar, fixed width
    #[must_use]
    pub fn d(&self) -> &[u8] {
        &self.d
    }
}

impl fmt::Debug for EcPrivateKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EcPrivateKey")
            .field("public", &self.public)
            .field("d", &"<redacted>")
            .finish()
    }
}

/// Whether an octet secret was loaded for signing or only for verification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum OctetUsage {
    /// Verification only
    Public,
    /// Signing and verification
    Private,
}

/// Symmetric secret used by the HMAC algorithms
#[derive(Clone, PartialEq, Eq)]
pub struct OctetKey {
    secret: Zeroizing<Vec<u8>>,
    usage: OctetUsage,
}

impl OctetKey {
    /// Wrap raw secret bytes
    #[must_use]
    pub fn new(secret: impl Into<Vec<u8>>, usage: OctetUsage) -> Self {
        Self {
            secret: Zeroizing::new(secret.into()),
            usage,
        }
    }

    /// Raw secret bytes
    #[must_use]
    pub fn secret(&self) -> &[u8] {
        &self.secret
    }

    /// Usage tag
    #[must_use]
    pub fn usage(&self) -> OctetUsage {
        self.usage
    }
}

impl fmt::Debug for OctetKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("OctetKey")
            .field("len", &self.secret.len())
            .field("usage", &self.usage)
            .finish()
    }
}

/// Every key form the signing algorithms understand
#[derive(Clone, PartialEq, Eq)]
pub enum KeyMaterial {
    /// RSA public key
    RsaPublic(RsaPublicKey),
    /// RSA private key, two or more primes
    RsaPrivate(Box<RsaPrivateKey>),
    /// EC public point
    EcPublic(EcPublicKey),
    /// EC private key
    EcPrivate(EcPrivateKey),
    /// Ed25519 public key, 32 bytes
    Ed25519Public(VerifyingKey),
    /// Ed25519 private key, seed and public half
    Ed25519Private(SigningKey),
    /// HMAC secret
    Octet(OctetKey),
    /// Marker that authorizes the `none` algorithm; carries no key
    UnsafeNone,
}

impl KeyMaterial {
    /// HMAC secret usable for signing and verification
    #[must_use]
    pub fn hmac_secret(secret: impl Into<Vec<u8>>) -> Self {
        Self::Octet(OctetKey::new(secret, OctetUsage::Private))
    }

    /// HMAC secret loaded for verification only
    #[must_use]
    pub fn hmac_verification_secret(secret: impl Into<Vec<u8>>) -> Self {
        Self::Octet(OctetKey::new(secret, OctetUsage::Public))
    }

    /// Ed25519 private key from a 32-byte seed
    #[must_use]
    pub fn ed25519_from_seed(seed: &[u8; 32]) -> Self {
        Self::Ed25519Private(SigningKey::from_bytes(seed))
    }

    /// Ed25519 private key from the 64-byte `seed || public` form.
    ///
    /// # Errors
    ///
    /// Fails when the length is wrong or the public half does not match the seed.
    pub fn ed25519_from_keypair_bytes(bytes: &[u8]) -> JwtResult<Self> {
        let bytes: &[u8; 64] = bytes.try_into().map_err(|_| JwkError::InvalidKeySize {
            parameter: "d",
            expected: 64,
            actual: bytes.len(),
        })?;
        SigningKey::from_keypair_bytes(bytes)
            .map(Self::Ed25519Private)
            .map_err(|e| JwkError::InvalidKey(format!("Ed25519: {e}")).into())
    }

    /// True for variants that can produce signatures
    #[must_use]
    pub fn is_private(&self) -> bool {
        match self {
            Self::RsaPrivate(_) | Self::EcPrivate(_) | Self::Ed25519Private(_) => true,
            Self::Octet(key) => key.usage == OctetUsage::Private,
            Self::RsaPublic(_) | Self::EcPublic(_) | Self::Ed25519Public(_) | Self::UnsafeNone => {
                false
            }
        }
    }

    /// Public counterpart of this key.
    ///
    /// Public keys map to themselves; octet secrets keep their bytes and are
    /// re-tagged for verification.
    #[must_use]
    pub fn to_public(&self) -> Self {
        match self {
            Self::RsaPrivate(key) => Self::RsaPublic(key.to_public_key()),
            Self::EcPrivate(key) => Self::EcPublic(key.public.clone()),
            Self::Ed25519Private(key) => Self::Ed25519Public(key.verifying_key()),
            Self::Octet(key) => Self::Octet(OctetKey::new(key.secret.to_vec(), OctetUsage::Public)),
            other => other.clone(),
        }
    }

    /// Short description used in logs and errors
    #[must_use]
    pub fn kind(&self) -> &'static str {
        match self {
            Self::RsaPublic(_) => "RSA public key",
            Self::RsaPrivate(_) => "RSA private key",
            Self::EcPublic(_) => "EC public key",
            Self::EcPrivate(_) => "EC private key",
            Self::Ed25519Public(_) => "Ed25519 public key",
            Self::Ed25519Private(_) => "Ed25519 private key",
            Self::Octet(_) => "octet secret",
            Self::UnsafeNone => "unsafe none marker",
        }
    }
}

impl fmt::Debug for KeyMaterial {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::RsaPublic(key) => f
                .debug_struct("RsaPublic")
                .field("bits", &(key.size() * 8))
                .finish(),
            Self::RsaPrivate(key) => f
                .debug_struct("RsaPrivate")
                .field("bits", &(key.size() * 8))
                .finish_non_exhaustive(),
            Self::EcPublic(key) => f.debug_tuple("EcPublic").field(key).finish(),
            Self::EcPrivate(key) => f.debug_tuple("EcPrivate").field(key).finish(),
            Self::Ed25519Public(key) => f
                .debug_tuple("Ed25519Public")
                .field(&key.as_bytes())
                .finish(),
            Self::Ed25519Private(key) => f
                .debug_tuple("Ed25519Private")
                .field(&key.verifying_key().as_bytes())
                .finish(),
            Self::Octet(key) => f.debug_tuple("Octet").field(key).finish(),
            Self::UnsafeNone => f.write_str("UnsafeNone"),
        }
    }
}

impl From<RsaPublicKey> for KeyMaterial {
    fn from(key: RsaPublicKey) -> Self {
        Self::RsaPublic(key)
    }
}

impl From<RsaPrivateKey> for KeyMaterial {
    fn from(key: RsaPrivateKey) -> Self {
        Self::RsaPrivate(Box::new(key))
    }
}

impl From<VerifyingKey> for KeyMaterial {
    fn from(key: VerifyingKey) -> Self {
        Self::Ed25519Public(key)
    }
}

impl From<SigningKey> for KeyMaterial {
    fn from(key: SigningKey) -> Self {
        Self::Ed25519Private(key)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn curve_widths_round_up() {
        assert_eq!(EcCurve::P256.byte_len(), 32);
        assert_eq!(EcCurve::P384.byte_len(), 48);
        assert_eq!(EcCurve::P521.byte_len(), 66);
        assert_eq!(EcCurve::from_name("P-521"), Some(EcCurve::P521));
        assert_eq!(EcCurve::from_name("p-256"), None);
    }

    #[test]
    fn fixed_width_pads_and_trims() {
        assert_eq!(fixed_width("x", &[1, 2], 4).unwrap(), vec![0, 0, 1, 2]);
        assert_eq!(fixed_width("x", &[0, 0, 0, 1, 2], 4).unwrap(), vec![0, 0, 1, 2]);
        assert!(fixed_width("x", &[1, 2, 3, 4, 5], 4).is_err());
    }

    #[test]
    fn octet_to_public_keeps_secret() {
        let key = KeyMaterial::hmac_secret(b"secret".to_vec());
        assert!(key.is_private());
        let public = key.to_public();
        assert!(!public.is_private());
        match public {
            KeyMaterial::Octet(octet) => assert_eq!(octet.secret(), b"secret"),
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn debug_redacts_secrets() {
        let key = KeyMaterial::hmac_secret(b"top-secret".to_vec());
        let rendered = format!("{key:?}");
        assert!(!rendered.contains("top-secret"));
        assert!(!rendered.contains("116"));
    }

    #[test]
    fn ed25519_keypair_length_checked() {
        let err = KeyMaterial::ed25519_from_keypair_bytes(&[0u8; 32]).unwrap_err();
        assert!(matches!(
            err,
            crate::JwtError::Jwk(JwkError::InvalidKeySize { expected: 64, .. })
        ));
    }
}
