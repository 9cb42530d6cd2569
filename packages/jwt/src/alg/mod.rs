//! Signing algorithm registry.
//!
//! Every JOSE algorithm name maps to exactly one process-wide
//! [`SigningAlgorithm`] static. Each static carries its family, hash selector
//! and, for ECDSA, the curve it is bound to. [`lookup`] is the only way to go
//! from a name to an algorithm.

pub(crate) mod ecdsa;
mod eddsa;
mod hash;
mod hmac;
mod none;
mod pss;
mod rsa;

pub use hash::HashAlg;

use crate::error::{AlgorithmError, JwtResult};
use crate::key::{EcCurve, KeyMaterial};

/// Algorithm family with its fixed parameters
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AlgorithmFamily {
    /// HMAC with a SHA-2 hash
    Hmac(HashAlg),
    /// RSASSA-PKCS1-v1_5
    RsaPkcs1(HashAlg),
    /// RSASSA-PSS with MGF1 over the same hash
    RsaPss(HashAlg),
    /// ECDSA over a NIST curve, fixed-width `r || s` signatures
    Ecdsa {
        /// Message hash
        hash: HashAlg,
        /// Curve the key must be on
        curve: EcCurve,
    },
    /// Pure Ed25519
    EdDsa,
    /// Unsecured JWS
    None,
}

/// A named JOSE signing algorithm
#[derive(Debug, PartialEq, Eq, Hash)]
pub struct SigningAlgorithm {
    name: &'static str,
    family: AlgorithmFamily,
}

/// HMAC using SHA-256
pub static HS256: SigningAlgorithm = SigningAlgorithm::new("HS256", AlgorithmFamily::Hmac(HashAlg::Sha256));
/// HMAC using SHA-384
pub static HS384: SigningAlgorithm = SigningAlgorithm::new("HS384", AlgorithmFamily::Hmac(HashAlg::Sha384));
/// HMAC using SHA-512
pub static HS512: SigningAlgorithm = SigningAlgorithm::new("HS512", AlgorithmFamily::Hmac(HashAlg::Sha512));
/// RSASSA-PKCS1-v1_5 using SHA-256
pub static RS256: SigningAlgorithm = SigningAlgorithm::new("RS256", AlgorithmFamily::RsaPkcs1(HashAlg::Sha256));
/// RSASSA-PKCS1-v1_5 using SHA-384
pub static RS384: SigningAlgorithm = SigningAlgorithm::new("RS384", AlgorithmFamily::RsaPkcs1(HashAlg::Sha384));
/// RSASSA-PKCS1-v1_5 using SHA-512
pub static RS512: SigningAlgorithm = SigningAlgorithm::new("RS512", AlgorithmFamily::RsaPkcs1(HashAlg::Sha512));
/// RSASSA-PSS using SHA-256 and MGF1 with SHA-256
pub static PS256: SigningAlgorithm = SigningAlgorithm::new("PS256", AlgorithmFamily::RsaPss(HashAlg::Sha256));
/// RSASSA-PSS using SHA-384 and MGF1 with SHA-384
pub static PS384: SigningAlgorithm = SigningAlgorithm::new("PS384", AlgorithmFamily::RsaPss(HashAlg::Sha384));
/// RSASSA-PSS using SHA-512 and MGF1 with SHA-512
pub static PS512: SigningAlgorithm = SigningAlgorithm::new("PS512", AlgorithmFamily::RsaPss(HashAlg::Sha512));
/// ECDSA using P-256 and SHA-256
pub static ES256: SigningAlgorithm = SigningAlgorithm::new(
    "ES256",
    AlgorithmFamily::Ecdsa { hash: HashAlg::Sha256, curve: EcCurve::P256 },
);
/// ECDSA using P-384 and SHA-384
pub static ES384: SigningAlgorithm = SigningAlgorithm::new(
    "ES384",
    AlgorithmFamily::Ecdsa { hash: HashAlg::Sha384, curve: EcCurve::P384 },
);
/// ECDSA using P-521 and SHA-512
pub static ES512: SigningAlgorithm = SigningAlgorithm::new(
    "ES512",
    AlgorithmFamily::Ecdsa { hash: HashAlg::Sha512, curve: EcCurve::P521 },
);
/// Ed25519 signatures
pub static EDDSA: SigningAlgorithm = SigningAlgorithm::new("EdDSA", AlgorithmFamily::EdDsa);
/// Unsecured tokens; only the [`KeyMaterial::UnsafeNone`] marker unlocks it
pub static NONE: SigningAlgorithm = SigningAlgorithm::new("none", AlgorithmFamily::None);

/// Every supported algorithm, in registry order
pub static ALL: [&SigningAlgorithm; 14] = [
    &HS256, &HS384, &HS512, &RS256, &RS384, &RS512, &PS256, &PS384, &PS512, &ES256, &ES384,
    &ES512, &EDDSA, &NONE,
];

/// Resolve a JOSE algorithm name.
///
/// Matching is exact: case and surrounding whitespace matter.
///
/// # Errors
///
/// Returns [`AlgorithmError::UnrecognizedAlgorithm`] for any other name.
pub fn lookup(name: &str) -> JwtResult<&'static SigningAlgorithm> {
    let alg = match name {
        "HS256" => &HS256,
        "HS384" => &HS384,
        "HS512" => &HS512,
        "RS256" => &RS256,
        "RS384" => &RS384,
        "RS512" => &RS512,
        "PS256" => &PS256,
        "PS384" => &PS384,
        "PS512" => &PS512,
        "ES256" => &ES256,
        "ES384" => &ES384,
        "ES512" => &ES512,
        "EdDSA" => &EDDSA,
        "none" => &NONE,
        _ => return Err(AlgorithmError::UnrecognizedAlgorithm(name.to_string()).into()),
    };
    tracing::trace!(algorithm = alg.name, "resolved signing algorithm");
    Ok(alg)
}

impl SigningAlgorithm {
    const fn new(name: &'static str, family: AlgorithmFamily) -> Self {
        Self { name, family }
    }

    /// JOSE name, as it appears in the `alg` header
    #[inline]
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Family and parameters
    #[inline]
    #[must_use]
    pub fn family(&self) -> AlgorithmFamily {
        self.family
    }

    /// Sign the UTF-8 bytes of `header_payload`.
    ///
    /// # Errors
    ///
    /// Returns an [`AlgorithmError`] when the key variant does not fit the
    /// algorithm or the primitive refuses to sign.
    pub fn sign(&self, header_payload: &str, key: &KeyMaterial) -> JwtResult<Vec<u8>> {
        tracing::trace!(algorithm = self.name, key = key.kind(), "signing");
        let message = header_payload.as_bytes();
        match self.family {
            AlgorithmFamily::Hmac(hash) => hmac::sign(self.name, hash, message, key),
            AlgorithmFamily::RsaPkcs1(hash) => rsa::sign(self.name, hash, message, key),
            AlgorithmFamily::RsaPss(hash) => pss::sign(self.name, hash, message, key),
            AlgorithmFamily::Ecdsa { curve, .. } => ecdsa::sign(self.name, curve, message, key),
            AlgorithmFamily::EdDsa => eddsa::sign(self.name, message, key),
            AlgorithmFamily::None => none::sign(self.name, key),
        }
    }

    /// Verify `signature` over the UTF-8 bytes of `header_payload`.
    ///
    /// # Errors
    ///
    /// Returns [`AlgorithmError::VerificationFailed`] when the signature does
    /// not match, or another [`AlgorithmError`] when the inputs are unusable.
    pub fn verify(&self, header_payload: &str, signature: &[u8], key: &KeyMaterial) -> JwtResult<()> {
        tracing::trace!(algorithm = self.name, key = key.kind(), "verifying");
        let message = header_payload.as_bytes();
        match self.family {
            AlgorithmFamily::Hmac(hash) => hmac::verify(self.name, hash, message, signature, key),
            AlgorithmFamily::RsaPkcs1(hash) => rsa::verify(self.name, hash, message, signature, key),
            AlgorithmFamily::RsaPss(hash) => pss::verify(self.name, hash, message, signature, key),
            AlgorithmFamily::Ecdsa { curve, .. } => {
                ecdsa::verify(self.name, curve, message, signature, key)
            }
            AlgorithmFamily::EdDsa => eddsa::verify(self.name, message, signature, key),
            AlgorithmFamily::None => none::verify(self.name, signature, key),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn lookup_is_exact() {
        for alg in ALL {
            assert!(std::ptr::eq(lookup(alg.name()).unwrap(), alg));
        }
        for bad in ["", "hs256", " RS256", "RS256 ", "ES256K", "Ed25519", "NONE", "RS1"] {
            assert!(lookup(bad).is_err(), "{bad:?} must be rejected");
        }
    }
}
