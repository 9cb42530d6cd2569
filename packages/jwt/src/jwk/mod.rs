//! JSON Web Key records (RFC 7517, RFC 7518 §6, RFC 8037).
//!
//! [`Jwk`] is a plain serde record: every member is optional and absent
//! members are omitted on output. Conversion to and from [`KeyMaterial`]
//! lives in `decode` and `encode`; which members are required depends on `kty`.
//!
//! [`KeyMaterial`]: crate::KeyMaterial

mod crt;
mod decode;
mod encode;
mod iana;

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

pub use iana::{
    is_registered_alg, is_registered_curve, is_registered_key_ops, is_registered_kty,
    is_registered_use,
};

use crate::encoding::encode_b64;
use crate::error::{JwkError, JwtResult};
use crate::numeric_date::NumericDate;

/// A JSON Web Key
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Jwk {
    /// Key type: `RSA`, `EC`, `OKP` or `oct`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kty: Option<String>,
    /// Public key use: `sig` or `enc`
    #[serde(rename = "use", skip_serializing_if = "Option::is_none")]
    pub key_use: Option<String>,
    /// Permitted operations
    #[serde(skip_serializing_if = "Option::is_none")]
    pub key_ops: Option<Vec<String>>,
    /// Intended algorithm
    #[serde(skip_serializing_if = "Option::is_none")]
    pub alg: Option<String>,
    /// Key id
    #[serde(skip_serializing_if = "Option::is_none")]
    pub kid: Option<String>,
    /// X.509 URL
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x5u: Option<String>,
    /// X.509 chain, standard base64 DER, leaf first
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x5c: Option<Vec<String>>,
    /// SHA-1 thumbprint of the leaf certificate
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x5t: Option<String>,
    /// SHA-256 thumbprint of the leaf certificate
    #[serde(rename = "x5t#S256", skip_serializing_if = "Option::is_none")]
    pub x5t_s256: Option<String>,
    /// Curve name (EC and OKP)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub crv: Option<String>,
    /// X coordinate (EC) or public key (OKP)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub x: Option<String>,
    /// Y coordinate (EC)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub y: Option<String>,
    /// Private scalar (EC), private exponent (RSA) or seed (OKP)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub d: Option<String>,
    /// RSA modulus
    #[serde(skip_serializing_if = "Option::is_none")]
    pub n: Option<String>,
    /// RSA public exponent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub e: Option<String>,
    /// First RSA prime
    #[serde(skip_serializing_if = "Option::is_none")]
    pub p: Option<String>,
    /// Second RSA prime
    #[serde(skip_serializing_if = "Option::is_none")]
    pub q: Option<String>,
    /// First factor CRT exponent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dp: Option<String>,
    /// Second factor CRT exponent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dq: Option<String>,
    /// First CRT coefficient
    #[serde(skip_serializing_if = "Option::is_none")]
    pub qi: Option<String>,
    /// Primes beyond the second
    #[serde(skip_serializing_if = "Option::is_none")]
    pub oth: Option<Vec<OtherPrime>>,
    /// Symmetric key value
    #[serde(skip_serializing_if = "Option::is_none")]
    pub k: Option<String>,
    /// WebCrypto extractable flag
    #[serde(skip_serializing_if = "Option::is_none")]
    pub ext: Option<bool>,
    /// Issued at (historical key sets)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iat: Option<NumericDate>,
    /// Not before (historical key sets)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub nbf: Option<NumericDate>,
    /// Expiry (historical key sets)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub exp: Option<NumericDate>,
    /// Revocation record (historical key sets)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revoked: Option<Revocation>,
}

/// Extra prime of a multi-prime RSA key
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OtherPrime {
    /// Prime factor
    #[serde(skip_serializing_if = "Option::is_none")]
    pub r: Option<String>,
    /// Factor CRT exponent
    #[serde(skip_serializing_if = "Option::is_none")]
    pub d: Option<String>,
    /// Factor CRT coefficient
    #[serde(skip_serializing_if = "Option::is_none")]
    pub t: Option<String>,
}

/// Why and when a key was withdrawn
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Revocation {
    /// Revocation time
    #[serde(skip_serializing_if = "Option::is_none")]
    pub revoked_at: Option<NumericDate>,
    /// Free-form reason
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reason: Option<String>,
}

/// `{"keys": [...]}` document served by key-set endpoints
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct JwkSet {
    /// Keys in document order
    #[serde(default)]
    pub keys: Vec<Jwk>,
}

impl JwkSet {
    /// Parse a JWKS document.
    ///
    /// # Errors
    ///
    /// Returns a serialization error when the JSON does not have the JWKS shape.
    pub fn from_json(json: &str) -> JwtResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// First key whose `kid` matches
    #[must_use]
    pub fn find(&self, kid: &str) -> Option<&Jwk> {
        self.keys.iter().find(|key| key.kid.as_deref() == Some(kid))
    }
}

/// Non-empty member value; empty strings read as absent
pub(crate) fn member(value: &Option<String>) -> Option<&str> {
    value.as_deref().filter(|v| !v.is_empty())
}

impl Jwk {
    /// Parse a single JWK object.
    ///
    /// # Errors
    ///
    /// Returns a serialization error for malformed JSON.
    pub fn from_json(json: &str) -> JwtResult<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Serialize to compact JSON.
    ///
    /// # Errors
    ///
    /// Returns a serialization error if encoding fails.
    pub fn to_json(&self) -> JwtResult<String> {
        Ok(serde_json::to_string(self)?)
    }

    /// RFC 7638 SHA-256 thumbprint, base64url encoded.
    ///
    /// Hashes the required members of the key type in lexicographic order
    /// with no whitespace.
    ///
    /// # Errors
    ///
    /// Fails when `kty` is unsupported or a required member is missing.
    pub fn thumbprint_sha256(&self) -> JwtResult<String> {
        let kty = member(&self.kty).unwrap_or_default();
        let required: &[(&str, &Option<String>)] = match kty {
            "RSA" => &[("e", &self.e), ("n", &self.n)],
            "EC" => &[("crv", &self.crv), ("x", &self.x), ("y", &self.y)],
            "OKP" => &[("crv", &self.crv), ("x", &self.x)],
            "oct" => &[("k", &self.k)],
            other => return Err(JwkError::UnsupportedKeyType(other.to_string()).into()),
        };
        let mut members = BTreeMap::new();
        members.insert("kty", kty);
        for (name, value) in required {
            let value = member(value).ok_or_else(|| JwkError::MissingParameter {
                kty: kty.to_string(),
                parameters: "all thumbprint members",
            })?;
            members.insert(*name, value);
        }
        let canonical = serde_json::to_vec(&members)?;
        Ok(encode_b64(&Sha256::digest(&canonical)))
    }
}

impl fmt::Debug for Jwk {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let secret = |value: &Option<String>| value.as_ref().map(|_| "<redacted>");
        f.debug_struct("Jwk")
            .field("kty", &self.kty)
            .field("use", &self.key_use)
            .field("key_ops", &self.key_ops)
            .field("alg", &self.alg)
            .field("kid", &self.kid)
            .field("x5u", &self.x5u)
            .field("x5c", &self.x5c.as_ref().map(Vec::len))
            .field("x5t", &self.x5t)
            .field("x5t#S256", &self.x5t_s256)
            .field("crv", &self.crv)
            .field("x", &self.x)
            .field("y", &self.y)
            .field("n", &self.n)
            .field("e", &self.e)
            .field("d", &secret(&self.d))
            .field("p", &secret(&self.p))
            .field("q", &secret(&self.q))
            .field("dp", &secret(&self.dp))
            .field("dq", &secret(&self.dq))
            .field("qi", &secret(&self.qi))
            .field("oth", &self.oth.as_ref().map(Vec::len))
            .field("k", &secret(&self.k))
            .field("ext", &self.ext)
            .field("iat", &self.iat)
            .field("nbf", &self.nbf)
            .field("exp", &self.exp)
            .field("revoked", &self.revoked)
            .finish()
    }
}
