//! JWK → [`KeyMaterial`]

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use ed25519_dalek::VerifyingKey;
use rsa::{BigUint, RsaPublicKey};

use super::crt::{self, CrtParams, OtherPrimeCrt};
use super::{Jwk, member};
use crate::encoding::decode_b64;
use crate::error::{JwkError, JwtResult};
use crate::key::{EcCurve, EcPrivateKey, EcPublicKey, KeyMaterial};

/// Largest RSA modulus accepted for public keys
const RSA_MAX_PUBLIC_BITS: usize = 16384;

fn bytes(parameter: &'static str, value: &str) -> JwtResult<Vec<u8>> {
    decode_b64(value).map_err(|e| {
        JwkError::Base64 {
            parameter,
            reason: e.to_string(),
        }
        .into()
    })
}

fn uint(parameter: &'static str, value: &str) -> JwtResult<BigUint> {
    Ok(BigUint::from_bytes_be(&bytes(parameter, value)?))
}

fn rsa_public(n: BigUint, e: BigUint) -> JwtResult<KeyMaterial> {
    RsaPublicKey::new_with_max_size(n, e, RSA_MAX_PUBLIC_BITS)
        .map(KeyMaterial::RsaPublic)
        .map_err(|e| JwkError::InvalidKey(format!("RSA: {e}")).into())
}

fn missing(kty: &str, parameters: &'static str) -> JwkError {
    JwkError::MissingParameter {
        kty: kty.to_string(),
        parameters,
    }
}

impl Jwk {
    /// Decode the `x5c` chain into DER certificates, leaf first.
    ///
    /// # Errors
    ///
    /// Returns [`JwkError::X509`] when an entry is not standard base64 or not
    /// an X.509 certificate.
    pub fn certificates(&self) -> JwtResult<Vec<Vec<u8>>> {
        let Some(chain) = &self.x5c else {
            return Ok(Vec::new());
        };
        chain
            .iter()
            .enumerate()
            .map(|(index, entry)| {
                let der = STANDARD
                    .decode(entry)
                    .map_err(|e| JwkError::X509(format!("x5c[{index}]: {e}")))?;
                x509_parser::parse_x509_certificate(&der)
                    .map_err(|e| JwkError::X509(format!("x5c[{index}]: {e}")))?;
                Ok(der)
            })
            .collect()
    }

    /// Convert to native key material.
    ///
    /// With `want_private` the private form is built when the record carries
    /// the private members; otherwise the public form is returned.
    ///
    /// # Errors
    ///
    /// Fails on an unsupported `kty` or curve, a missing or malformed member,
    /// an invalid certificate, or RSA CRT values that disagree with the key.
    pub fn to_key_material(&self, want_private: bool) -> JwtResult<KeyMaterial> {
        self.certificates()?;
        let kty = member(&self.kty).unwrap_or_default();
        let key = match kty {
            "RSA" => self.rsa_key(want_private)?,
            "EC" => self.ec_key(want_private)?,
            "OKP" => self.okp_key(want_private)?,
            "oct" => self.oct_key(want_private)?,
            other => return Err(JwkError::UnsupportedKeyType(other.to_string()).into()),
        };
        tracing::trace!(kty, kid = ?self.kid, kind = key.kind(), "decoded JWK");
        Ok(key)
    }

    /// Public key material; private members are ignored.
    ///
    /// # Errors
    ///
    /// See [`Jwk::to_key_material`].
    pub fn to_public_key(&self) -> JwtResult<KeyMaterial> {
        self.to_key_material(false)
    }

    /// Private key material when present, public otherwise.
    ///
    /// # Errors
    ///
    /// See [`Jwk::to_key_material`].
    pub fn to_private_key(&self) -> JwtResult<KeyMaterial> {
        self.to_key_material(true)
    }

    fn rsa_key(&self, want_private: bool) -> JwtResult<KeyMaterial> {
        let (Some(n), Some(e)) = (member(&self.n), member(&self.e)) else {
            return Err(missing("RSA", "n, e").into());
        };
        let n = uint("n", n)?;
        let e = uint("e", e)?;

        let private = (
            member(&self.d),
            member(&self.p),
            member(&self.q),
            member(&self.dp),
            member(&self.dq),
            member(&self.qi),
        );
        let (Some(d), Some(p), Some(q), Some(dp), Some(dq), Some(qi)) = private else {
            return rsa_public(n, e);
        };
        if !want_private {
            return rsa_public(n, e);
        }

        let mut primes = vec![uint("p", p)?, uint("q", q)?];
        let mut others = Vec::new();
        for other in self.oth.iter().flatten() {
            let (Some(r), Some(od), Some(t)) =
                (member(&other.r), member(&other.d), member(&other.t))
            else {
                return Err(missing("RSA", "oth entries with r, d, t").into());
            };
            let r = uint("oth.r", r)?;
            primes.push(r.clone());
            others.push(OtherPrimeCrt {
                r,
                d: uint("oth.d", od)?,
                t: uint("oth.t", t)?,
            });
        }
        let supplied = CrtParams {
            dp: uint("dp", dp)?,
            dq: uint("dq", dq)?,
            qi: uint("qi", qi)?,
            others,
        };
        let key = crt::assemble(n, e, uint("d", d)?, primes, &supplied)?;
        Ok(KeyMaterial::from(key))
    }

    fn ec_key(&self, want_private: bool) -> JwtResult<KeyMaterial> {
        let (Some(crv), Some(x), Some(y)) = (member(&self.crv), member(&self.x), member(&self.y))
        else {
            return Err(missing("EC", "crv, x, y").into());
        };
        let curve =
            EcCurve::from_name(crv).ok_or_else(|| JwkError::UnsupportedCurve(crv.to_string()))?;
        let public = EcPublicKey::new(curve, &bytes("x", x)?, &bytes("y", y)?)?;
        match member(&self.d) {
            Some(d) if want_private => Ok(KeyMaterial::EcPrivate(EcPrivateKey::new(
                public,
                &bytes("d", d)?,
            )?)),
            _ => Ok(KeyMaterial::EcPublic(public)),
        }
    }

    fn okp_key(&self, want_private: bool) -> JwtResult<KeyMaterial> {
        let (Some(crv), Some(x)) = (member(&self.crv), member(&self.x)) else {
            return Err(missing("OKP", "crv, x").into());
        };
        if crv != "Ed25519" {
            return Err(JwkError::UnsupportedCurve(crv.to_string()).into());
        }
        let x = bytes("x", x)?;
        let public: [u8; 32] = x.as_slice().try_into().map_err(|_| JwkError::InvalidKeySize {
            parameter: "x",
            expected: 32,
            actual: x.len(),
        })?;
        match member(&self.d) {
            Some(d) if want_private => {
                let mut keypair = zeroize::Zeroizing::new(bytes("d", d)?);
                keypair.extend_from_slice(&public);
                KeyMaterial::ed25519_from_keypair_bytes(&keypair)
            }
            _ => VerifyingKey::from_bytes(&public)
                .map(KeyMaterial::Ed25519Public)
                .map_err(|e| JwkError::InvalidKey(format!("Ed25519: {e}")).into()),
        }
    }

    fn oct_key(&self, want_private: bool) -> JwtResult<KeyMaterial> {
        let k = member(&self.k).ok_or_else(|| missing("oct", "k"))?;
        let secret = bytes("k", k)?;
        Ok(if want_private {
            KeyMaterial::hmac_secret(secret)
        } else {
            KeyMaterial::hmac_verification_secret(secret)
        })
    }
}
