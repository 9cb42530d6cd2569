//! [`KeyMaterial`] → JWK

use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use rsa::BigUint;
use rsa::traits::{PrivateKeyParts, PublicKeyParts};
use sha1::Sha1;
use sha2::{Digest, Sha256};

use super::{Jwk, OtherPrime, crt};
use crate::encoding::encode_b64;
use crate::error::{JwkError, JwtResult};
use crate::key::KeyMaterial;

fn b64_uint(value: &BigUint) -> String {
    encode_b64(&value.to_bytes_be())
}

impl Jwk {
    /// Encode key material as a JWK.
    ///
    /// `certificates` are DER X.509 certificates, leaf first. When given they
    /// populate `x5c`, and the leaf's SHA-1 and SHA-256 digests populate `x5t`
    /// and `x5t#S256`.
    ///
    /// # Errors
    ///
    /// Fails for the unsafe-none marker and for certificates that do not parse.
    pub fn from_key_material(key: &KeyMaterial, certificates: &[Vec<u8>]) -> JwtResult<Self> {
        let mut jwk = match key {
            KeyMaterial::RsaPublic(public) => Self {
                kty: Some("RSA".into()),
                n: Some(b64_uint(public.n())),
                e: Some(b64_uint(public.e())),
                ..Self::default()
            },
            KeyMaterial::RsaPrivate(private) => {
                let crt = crt::of_key(private)?;
                let primes = private.primes();
                let oth = crt
                    .others
                    .iter()
                    .map(|other| OtherPrime {
                        r: Some(b64_uint(&other.r)),
                        d: Some(b64_uint(&other.d)),
                        t: Some(b64_uint(&other.t)),
                    })
                    .collect::<Vec<_>>();
                Self {
                    kty: Some("RSA".into()),
                    n: Some(b64_uint(private.n())),
                    e: Some(b64_uint(private.e())),
                    d: Some(b64_uint(private.d())),
                    p: Some(b64_uint(&primes[0])),
                    q: Some(b64_uint(&primes[1])),
                    dp: Some(b64_uint(&crt.dp)),
                    dq: Some(b64_uint(&crt.dq)),
                    qi: Some(b64_uint(&crt.qi)),
                    oth: (!oth.is_empty()).then_some(oth),
                    ..Self::default()
                }
            }
            KeyMaterial::EcPublic(public) => Self {
                kty: Some("EC".into()),
                crv: Some(public.curve().name().into()),
                x: Some(encode_b64(public.x())),
                y: Some(encode_b64(public.y())),
                ..Self::default()
            },
            KeyMaterial::EcPrivate(private) => Self {
                kty: Some("EC".into()),
                crv: Some(private.curve().name().into()),
                x: Some(encode_b64(private.public().x())),
                y: Some(encode_b64(private.public().y())),
                d: Some(encode_b64(private.d())),
                ..Self::default()
            },
            KeyMaterial::Ed25519Public(public) => Self {
                kty: Some("OKP".into()),
                crv: Some("Ed25519".into()),
                alg: Some("EdDSA".into()),
                x: Some(encode_b64(public.as_bytes())),
                ..Self::default()
            },
            KeyMaterial::Ed25519Private(private) => Self {
                kty: Some("OKP".into()),
                crv: Some("Ed25519".into()),
                alg: Some("EdDSA".into()),
                x: Some(encode_b64(private.verifying_key().as_bytes())),
                d: Some(encode_b64(private.as_bytes())),
                ..Self::default()
            },
            KeyMaterial::Octet(octet) => Self {
                kty: Some("oct".into()),
                k: Some(encode_b64(octet.secret())),
                ..Self::default()
            },
            KeyMaterial::UnsafeNone => {
                return Err(JwkError::UnsupportedKeyType("unsafe none marker".into()).into());
            }
        };
        jwk.attach_certificates(certificates)?;
        tracing::trace!(kind = key.kind(), certificates = certificates.len(), "encoded JWK");
        Ok(jwk)
    }

    fn attach_certificates(&mut self, certificates: &[Vec<u8>]) -> JwtResult<()> {
        let Some(leaf) = certificates.first() else {
            return Ok(());
        };
        for (index, der) in certificates.iter().enumerate() {
            x509_parser::parse_x509_certificate(der)
                .map_err(|e| JwkError::X509(format!("certificate {index}: {e}")))?;
        }
        self.x5c = Some(certificates.iter().map(|der| STANDARD.encode(der)).collect());
        self.x5t = Some(encode_b64(&Sha1::digest(leaf)));
        self.x5t_s256 = Some(encode_b64(&Sha256::digest(leaf)));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::key::{EcCurve, EcPrivateKey};

    #[test]
    fn ed25519_sets_alg() {
        let key = KeyMaterial::ed25519_from_seed(&[7u8; 32]);
        let jwk = Jwk::from_key_material(&key, &[]).unwrap();
        assert_eq!(jwk.alg.as_deref(), Some("EdDSA"));
        assert_eq!(jwk.crv.as_deref(), Some("Ed25519"));
        assert_eq!(jwk.to_private_key().unwrap(), key);
        assert_eq!(jwk.to_public_key().unwrap(), key.to_public());
    }

    #[test]
    fn ec_members_are_fixed_width() {
        // a scalar with leading zero bytes still encodes at full width
        let mut d = vec![0u8; 66];
        d[65] = 5;
        let key = KeyMaterial::EcPrivate(EcPrivateKey::from_scalar(EcCurve::P521, &d).unwrap());
        let jwk = Jwk::from_key_material(&key, &[]).unwrap();
        for member in [&jwk.x, &jwk.y, &jwk.d] {
            let decoded = crate::decode_b64(member.as_deref().unwrap()).unwrap();
            assert_eq!(decoded.len(), 66);
        }
        assert_eq!(jwk.to_private_key().unwrap(), key);
    }

    #[test]
    fn none_marker_cannot_be_encoded() {
        let err = Jwk::from_key_material(&KeyMaterial::UnsafeNone, &[]).unwrap_err();
        assert!(matches!(err, crate::JwtError::Jwk(JwkError::UnsupportedKeyType(_))));
    }

    #[test]
    fn garbage_certificate_rejected() {
        let key = KeyMaterial::hmac_secret(b"k".to_vec());
        let err = Jwk::from_key_material(&key, &[b"junk".to_vec()]).unwrap_err();
        assert!(matches!(err, crate::JwtError::Jwk(JwkError::X509(_))));
    }
}
