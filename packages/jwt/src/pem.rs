//! In-memory PEM → [`KeyMaterial`].
//!
//! Only the first PEM block of the input is read, and its label is not
//! trusted: the DER body is tried against each encoding the key type allows.

use p256::elliptic_curve::sec1::ToEncodedPoint;
use rsa::pkcs1::{DecodeRsaPrivateKey, DecodeRsaPublicKey};
use rsa::pkcs8::{DecodePrivateKey, DecodePublicKey};
use rsa::{RsaPrivateKey, RsaPublicKey};

use crate::error::{JwtError, JwtResult};
use crate::key::{EcCurve, EcPrivateKey, EcPublicKey, KeyMaterial};

fn first_block(text: &str) -> JwtResult<Vec<u8>> {
    pem::parse(text)
        .map(pem::Pem::into_contents)
        .map_err(|e| JwtError::pem(format!("key must be PEM encoded: {e}")))
}

/// DER SubjectPublicKeyInfo of an X.509 certificate
fn certificate_spki(der: &[u8]) -> Option<Vec<u8>> {
    let (_, cert) = x509_parser::parse_x509_certificate(der).ok()?;
    Some(cert.public_key().raw.to_vec())
}

fn ec_scalar(der: &[u8]) -> Option<(EcCurve, Vec<u8>)> {
    macro_rules! try_curve {
        ($krate:ident, $curve:expr) => {
            if let Some(secret) = $krate::SecretKey::from_sec1_der(der)
                .ok()
                .or_else(|| $krate::SecretKey::from_pkcs8_der(der).ok())
            {
                return Some(($curve, secret.to_bytes().to_vec()));
            }
        };
    }
    try_curve!(p256, EcCurve::P256);
    try_curve!(p384, EcCurve::P384);
    try_curve!(p521, EcCurve::P521);
    None
}

fn ec_point(spki: &[u8]) -> Option<(EcCurve, Vec<u8>)> {
    macro_rules! try_curve {
        ($krate:ident, $curve:expr) => {
            if let Ok(public) = $krate::PublicKey::from_public_key_der(spki) {
                return Some(($curve, public.to_encoded_point(false).as_bytes().to_vec()));
            }
        };
    }
    try_curve!(p256, EcCurve::P256);
    try_curve!(p384, EcCurve::P384);
    try_curve!(p521, EcCurve::P521);
    None
}

fn ec_public(curve: EcCurve, sec1: &[u8]) -> JwtResult<EcPublicKey> {
    let width = curve.byte_len();
    if sec1.len() != 1 + 2 * width {
        return Err(JwtError::pem(format!("{curve} point is not uncompressed")));
    }
    EcPublicKey::new(curve, &sec1[1..=width], &sec1[1 + width..])
}

/// Public key of any supported type from DER SubjectPublicKeyInfo
fn spki_key(spki: &[u8]) -> Option<KeyMaterial> {
    if let Ok(key) = RsaPublicKey::from_public_key_der(spki) {
        return Some(KeyMaterial::RsaPublic(key));
    }
    if let Some((curve, sec1)) = ec_point(spki) {
        return ec_public(curve, &sec1).ok().map(KeyMaterial::EcPublic);
    }
    ed25519_dalek::VerifyingKey::from_public_key_der(spki)
        .ok()
        .map(KeyMaterial::Ed25519Public)
}

/// RSA private key from PKCS#1 or PKCS#8 PEM.
///
/// # Errors
///
/// Returns [`JwtError::Pem`] when the text is not PEM or the body is neither encoding.
pub fn parse_rsa_private_key(text: &str) -> JwtResult<KeyMaterial> {
    let der = first_block(text)?;
    RsaPrivateKey::from_pkcs1_der(&der)
        .or_else(|_| RsaPrivateKey::from_pkcs8_der(&der))
        .map(KeyMaterial::from)
        .map_err(|e| JwtError::pem(format!("not an RSA private key: {e}")))
}

/// RSA public key from SPKI, an X.509 certificate or PKCS#1 PEM.
///
/// # Errors
///
/// Returns [`JwtError::Pem`] when no encoding yields an RSA public key.
pub fn parse_rsa_public_key(text: &str) -> JwtResult<KeyMaterial> {
    let der = first_block(text)?;
    let spki = certificate_spki(&der);
    RsaPublicKey::from_public_key_der(spki.as_deref().unwrap_or(&der))
        .or_else(|_| RsaPublicKey::from_pkcs1_der(&der).map_err(|_| ()))
        .map(KeyMaterial::RsaPublic)
        .map_err(|()| JwtError::pem("not an RSA public key"))
}

/// EC private key from SEC1 or PKCS#8 PEM, on P-256, P-384 or P-521.
///
/// # Errors
///
/// Returns [`JwtError::Pem`] when the body is not an EC key on a supported curve.
pub fn parse_ec_private_key(text: &str) -> JwtResult<KeyMaterial> {
    let der = first_block(text)?;
    let (curve, scalar) =
        ec_scalar(&der).ok_or_else(|| JwtError::pem("not an EC private key"))?;
    Ok(KeyMaterial::EcPrivate(EcPrivateKey::from_scalar(curve, &scalar)?))
}

/// EC public key from SPKI or X.509 certificate PEM.
///
/// # Errors
///
/// Returns [`JwtError::Pem`] when the body is not an EC key on a supported curve.
pub fn parse_ec_public_key(text: &str) -> JwtResult<KeyMaterial> {
    let der = first_block(text)?;
    let spki = certificate_spki(&der).unwrap_or(der);
    let (curve, sec1) = ec_point(&spki).ok_or_else(|| JwtError::pem("not an EC public key"))?;
    Ok(KeyMaterial::EcPublic(ec_public(curve, &sec1)?))
}

/// Ed25519 private key from PKCS#8 PEM.
///
/// # Errors
///
/// Returns [`JwtError::Pem`] when the body is not an Ed25519 PKCS#8 key.
pub fn parse_ed25519_private_key(text: &str) -> JwtResult<KeyMaterial> {
    let der = first_block(text)?;
    ed25519_dalek::SigningKey::from_pkcs8_der(&der)
        .map(KeyMaterial::Ed25519Private)
        .map_err(|e| JwtError::pem(format!("not an Ed25519 private key: {e}")))
}

/// Ed25519 public key from SPKI PEM.
///
/// # Errors
///
/// Returns [`JwtError::Pem`] when the body is not an Ed25519 public key.
pub fn parse_ed25519_public_key(text: &str) -> JwtResult<KeyMaterial> {
    let der = first_block(text)?;
    ed25519_dalek::VerifyingKey::from_public_key_der(&der)
        .map(KeyMaterial::Ed25519Public)
        .map_err(|e| JwtError::pem(format!("not an Ed25519 public key: {e}")))
}

/// DER bodies of every `CERTIFICATE` block, in order.
///
/// The result feeds [`Jwk::from_key_material`](crate::Jwk::from_key_material).
///
/// # Errors
///
/// Returns [`JwtError::Pem`] for malformed PEM or when no certificate is present.
pub fn parse_certificates(text: &str) -> JwtResult<Vec<Vec<u8>>> {
    let certificates: Vec<Vec<u8>> = pem::parse_many(text)
        .map_err(|e| JwtError::pem(e.to_string()))?
        .into_iter()
        .filter(|block| block.tag() == "CERTIFICATE")
        .map(pem::Pem::into_contents)
        .collect();
    if certificates.is_empty() {
        return Err(JwtError::pem("no CERTIFICATE block found"));
    }
    Ok(certificates)
}

/// Public key of a DER X.509 certificate (RSA, EC or Ed25519).
///
/// # Errors
///
/// Returns [`JwtError::Pem`] when the certificate does not parse or carries
/// an unsupported key type.
pub fn public_key_from_certificate(der: &[u8]) -> JwtResult<KeyMaterial> {
    let spki = certificate_spki(der).ok_or_else(|| JwtError::pem("not an X.509 certificate"))?;
    spki_key(&spki).ok_or_else(|| JwtError::pem("certificate key type is not supported"))
}
