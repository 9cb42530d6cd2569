//! ES256/384/512.
//!
//! Signatures are the JOSE fixed-width `r || s` form, each half padded to
//! `ceil(curve_bits / 8)` bytes: 64, 96 and 132 bytes in total.

use crate::error::{AlgorithmError, JwkError, JwtResult};
use crate::key::{EcCurve, KeyMaterial};

macro_rules! curve_ops {
    ($module:ident, $krate:ident) => {
        mod $module {
            use p256::ecdsa::signature::{Signer, Verifier};
            use $krate::ecdsa::{Signature, SigningKey, VerifyingKey};

            /// SEC1 uncompressed public point for scalar `d`
            pub(super) fn public_point(d: &[u8]) -> Option<Vec<u8>> {
                let key = SigningKey::from_slice(d).ok()?;
                let point = VerifyingKey::from(&key).to_encoded_point(false);
                Some(point.as_bytes().to_vec())
            }

            pub(super) fn sign(d: &[u8], message: &[u8]) -> Result<Vec<u8>, String> {
                let key = SigningKey::from_slice(d).map_err(|e| e.to_string())?;
                let signature: Signature = key.try_sign(message).map_err(|e| e.to_string())?;
                Ok(signature.to_bytes().to_vec())
            }

            pub(super) fn verify(sec1: &[u8], message: &[u8], signature: &[u8]) -> bool {
                let Ok(key) = VerifyingKey::from_sec1_bytes(sec1) else {
                    return false;
                };
                let Ok(signature) = Signature::from_slice(signature) else {
                    return false;
                };
                key.verify(message, &signature).is_ok()
            }
        }
    };
}

curve_ops!(p256_ops, p256);
curve_ops!(p384_ops, p384);
curve_ops!(p521_ops, p521);

/// Affine coordinates of the public point for scalar `d`.
pub(crate) fn public_coordinates(curve: EcCurve, d: &[u8]) -> JwtResult<(Vec<u8>, Vec<u8>)> {
    let point = match curve {
        EcCurve::P256 => p256_ops::public_point(d),
        EcCurve::P384 => p384_ops::public_point(d),
        EcCurve::P521 => p521_ops::public_point(d),
    }
    .ok_or_else(|| JwkError::InvalidKey(format!("{curve} private scalar out of range")))?;
    let width = curve.byte_len();
    // 0x04 || x || y
    if point.len() != 1 + 2 * width {
        return Err(JwkError::InvalidKey(format!("{curve} public point has unexpected length")).into());
    }
    Ok((point[1..=width].to_vec(), point[1 + width..].to_vec()))
}

fn wrong_curve(algorithm: &'static str, expected: EcCurve, actual: EcCurve) -> AlgorithmError {
    AlgorithmError::WrongCurveSize {
        algorithm,
        expected: expected.name(),
        actual: actual.name(),
    }
}

pub(super) fn sign(
    algorithm: &'static str,
    curve: EcCurve,
    message: &[u8],
    key: &KeyMaterial,
) -> JwtResult<Vec<u8>> {
    let KeyMaterial::EcPrivate(private) = key else {
        return Err(AlgorithmError::WrongKeyType {
            algorithm,
            expected: "EC private key",
        }
        .into());
    };
    if private.curve() != curve {
        return Err(wrong_curve(algorithm, curve, private.curve()).into());
    }
    let signed = match curve {
        EcCurve::P256 => p256_ops::sign(private.d(), message),
        EcCurve::P384 => p384_ops::sign(private.d(), message),
        EcCurve::P521 => p521_ops::sign(private.d(), message),
    };
    signed.map_err(|reason| AlgorithmError::SigningFailed { algorithm, reason }.into())
}

pub(super) fn verify(
    algorithm: &'static str,
    curve: EcCurve,
    message: &[u8],
    signature: &[u8],
    key: &KeyMaterial,
) -> JwtResult<()> {
    let KeyMaterial::EcPublic(public) = key else {
        return Err(AlgorithmError::WrongKeyType {
            algorithm,
            expected: "EC public key",
        }
        .into());
    };
    let expected = 2 * curve.byte_len();
    if signature.len() != expected {
        return Err(AlgorithmError::WrongSignatureLength {
            algorithm,
            expected,
            actual: signature.len(),
        }
        .into());
    }
    if public.curve() != curve {
        return Err(wrong_curve(algorithm, curve, public.curve()).into());
    }
    let sec1 = public.to_sec1();
    let valid = match curve {
        EcCurve::P256 => p256_ops::verify(&sec1, message, signature),
        EcCurve::P384 => p384_ops::verify(&sec1, message, signature),
        EcCurve::P521 => p521_ops::verify(&sec1, message, signature),
    };
    if valid {
        Ok(())
    } else {
        Err(AlgorithmError::VerificationFailed(algorithm).into())
    }
}
