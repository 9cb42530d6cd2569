//! EdDSA, Ed25519 only

use ed25519_dalek::{Signature, Signer, Verifier};

use crate::error::{AlgorithmError, JwtResult};
use crate::key::KeyMaterial;

pub(super) fn sign(algorithm: &'static str, message: &[u8], key: &KeyMaterial) -> JwtResult<Vec<u8>> {
    match key {
        KeyMaterial::Ed25519Private(signing) => Ok(signing.sign(message).to_bytes().to_vec()),
        _ => Err(AlgorithmError::WrongKeyType {
            algorithm,
            expected: "Ed25519 private key",
        }
        .into()),
    }
}

pub(super) fn verify(
    algorithm: &'static str,
    message: &[u8],
    signature: &[u8],
    key: &KeyMaterial,
) -> JwtResult<()> {
    let KeyMaterial::Ed25519Public(public) = key else {
        return Err(AlgorithmError::WrongKeyType {
            algorithm,
            expected: "Ed25519 public key",
        }
        .into());
    };
    let signature = Signature::from_slice(signature).map_err(|_| AlgorithmError::WrongSignatureLength {
        algorithm,
        expected: Signature::BYTE_SIZE,
        actual: signature.len(),
    })?;
    public
        .verify(message, &signature)
        .map_err(|_| AlgorithmError::VerificationFailed(algorithm).into())
}
