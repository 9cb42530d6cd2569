//! RS256/384/512

use rsa::rand_core::OsRng;
use rsa::{Pkcs1v15Sign, RsaPrivateKey, RsaPublicKey};
use sha2::{Sha256, Sha384, Sha512};

use super::HashAlg;
use crate::error::{AlgorithmError, JwtResult};
use crate::key::KeyMaterial;

fn scheme(hash: HashAlg) -> Pkcs1v15Sign {
    match hash {
        HashAlg::Sha256 => Pkcs1v15Sign::new::<Sha256>(),
        HashAlg::Sha384 => Pkcs1v15Sign::new::<Sha384>(),
        HashAlg::Sha512 => Pkcs1v15Sign::new::<Sha512>(),
    }
}

/// Private half of an RSA key, shared with PSS
pub(super) fn private_key<'k>(
    algorithm: &'static str,
    key: &'k KeyMaterial,
) -> JwtResult<&'k RsaPrivateKey> {
    match key {
        KeyMaterial::RsaPrivate(private) => Ok(private.as_ref()),
        _ => Err(AlgorithmError::WrongKeyType {
            algorithm,
            expected: "RSA private key",
        }
        .into()),
    }
}

/// Public RSA key, shared with PSS
pub(super) fn public_key<'k>(
    algorithm: &'static str,
    key: &'k KeyMaterial,
) -> JwtResult<&'k RsaPublicKey> {
    match key {
        KeyMaterial::RsaPublic(public) => Ok(public),
        _ => Err(AlgorithmError::WrongKeyType {
            algorithm,
            expected: "RSA public key",
        }
        .into()),
    }
}

pub(super) fn sign(
    algorithm: &'static str,
    hash: HashAlg,
    message: &[u8],
    key: &KeyMaterial,
) -> JwtResult<Vec<u8>> {
    let private = private_key(algorithm, key)?;
    let digest = hash.digest(message);
    private
        .sign_with_rng(&mut OsRng, scheme(hash), &digest)
        .map_err(|e| {
            AlgorithmError::SigningFailed {
                algorithm,
                reason: e.to_string(),
            }
            .into()
        })
}

pub(super) fn verify(
    algorithm: &'static str,
    hash: HashAlg,
    message: &[u8],
    signature: &[u8],
    key: &KeyMaterial,
) -> JwtResult<()> {
    let public = public_key(algorithm, key)?;
    let digest = hash.digest(message);
    public
        .verify(scheme(hash), &digest, signature)
        .map_err(|_| AlgorithmError::VerificationFailed(algorithm).into())
}
