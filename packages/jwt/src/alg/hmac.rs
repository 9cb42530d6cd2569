//! HS256/384/512

use hmac::{Hmac, Mac};
use sha2::{Sha256, Sha384, Sha512};
use subtle::ConstantTimeEq;

use super::HashAlg;
use crate::error::{AlgorithmError, JwtResult};
use crate::key::{KeyMaterial, OctetUsage};

type HmacSha256 = Hmac<Sha256>;
type HmacSha384 = Hmac<Sha384>;
type HmacSha512 = Hmac<Sha512>;

fn mac(algorithm: &'static str, hash: HashAlg, secret: &[u8], message: &[u8]) -> JwtResult<Vec<u8>> {
    fn run<M: Mac + hmac::digest::KeyInit>(
        algorithm: &'static str,
        secret: &[u8],
        message: &[u8],
    ) -> JwtResult<Vec<u8>> {
        let mut mac = <M as Mac>::new_from_slice(secret)
            .map_err(|_| AlgorithmError::NilKey(algorithm))?;
        mac.update(message);
        Ok(mac.finalize().into_bytes().to_vec())
    }
    match hash {
        HashAlg::Sha256 => run::<HmacSha256>(algorithm, secret, message),
        HashAlg::Sha384 => run::<HmacSha384>(algorithm, secret, message),
        HashAlg::Sha512 => run::<HmacSha512>(algorithm, secret, message),
    }
}

fn secret<'k>(
    algorithm: &'static str,
    key: &'k KeyMaterial,
    need_private: bool,
) -> JwtResult<&'k [u8]> {
    let KeyMaterial::Octet(octet) = key else {
        return Err(AlgorithmError::WrongKeyType {
            algorithm,
            expected: "octet secret",
        }
        .into());
    };
    if need_private && octet.usage() != OctetUsage::Private {
        return Err(AlgorithmError::WrongKeyType {
            algorithm,
            expected: "octet secret tagged for signing",
        }
        .into());
    }
    if octet.secret().is_empty() {
        return Err(AlgorithmError::NilKey(algorithm).into());
    }
    Ok(octet.secret())
}

pub(super) fn sign(
    algorithm: &'static str,
    hash: HashAlg,
    message: &[u8],
    key: &KeyMaterial,
) -> JwtResult<Vec<u8>> {
    mac(algorithm, hash, secret(algorithm, key, true)?, message)
}

pub(super) fn verify(
    algorithm: &'static str,
    hash: HashAlg,
    message: &[u8],
    signature: &[u8],
    key: &KeyMaterial,
) -> JwtResult<()> {
    let expected = mac(algorithm, hash, secret(algorithm, key, false)?, message)?;
    if bool::from(expected.ct_eq(signature)) {
        Ok(())
    } else {
        Err(AlgorithmError::VerificationFailed(algorithm).into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    // RFC 4231 test case 2
    #[test]
    fn rfc4231_case_2() {
        let key = KeyMaterial::hmac_secret(b"Jefe".to_vec());
        let sig = sign("HS256", HashAlg::Sha256, b"what do ya want for nothing?", &key).unwrap();
        assert_eq!(
            sig,
            hex!("5bdcc146bf60754e6a042426089575c75a003f089d2739839dec58b964ec3843").to_vec()
        );
    }

    #[test]
    fn verify_only_secret_cannot_sign() {
        let key = KeyMaterial::hmac_verification_secret(b"Jefe".to_vec());
        assert!(matches!(
            sign("HS256", HashAlg::Sha256, b"m", &key),
            Err(crate::JwtError::Algorithm(AlgorithmError::WrongKeyType { .. }))
        ));
    }

    #[test]
    fn empty_secret_is_nil() {
        let key = KeyMaterial::hmac_secret(Vec::new());
        assert_eq!(
            sign("HS384", HashAlg::Sha384, b"m", &key).unwrap_err(),
            AlgorithmError::NilKey("HS384").into()
        );
    }

    #[test]
    fn truncated_mac_is_rejected() {
        let key = KeyMaterial::hmac_secret(b"k".to_vec());
        let sig = sign("HS512", HashAlg::Sha512, b"m", &key).unwrap();
        assert!(verify("HS512", HashAlg::Sha512, b"m", &sig[..32], &key).is_err());
        assert!(verify("HS512", HashAlg::Sha512, b"m", &sig, &key.to_public()).is_ok());
    }
}
