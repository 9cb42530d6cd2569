//! PS256/384/512.
//!
//! Signing always uses a salt as long as the hash output (RFC 7518 §3.5).
//! Verification recovers the salt length from the encoded message instead of
//! requiring that length, so tokens from producers that signed with an
//! "auto" or maximal salt still verify. The two policies differ on purpose.

use rsa::rand_core::OsRng;
use rsa::traits::PublicKeyParts;
use rsa::{BigUint, Pss, RsaPublicKey};
use sha2::{Sha256, Sha384, Sha512};
use subtle::ConstantTimeEq;

use super::rsa::{private_key, public_key};
use super::HashAlg;
use crate::error::{AlgorithmError, JwtResult};
use crate::key::KeyMaterial;

/// Salt length accepted when checking an encoded message
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum SaltLength {
    /// Salt must be exactly the hash output length
    EqualsHash,
    /// Any salt length the encoding allows
    Auto,
}

pub(super) fn sign(
    algorithm: &'static str,
    hash: HashAlg,
    message: &[u8],
    key: &KeyMaterial,
) -> JwtResult<Vec<u8>> {
    let private = private_key(algorithm, key)?;
    let salt_len = hash.output_len();
    let padding = match hash {
        HashAlg::Sha256 => Pss::new_with_salt::<Sha256>(salt_len),
        HashAlg::Sha384 => Pss::new_with_salt::<Sha384>(salt_len),
        HashAlg::Sha512 => Pss::new_with_salt::<Sha512>(salt_len),
    };
    let digest = hash.digest(message);
    private
        .sign_with_rng(&mut OsRng, padding, &digest)
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
    if verify_digest(public, hash, &hash.digest(message), signature, SaltLength::Auto) {
        Ok(())
    } else {
        Err(AlgorithmError::VerificationFailed(algorithm).into())
    }
}

/// RSASSA-PSS-VERIFY (RFC 8017 §8.1.2) over an already hashed message.
pub(crate) fn verify_digest(
    public: &RsaPublicKey,
    hash: HashAlg,
    m_hash: &[u8],
    signature: &[u8],
    salt: SaltLength,
) -> bool {
    match open_signature(public, signature) {
        Some((em, em_bits)) => emsa_pss_verify(hash, m_hash, &em, em_bits, salt),
        None => false,
    }
}

/// RSAVP1 followed by I2OSP into `ceil((modBits - 1) / 8)` bytes.
fn open_signature(public: &RsaPublicKey, signature: &[u8]) -> Option<(Vec<u8>, usize)> {
    let n = public.n();
    if signature.len() != public.size() {
        return None;
    }
    let s = BigUint::from_bytes_be(signature);
    if &s >= n {
        return None;
    }
    let m = s.modpow(public.e(), n);
    let em_bits = n.bits().checked_sub(1)?;
    let em_len = em_bits.div_ceil(8);
    let raw = m.to_bytes_be();
    if raw.len() > em_len {
        return None;
    }
    let mut em = vec![0u8; em_len - raw.len()];
    em.extend_from_slice(&raw);
    Some((em, em_bits))
}

/// EMSA-PSS-VERIFY (RFC 8017 §9.1.2)
fn emsa_pss_verify(hash: HashAlg, m_hash: &[u8], em: &[u8], em_bits: usize, salt: SaltLength) -> bool {
    let h_len = hash.output_len();
    let em_len = em.len();
    if m_hash.len() != h_len || em_len < h_len + 2 || em[em_len - 1] != 0xbc {
        return false;
    }
    let db_len = em_len - h_len - 1;
    let (masked_db, rest) = em.split_at(db_len);
    let h = &rest[..h_len];

    let top_mask = 0xffu8 >> (8 * em_len - em_bits);
    if masked_db[0] & !top_mask != 0 {
        return false;
    }
    let mut db = hash.mgf1(h, db_len);
    for (byte, masked) in db.iter_mut().zip(masked_db) {
        *byte ^= masked;
    }
    db[0] &= top_mask;

    let Some(separator) = db.iter().position(|b| *b != 0) else {
        return false;
    };
    if db[separator] != 0x01 {
        return false;
    }
    let recovered_salt = &db[separator + 1..];
    if salt == SaltLength::EqualsHash && recovered_salt.len() != h_len {
        return false;
    }
    let expected = hash.digest_parts(&[&[0u8; 8], m_hash, recovered_salt]);
    bool::from(expected.ct_eq(h))
}

#[cfg(test)]
mod tests {
    use super::*;
    use rsa::RsaPrivateKey;

    fn key() -> RsaPrivateKey {
        RsaPrivateKey::new(&mut OsRng, 1024).expect("generate test key")
    }

    #[test]
    fn own_signatures_satisfy_both_policies() {
        let private = key();
        let material = KeyMaterial::from(private.clone());
        let sig = sign("PS256", HashAlg::Sha256, b"a.b", &material).unwrap();
        let digest = HashAlg::Sha256.digest(b"a.b");
        let public = private.to_public_key();
        assert!(verify_digest(&public, HashAlg::Sha256, &digest, &sig, SaltLength::Auto));
        assert!(verify_digest(&public, HashAlg::Sha256, &digest, &sig, SaltLength::EqualsHash));
    }

    #[test]
    fn foreign_salt_length_needs_auto() {
        let private = key();
        let digest = HashAlg::Sha256.digest(b"a.b");
        let sig = private
            .sign_with_rng(&mut OsRng, Pss::new_with_salt::<Sha256>(0), &digest)
            .unwrap();
        let public = private.to_public_key();
        assert!(verify_digest(&public, HashAlg::Sha256, &digest, &sig, SaltLength::Auto));
        assert!(!verify_digest(&public, HashAlg::Sha256, &digest, &sig, SaltLength::EqualsHash));
    }

    #[test]
    fn wrong_length_signature_rejected() {
        let public = key().to_public_key();
        let digest = HashAlg::Sha256.digest(b"a.b");
        assert!(!verify_digest(&public, HashAlg::Sha256, &digest, &[0u8; 12], SaltLength::Auto));
    }
}
