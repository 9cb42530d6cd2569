//! The unsecured `none` algorithm.
//!
//! Only the [`KeyMaterial::UnsafeNone`] marker unlocks it, so a token cannot
//! be downgraded to `none` by a caller that passes a real key.

use crate::error::{AlgorithmError, JwtResult};
use crate::key::KeyMaterial;

fn require_marker(algorithm: &'static str, key: &KeyMaterial) -> JwtResult<()> {
    match key {
        KeyMaterial::UnsafeNone => Ok(()),
        _ => Err(AlgorithmError::WrongKeyType {
            algorithm,
            expected: "unsafe none marker",
        }
        .into()),
    }
}

pub(super) fn sign(algorithm: &'static str, key: &KeyMaterial) -> JwtResult<Vec<u8>> {
    require_marker(algorithm, key)?;
    Ok(Vec::new())
}

pub(super) fn verify(algorithm: &'static str, signature: &[u8], key: &KeyMaterial) -> JwtResult<()> {
    require_marker(algorithm, key)?;
    if signature.is_empty() {
        Ok(())
    } else {
        Err(AlgorithmError::WrongSignatureLength {
            algorithm,
            expected: 0,
            actual: signature.len(),
        }
        .into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn marker_and_empty_signature_required() {
        assert!(verify("none", b"", &KeyMaterial::UnsafeNone).is_ok());
        assert!(verify("none", b"x", &KeyMaterial::UnsafeNone).is_err());
        assert!(verify("none", b"", &KeyMaterial::hmac_secret(b"k".to_vec())).is_err());
        assert_eq!(sign("none", &KeyMaterial::UnsafeNone).unwrap(), Vec::<u8>::new());
        assert!(sign("none", &KeyMaterial::hmac_secret(b"k".to_vec())).is_err());
    }
}
