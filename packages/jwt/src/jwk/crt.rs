//! RSA CRT parameters (RFC 7518 §6.3.2).
//!
//! The `rsa` crate keeps its precomputed CRT values private, so the JWK codec
//! derives them here from the private exponent and the primes. The same
//! derivation checks the values a JWK supplies.

use rsa::traits::{PrivateKeyParts, PublicKeyParts};
use rsa::{BigUint, RsaPrivateKey};

use crate::error::{JwkError, JwtResult};

/// CRT triple for a prime beyond the second
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct OtherPrimeCrt {
    /// The prime
    pub r: BigUint,
    /// `d mod (r - 1)`
    pub d: BigUint,
    /// Inverse of the product of the preceding primes, modulo `r`
    pub t: BigUint,
}

/// CRT parameters of a private key
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct CrtParams {
    pub dp: BigUint,
    pub dq: BigUint,
    pub qi: BigUint,
    pub others: Vec<OtherPrimeCrt>,
}

/// `a^-1 mod prime`, by Fermat's little theorem
fn inverse_mod_prime(a: &BigUint, prime: &BigUint) -> BigUint {
    let exponent = prime - BigUint::from(2u8);
    (a % prime).modpow(&exponent, prime)
}

fn check_primes(primes: &[BigUint]) -> JwtResult<()> {
    if primes.len() < 2 {
        return Err(JwkError::InvalidKey("RSA private key needs at least two primes".into()).into());
    }
    let two = BigUint::from(2u8);
    if primes.iter().any(|prime| prime <= &two) {
        return Err(JwkError::InvalidKey("RSA prime out of range".into()).into());
    }
    Ok(())
}

/// Derive CRT parameters from `d` and the ordered primes.
pub(crate) fn derive(d: &BigUint, primes: &[BigUint]) -> JwtResult<CrtParams> {
    check_primes(primes)?;
    let one = BigUint::from(1u8);
    let (p, q) = (&primes[0], &primes[1]);
    let mut product = p * q;
    let mut others = Vec::with_capacity(primes.len() - 2);
    for r in &primes[2..] {
        others.push(OtherPrimeCrt {
            r: r.clone(),
            d: d % (r - &one),
            t: inverse_mod_prime(&product, r),
        });
        product *= r;
    }
    Ok(CrtParams {
        dp: d % (p - &one),
        dq: d % (q - &one),
        qi: inverse_mod_prime(q, p),
        others,
    })
}

/// CRT parameters of an existing key
pub(crate) fn of_key(key: &RsaPrivateKey) -> JwtResult<CrtParams> {
    derive(key.d(), key.primes())
}

/// Build a private key and check the supplied CRT parameters against it.
///
/// The `rsa` crate validates the modulus, exponents and primes; every
/// supplied CRT value must then equal the value derived from `d`.
pub(crate) fn assemble(
    n: BigUint,
    e: BigUint,
    d: BigUint,
    primes: Vec<BigUint>,
    supplied: &CrtParams,
) -> JwtResult<RsaPrivateKey> {
    check_primes(&primes)?;
    let key = RsaPrivateKey::from_components(n, e, d, primes)
        .map_err(|e| JwkError::InvalidKey(format!("RSA: {e}")))?;
    key.validate()
        .map_err(|e| JwkError::InvalidKey(format!("RSA: {e}")))?;

    let derived = of_key(&key)?;
    let mismatch = |name: &str| -> JwtResult<RsaPrivateKey> {
        Err(JwkError::CrtInconsistent(name.to_string()).into())
    };
    if derived.dp != supplied.dp {
        return mismatch("dp");
    }
    if derived.dq != supplied.dq {
        return mismatch("dq");
    }
    if derived.qi != supplied.qi {
        return mismatch("qi");
    }
    if derived.others.len() != supplied.others.len() {
        return mismatch("oth");
    }
    for (index, (want, got)) in derived.others.iter().zip(&supplied.others).enumerate() {
        if want.r != got.r {
            return mismatch(&format!("oth[{index}].r"));
        }
        if want.d != got.d {
            return mismatch(&format!("oth[{index}].d"));
        }
        if want.t != got.t {
            return mismatch(&format!("oth[{index}].t"));
        }
    }
    tracing::trace!(bits = key.size() * 8, primes = key.primes().len(), "assembled RSA private key");
    Ok(key)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn big(v: u64) -> BigUint {
        BigUint::from(v)
    }

    // textbook key: p = 61, q = 53, e = 17, d = 2753
    #[test]
    fn textbook_values() {
        let crt = derive(&big(2753), &[big(61), big(53)]).unwrap();
        assert_eq!(crt.dp, big(53));
        assert_eq!(crt.dq, big(49));
        assert_eq!(crt.qi, big(38));
        assert!(crt.others.is_empty());
    }

    #[test]
    fn third_prime_coefficient_inverts_product() {
        let primes = [big(11), big(13), big(17)];
        let crt = derive(&big(7), &primes).unwrap();
        let other = &crt.others[0];
        assert_eq!(other.d, big(7));
        assert_eq!((big(11 * 13) * &other.t) % big(17), big(1));
    }

    #[test]
    fn degenerate_primes_rejected() {
        assert!(derive(&big(7), &[big(61)]).is_err());
        assert!(derive(&big(7), &[big(61), big(1)]).is_err());
    }
}
