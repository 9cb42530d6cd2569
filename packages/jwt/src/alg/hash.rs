//! SHA-2 selector shared by the algorithm families

use sha2::{Digest, Sha256, Sha384, Sha512};

/// Hash function bound to an algorithm
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum HashAlg {
    /// SHA-256
    Sha256,
    /// SHA-384
    Sha384,
    /// SHA-512
    Sha512,
}

impl HashAlg {
    /// Digest size in bytes
    #[inline]
    #[must_use]
    pub const fn output_len(self) -> usize {
        match self {
            Self::Sha256 => 32,
            Self::Sha384 => 48,
            Self::Sha512 => 64,
        }
    }

    /// One-shot digest of `data`
    #[must_use]
    pub fn digest(self, data: &[u8]) -> Vec<u8> {
        match self {
            Self::Sha256 => Sha256::digest(data).to_vec(),
            Self::Sha384 => Sha384::digest(data).to_vec(),
            Self::Sha512 => Sha512::digest(data).to_vec(),
        }
    }

    /// Digest of several slices, fed in order
    pub(crate) fn digest_parts(self, parts: &[&[u8]]) -> Vec<u8> {
        fn run<D: Digest>(parts: &[&[u8]]) -> Vec<u8> {
            let mut hasher = D::new();
            for part in parts {
                hasher.update(part);
            }
            hasher.finalize().to_vec()
        }
        match self {
            Self::Sha256 => run::<Sha256>(parts),
            Self::Sha384 => run::<Sha384>(parts),
            Self::Sha512 => run::<Sha512>(parts),
        }
    }

    /// MGF1 mask generation (RFC 8017 B.2.1)
    pub(crate) fn mgf1(self, seed: &[u8], len: usize) -> Vec<u8> {
        let mut mask = Vec::with_capacity(len + self.output_len());
        let mut counter: u32 = 0;
        while mask.len() < len {
            mask.extend(self.digest_parts(&[seed, &counter.to_be_bytes()]));
            counter = counter.wrapping_add(1);
        }
        mask.truncate(len);
        mask
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use hex_literal::hex;

    #[test]
    fn sha256_of_abc() {
        assert_eq!(
            HashAlg::Sha256.digest(b"abc"),
            hex!("ba7816bf8f01cfea414140de5dae2223b00361a396177a9cb410ff61f20015ad").to_vec()
        );
    }

    #[test]
    fn digest_parts_matches_concatenation() {
        for hash in [HashAlg::Sha256, HashAlg::Sha384, HashAlg::Sha512] {
            assert_eq!(hash.digest_parts(&[b"header", b".", b"payload"]), hash.digest(b"header.payload"));
            assert_eq!(hash.digest(b"").len(), hash.output_len());
        }
    }

    #[test]
    fn mgf1_prefix_is_stable() {
        let long = HashAlg::Sha384.mgf1(b"seed", 150);
        let short = HashAlg::Sha384.mgf1(b"seed", 20);
        assert_eq!(long.len(), 150);
        assert_eq!(&long[..20], &short[..]);
    }
}
