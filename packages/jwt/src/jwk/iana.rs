//! Membership tests against the IANA JOSE registries.
//!
//! Matching is exact. The empty string counts as registered for `alg`, `crv`
//! and `use`, where the member is optional, but not for `key_ops` entries or
//! `kty`, which must name something.

/// "JSON Web Signature and Encryption Algorithms" (RFC 7518 §7.1)
#[must_use]
pub fn is_registered_alg(alg: &str) -> bool {
    matches!(
        alg,
        "HS256"
            | "HS384"
            | "HS512"
            | "RS256"
            | "RS384"
            | "RS512"
            | "ES256"
            | "ES384"
            | "ES512"
            | "PS256"
            | "PS384"
            | "PS512"
            | "none"
            | "RSA1_5"
            | "RSA-OAEP"
            | "RSA-OAEP-256"
            | "A128KW"
            | "A192KW"
            | "A256KW"
            | "dir"
            | "ECDH-ES"
            | "ECDH-ES+A128KW"
            | "ECDH-ES+A192KW"
            | "ECDH-ES+A256KW"
            | "A128GCMKW"
            | "A192GCMKW"
            | "A256GCMKW"
            | "PBES2-HS256+A128KW"
            | "PBES2-HS384+A192KW"
            | "PBES2-HS512+A256KW"
            | "A128CBC-HS256"
            | "A192CBC-HS384"
            | "A256CBC-HS512"
            | "A128GCM"
            | "A192GCM"
            | "A256GCM"
            | "EdDSA"
            | "RS1"
            | "RSA-OAEP-384"
            | "RSA-OAEP-512"
            | "A128CBC"
            | "A192CBC"
            | "A256CBC"
            | "A128CTR"
            | "A192CTR"
            | "A256CTR"
            | "HS1"
            | "ES256K"
            | ""
    )
}

/// "JSON Web Key Elliptic Curve" (RFC 7518 §6.2.1.1, RFC 8037)
#[must_use]
pub fn is_registered_curve(crv: &str) -> bool {
    matches!(
        crv,
        "P-256" | "P-384" | "P-521" | "Ed25519" | "Ed448" | "X25519" | "X448" | "secp256k1" | ""
    )
}

/// "JSON Web Key Operations" (RFC 7517 §4.3)
#[must_use]
pub fn is_registered_key_ops(key_op: &str) -> bool {
    matches!(
        key_op,
        "sign" | "verify" | "encrypt" | "decrypt" | "wrapKey" | "unwrapKey" | "deriveKey" | "deriveBits"
    )
}

/// "JSON Web Key Types" (RFC 7517 §4.1)
#[must_use]
pub fn is_registered_kty(kty: &str) -> bool {
    matches!(kty, "EC" | "OKP" | "RSA" | "oct")
}

/// "JSON Web Key Use" (RFC 7517 §4.2)
#[must_use]
pub fn is_registered_use(key_use: &str) -> bool {
    matches!(key_use, "enc" | "sig" | "")
}
