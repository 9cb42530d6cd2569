//! Shared fixtures for the integration tests
#![allow(dead_code)]

use jwtv::{Jwk, KeyMaterial};
use once_cell::sync::Lazy;
use serde_json::Value;

pub const RSA_PRIVATE_JWK: &str = include_str!("../fixtures/rsa_private.json");
pub const RSA_UNRELATED_JWK: &str = include_str!("../fixtures/rsa_unrelated_private.json");
pub const RSA_MULTI_PRIME_JWK: &str = include_str!("../fixtures/rsa_multi_prime.json");
pub const EC_KEYS: &str = include_str!("../fixtures/ec_keys.json");
pub const PSS_EXTERNAL: &str = include_str!("../fixtures/pss_external.json");

/// RSA private key shared across tests; decoding runs the CRT checks once
pub static RSA_PRIVATE: Lazy<KeyMaterial> = Lazy::new(|| {
    Jwk::from_json(RSA_PRIVATE_JWK)
        .and_then(|jwk| jwk.to_private_key())
        .expect("rsa fixture decodes")
});

pub static RSA_UNRELATED: Lazy<KeyMaterial> = Lazy::new(|| {
    Jwk::from_json(RSA_UNRELATED_JWK)
        .and_then(|jwk| jwk.to_private_key())
        .expect("unrelated rsa fixture decodes")
});

static EC_FIXTURES: Lazy<Value> =
    Lazy::new(|| serde_json::from_str(EC_KEYS).expect("ec fixture is JSON"));

/// JWK of the EC fixture for `alg` (ES256, ES384 or ES512)
pub fn ec_jwk(alg: &str) -> Jwk {
    serde_json::from_value(EC_FIXTURES[alg]["jwk"].clone()).expect("ec jwk fixture")
}

/// Externally produced token signed with the EC fixture for `alg`
pub fn ec_token(alg: &str) -> String {
    EC_FIXTURES[alg]["token"]
        .as_str()
        .expect("ec token fixture")
        .to_string()
}

pub fn ec_private(alg: &str) -> KeyMaterial {
    ec_jwk(alg).to_private_key().expect("ec private key")
}

/// Externally produced PSS tokens: `token` (PS256, maximal salt) or `zero_salt_token` (PS384)
pub fn pss_token(name: &str) -> String {
    let fixtures: Value = serde_json::from_str(PSS_EXTERNAL).expect("pss fixture is JSON");
    fixtures[name].as_str().expect("pss token").to_string()
}

/// RFC 8037 A.1 Ed25519 key
pub const ED25519_D: &str = "nWGxne_9WmC6hEr0kuwsxERJxWl7MmkZcDusAxyuf2A";
pub const ED25519_X: &str = "11qYAYKxCrfVS_7TyWQHOg7hcvPapiMlrwIaaPcHURo";

pub fn ed25519_private() -> KeyMaterial {
    let seed: [u8; 32] = jwtv::decode_b64(ED25519_D)
        .expect("seed")
        .try_into()
        .expect("32-byte seed");
    KeyMaterial::ed25519_from_seed(&seed)
}

/// Split a compact token into its signing input and decoded signature
pub fn split_token(compact: &str) -> (String, Vec<u8>) {
    let (input, signature) = compact.rsplit_once('.').expect("three segments");
    (input.to_string(), jwtv::decode_b64(signature).expect("signature base64"))
}
