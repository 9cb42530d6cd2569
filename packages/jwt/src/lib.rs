//! JOSE/JWT trust primitives.
//!
//! - [`alg`]: the fixed registry of JWS signing algorithms (HS*, RS*, PS*,
//!   ES*, EdDSA and the unsecured `none`), looked up by name
//! - [`jwk`]: JSON Web Key records and their conversion to [`KeyMaterial`]
//! - [`token`]: compact token parsing, validation, signing and verification
//! - [`pem`]: in-memory PEM parsing into [`KeyMaterial`]
//!
//! ```
//! use jwtv::{Header, Jwt, KeyMaterial, Payload, TokenOptions};
//!
//! let key = KeyMaterial::hmac_secret(b"a shared secret".to_vec());
//! let mut payload = Payload::new();
//! payload.add("sub", "alice").add("exp", jwtv::NumericDate::now().seconds() + 60);
//!
//! let mut token = Jwt::from_segments(Header::new("HS256"), payload);
//! token.sign(&key)?;
//!
//! let parsed = Jwt::from_compact_string(token.compact().unwrap_or_default(), TokenOptions::default())?;
//! parsed.verify([&key.to_public()])?;
//! # Ok::<(), jwtv::JwtError>(())
//! ```

pub mod alg;
mod encoding;
mod error;
pub mod jwk;
mod key;
mod numeric_date;
pub mod pem;
pub mod token;

pub use alg::{AlgorithmFamily, HashAlg, SigningAlgorithm, lookup};
pub use encoding::{decode_b64, encode_b64};
pub use error::{AlgorithmError, JwkError, JwtError, JwtResult};
pub use jwk::{Jwk, JwkSet, OtherPrime, Revocation};
pub use key::{EcCurve, EcPrivateKey, EcPublicKey, KeyMaterial, OctetKey, OctetUsage};
pub use numeric_date::NumericDate;
pub use token::{
    Audience, ClaimSet, CognitoAccessToken, CognitoIdToken, Header, JoseHeader, Jwt, Payload,
    Segment, Token, TokenOptions,
};
