//! Immutable view of a key set at one point in time

use std::collections::HashMap;

use chrono::{DateTime, Utc};
use jwtv::{Jwk, KeyMaterial};

/// Public keys of one key set, indexed by key id.
///
/// A key's id is its `kid` when that is non-empty and not already taken by
/// an earlier key; otherwise it is the key's decimal position in the set.
/// Records that do not convert to a public key are skipped.
#[derive(Debug, Clone, Default)]
pub struct KeySnapshot {
    keys: HashMap<String, KeyMaterial>,
    order: Vec<String>,
    jwks: Vec<Jwk>,
    fetched_at: Option<DateTime<Utc>>,
}

impl KeySnapshot {
    /// Convert `jwks` and index the resulting public keys
    #[must_use]
    pub fn from_jwks(jwks: Vec<Jwk>, fetched_at: Option<DateTime<Utc>>) -> Self {
        let mut keys = HashMap::with_capacity(jwks.len());
        let mut order = Vec::with_capacity(jwks.len());
        for (index, jwk) in jwks.iter().enumerate() {
            let id = match jwk.kid.as_deref() {
                Some(kid) if !kid.is_empty() && !keys.contains_key(kid) => kid.to_string(),
                _ => index.to_string(),
            };
            match jwk.to_public_key() {
                Ok(key) => {
                    if keys.insert(id.clone(), key).is_some() {
                        tracing::warn!(index, id = %id, "JWK replaces an earlier key with the same id");
                    } else {
                        order.push(id);
                    }
                }
                Err(error) => {
                    tracing::warn!(index, kid = ?jwk.kid, %error, "skipping unusable JWK");
                }
            }
        }
        Self {
            keys,
            order,
            jwks,
            fetched_at,
        }
    }

    /// Key stored under `id`
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&KeyMaterial> {
        self.keys.get(id)
    }

    /// Ids in key-set order
    #[must_use]
    pub fn ids(&self) -> &[String] {
        &self.order
    }

    /// Keys in key-set order
    pub fn keys(&self) -> impl Iterator<Item = &KeyMaterial> {
        self.order.iter().filter_map(|id| self.keys.get(id))
    }

    /// Records the snapshot was built from, unusable ones included
    #[must_use]
    pub fn jwks(&self) -> &[Jwk] {
        &self.jwks
    }

    /// When the key set was fetched; `None` for static sets and before the first fetch
    #[must_use]
    pub fn fetched_at(&self) -> Option<DateTime<Utc>> {
        self.fetched_at
    }

    /// Number of usable keys
    #[must_use]
    pub fn len(&self) -> usize {
        self.order.len()
    }

    /// True when no key converted
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.order.is_empty()
    }
}
