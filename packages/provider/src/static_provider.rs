//! Key sets fixed at construction

use jwtv::{Jwk, JwkSet, KeyMaterial};

use crate::JwkProvider;
use crate::error::ProviderResult;
use crate::snapshot::KeySnapshot;

/// Provider over a key set supplied by configuration; refreshing is a no-op
#[derive(Debug, Clone, Default)]
pub struct StaticJwkProvider {
    snapshot: KeySnapshot,
}

impl StaticJwkProvider {
    /// Index the public keys of `jwks`
    #[must_use]
    pub fn new(jwks: Vec<Jwk>) -> Self {
        Self {
            snapshot: KeySnapshot::from_jwks(jwks, None),
        }
    }

    /// Parse a JWKS document.
    ///
    /// # Errors
    ///
    /// Fails when the JSON does not have the JWKS shape. Individual keys that
    /// do not convert are skipped, not reported.
    pub fn from_json(json: &str) -> ProviderResult<Self> {
        Ok(Self::from(JwkSet::from_json(json)?))
    }

    /// The indexed key set
    #[must_use]
    pub fn snapshot(&self) -> &KeySnapshot {
        &self.snapshot
    }
}

impl From<JwkSet> for StaticJwkProvider {
    fn from(set: JwkSet) -> Self {
        Self::new(set.keys)
    }
}

impl JwkProvider for StaticJwkProvider {
    fn find_key(&self, id: &str) -> Option<KeyMaterial> {
        self.snapshot.get(id).cloned()
    }

    fn list_keys(&self) -> Vec<KeyMaterial> {
        self.snapshot.keys().cloned().collect()
    }

    async fn refresh_keys(&self) -> ProviderResult<()> {
        Ok(())
    }
}
