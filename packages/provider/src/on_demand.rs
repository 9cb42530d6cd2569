//! Key sets refreshed only when a caller asks

use std::sync::Arc;

use chrono::{DateTime, Utc};
use jwtv::{Jwk, KeyMaterial};

use crate::JwkProvider;
use crate::error::ProviderResult;
use crate::options::OnDemandJwkProviderOptions;
use crate::remote::RemoteJwkProvider;
use crate::snapshot::KeySnapshot;

/// Remote provider without a background task.
///
/// Suited to processes that only run while serving a request: callers check
/// [`is_expired`](Self::is_expired) and refresh before looking keys up, or
/// use [`find_key_refreshing`](Self::find_key_refreshing) to do both.
#[derive(Debug)]
pub struct OnDemandJwkProvider {
    remote: RemoteJwkProvider,
}

impl OnDemandJwkProvider {
    /// Provider decoding standard JWKS documents
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`](crate::ProviderError::Http) if the HTTP
    /// client cannot be built.
    pub fn new(options: OnDemandJwkProviderOptions) -> ProviderResult<Self> {
        RemoteJwkProvider::new(options).map(|remote| Self { remote })
    }

    /// Provider with a custom body decoder
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`](crate::ProviderError::Http) if the HTTP
    /// client cannot be built.
    pub fn with_decoder<F>(options: OnDemandJwkProviderOptions, decoder: F) -> ProviderResult<Self>
    where
        F: Fn(&[u8]) -> ProviderResult<Vec<Jwk>> + Send + Sync + 'static,
    {
        RemoteJwkProvider::with_decoder(options, decoder).map(|remote| Self { remote })
    }

    /// True when nothing has been fetched or the last fetch is older than
    /// `fetch_interval`
    pub fn is_expired(&self) -> bool {
        self.is_expired_at(Utc::now())
    }

    /// [`is_expired`](Self::is_expired) against an explicit instant
    pub fn is_expired_at(&self, now: DateTime<Utc>) -> bool {
        let Some(fetched) = self.remote.last_fetched() else {
            return true;
        };
        let interval = chrono::Duration::from_std(self.remote.options().fetch_interval)
            .unwrap_or(chrono::Duration::MAX);
        fetched
            .checked_add_signed(interval)
            .is_some_and(|stale_at| stale_at < now)
    }

    /// Refresh when expired, then look `id` up.
    ///
    /// # Errors
    ///
    /// Propagates the refresh error; the previous snapshot stays in place.
    pub async fn find_key_refreshing(&self, id: &str) -> ProviderResult<Option<KeyMaterial>> {
        if self.is_expired() {
            self.refresh_keys().await?;
        }
        Ok(self.find_key(id))
    }

    /// Current snapshot
    pub fn snapshot(&self) -> Arc<KeySnapshot> {
        self.remote.snapshot()
    }

    /// Underlying remote provider
    pub fn remote(&self) -> &RemoteJwkProvider {
        &self.remote
    }
}

impl JwkProvider for OnDemandJwkProvider {
    fn find_key(&self, id: &str) -> Option<KeyMaterial> {
        self.remote.find_key(id)
    }

    fn list_keys(&self) -> Vec<KeyMaterial> {
        self.remote.list_keys()
    }

    async fn refresh_keys(&self) -> ProviderResult<()> {
        self.remote.refresh_keys().await
    }
}
