//! Key sets fetched over HTTP

use std::sync::{Arc, Weak};
use std::time::Duration;

use arc_swap::ArcSwap;
use chrono::{DateTime, Utc};
use jwtv::{Jwk, JwkSet, KeyMaterial};
use reqwest::Client;
use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior};

use crate::JwkProvider;
use crate::error::{ProviderError, ProviderResult};
use crate::options::RemoteJwkProviderOptions;
use crate::snapshot::KeySnapshot;

/// Turns a response body into JWK records
pub type KeySetDecoder = Arc<dyn Fn(&[u8]) -> ProviderResult<Vec<Jwk>> + Send + Sync>;

/// Decode a standard `{"keys": [...]}` document.
///
/// # Errors
///
/// Returns [`ProviderError::Decode`] when the body is not a JWKS document.
pub fn decode_jwks(body: &[u8]) -> ProviderResult<Vec<Jwk>> {
    let set: JwkSet = serde_json::from_slice(body)?;
    Ok(set.keys)
}

/// Provider whose keys come from `fetch_url`.
///
/// Each successful [`refresh_keys`](JwkProvider::refresh_keys) publishes a
/// complete new [`KeySnapshot`]; lookups read whichever snapshot is current
/// and never wait on a fetch in progress. A failed refresh leaves the current
/// snapshot in place.
pub struct RemoteJwkProvider {
    options: RemoteJwkProviderOptions,
    client: Client,
    decoder: KeySetDecoder,
    snapshot: ArcSwap<KeySnapshot>,
}

impl std::fmt::Debug for RemoteJwkProvider {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RemoteJwkProvider")
            .field("options", &self.options)
            .field("keys", &self.snapshot.load().len())
            .finish_non_exhaustive()
    }
}

impl RemoteJwkProvider {
    /// Provider decoding standard JWKS documents. Nothing is fetched yet.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the HTTP client cannot be built.
    pub fn new(options: RemoteJwkProviderOptions) -> ProviderResult<Self> {
        Self::with_decoder(options, decode_jwks)
    }

    /// Provider with a custom body decoder, for endpoints that do not serve
    /// plain JWKS documents.
    ///
    /// # Errors
    ///
    /// Returns [`ProviderError::Http`] if the HTTP client cannot be built.
    pub fn with_decoder<F>(options: RemoteJwkProviderOptions, decoder: F) -> ProviderResult<Self>
    where
        F: Fn(&[u8]) -> ProviderResult<Vec<Jwk>> + Send + Sync + 'static,
    {
        let client = Client::builder()
            .timeout(options.http_timeout)
            .user_agent(concat!("jwtv/", env!("CARGO_PKG_VERSION")))
            .build()
            .map_err(|e| ProviderError::http(&options.fetch_url, e))?;
        Ok(Self {
            options,
            client,
            decoder: Arc::new(decoder),
            snapshot: ArcSwap::from_pointee(KeySnapshot::default()),
        })
    }

    /// Active options
    pub fn options(&self) -> &RemoteJwkProviderOptions {
        &self.options
    }

    /// Current snapshot
    pub fn snapshot(&self) -> Arc<KeySnapshot> {
        self.snapshot.load_full()
    }

    /// Time of the last successful refresh
    pub fn last_fetched(&self) -> Option<DateTime<Utc>> {
        self.snapshot.load().fetched_at()
    }

    /// Fetch and decode the key set without publishing it.
    ///
    /// # Errors
    ///
    /// [`ProviderError::Http`] for transport failures and timeouts,
    /// [`ProviderError::HttpStatus`] for a status of 300 or above and
    /// [`ProviderError::Decode`] when the decoder rejects the body.
    pub async fn fetch(&self) -> ProviderResult<KeySnapshot> {
        let url = &self.options.fetch_url;
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| ProviderError::http(url, e))?;

        let status = response.status().as_u16();
        if status >= 300 {
            return Err(ProviderError::HttpStatus {
                url: url.clone(),
                status,
            });
        }

        let body = response.bytes().await.map_err(|e| ProviderError::http(url, e))?;
        let jwks = (self.decoder)(&body)?;
        let snapshot = KeySnapshot::from_jwks(jwks, Some(Utc::now()));
        tracing::debug!(url = %url, keys = snapshot.len(), records = snapshot.jwks().len(), "fetched key set");
        Ok(snapshot)
    }

    /// Refresh every `fetch_interval` on the current Tokio runtime.
    ///
    /// The first refresh happens one interval from now. Failures are logged
    /// and the loop carries on. The task stops when the returned handle is
    /// dropped or the provider is. Returns `None` when the interval is zero.
    ///
    /// # Panics
    ///
    /// Panics when called outside a Tokio runtime.
    #[must_use = "dropping the handle stops the refresh task"]
    pub fn spawn_refresh(self: &Arc<Self>) -> Option<RefreshHandle> {
        let period = self.options.fetch_interval;
        if period.is_zero() {
            return None;
        }
        let provider = Arc::downgrade(self);
        let task = tokio::spawn(refresh_loop(provider, period));
        Some(RefreshHandle { task })
    }
}

async fn refresh_loop(provider: Weak<RemoteJwkProvider>, period: Duration) {
    let mut ticker = tokio::time::interval_at(Instant::now() + period, period);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
    loop {
        ticker.tick().await;
        let Some(provider) = provider.upgrade() else {
            tracing::debug!("provider dropped, stopping key refresh");
            return;
        };
        if let Err(error) = provider.refresh_keys().await {
            tracing::warn!(url = %provider.options.fetch_url, %error, "background key refresh failed");
        }
    }
}

impl JwkProvider for RemoteJwkProvider {
    fn find_key(&self, id: &str) -> Option<KeyMaterial> {
        self.snapshot.load().get(id).cloned()
    }

    fn list_keys(&self) -> Vec<KeyMaterial> {
        self.snapshot.load().keys().cloned().collect()
    }

    async fn refresh_keys(&self) -> ProviderResult<()> {
        let snapshot = self.fetch().await?;
        self.snapshot.store(Arc::new(snapshot));
        Ok(())
    }
}

/// Background refresh task; dropping it aborts the task
#[derive(Debug)]
pub struct RefreshHandle {
    task: JoinHandle<()>,
}

impl RefreshHandle {
    /// True once the task has exited
    pub fn is_finished(&self) -> bool {
        self.task.is_finished()
    }
}

impl Drop for RefreshHandle {
    fn drop(&mut self) {
        self.task.abort();
    }
}
