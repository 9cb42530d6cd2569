//! JSON Web Key set providers for [`jwtv`].
//!
//! A provider maps key ids to public [`KeyMaterial`] so verification code can
//! pick the key a token's `kid` names, or try every key when there is none.
//!
//! - [`StaticJwkProvider`]: a key set fixed by configuration
//! - [`RemoteJwkProvider`]: a key set fetched over HTTP, optionally refreshed
//!   on an interval by a background task
//! - [`OnDemandJwkProvider`]: a remote key set refreshed only when stale
//!
//! ```no_run
//! use jwtv::{Jwt, TokenOptions};
//! use jwtv_provider::{JwkProvider, OnDemandJwkProvider, RemoteJwkProviderOptions};
//!
//! # async fn verify(compact: &str) -> Result<(), Box<dyn std::error::Error>> {
//! let provider = OnDemandJwkProvider::new(
//!     RemoteJwkProviderOptions::new("https://example.com/.well-known/jwks.json")
//!         .with_fetch_interval(std::time::Duration::from_secs(3600)),
//! )?;
//! let token = Jwt::from_compact_string(compact, TokenOptions::default())?;
//! match provider.find_key_refreshing(token.header().kid()).await? {
//!     Some(key) => token.verify([&key])?,
//!     None => token.verify(&provider.list_keys())?,
//! }
//! # Ok(())
//! # }
//! ```

mod error;
mod on_demand;
mod options;
mod remote;
mod snapshot;
mod static_provider;

use std::future::Future;

use jwtv::KeyMaterial;

pub use error::{ProviderError, ProviderResult};
pub use on_demand::OnDemandJwkProvider;
pub use options::{DEFAULT_HTTP_TIMEOUT, OnDemandJwkProviderOptions, RemoteJwkProviderOptions};
pub use remote::{KeySetDecoder, RefreshHandle, RemoteJwkProvider, decode_jwks};
pub use snapshot::KeySnapshot;
pub use static_provider::StaticJwkProvider;

/// Source of public keys indexed by key id
pub trait JwkProvider: Send + Sync {
    /// Key stored under `id`
    fn find_key(&self, id: &str) -> Option<KeyMaterial>;

    /// Every usable key, in key-set order
    fn list_keys(&self) -> Vec<KeyMaterial>;

    /// Replace the key set with a fresh copy from its source
    fn refresh_keys(&self) -> impl Future<Output = ProviderResult<()>> + Send;
}
