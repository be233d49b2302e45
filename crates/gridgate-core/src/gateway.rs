//! The gateway aggregate.
//!
//! [`Gateway`] owns the session pool and configuration and exposes the
//! bucket, object, listing, multipart and policy operations implemented in
//! the [`crate::ops`] submodules. It is generic over the backend session
//! type so the embedding server picks the concrete client.

use std::fmt;
use std::sync::Arc;

use crate::client::{GridConnector, GridSession};
use crate::config::GatewayConfig;
use crate::error::GatewayResult;
use crate::naming::{MULTIPART_COLLECTION, physical_object_name};
use crate::pool::{PooledSession, SessionPool};

/// Flat object-storage gateway over a hierarchical grid store.
pub struct Gateway<S> {
    pub(crate) pool: Arc<SessionPool<S>>,
    pub(crate) config: Arc<GatewayConfig>,
}

impl<S: GridSession> Gateway<S> {
    /// Connect the gateway: establish the full session pool eagerly.
    ///
    /// Fails without side effects if any session cannot be established.
    pub async fn connect<C>(connector: &C, config: GatewayConfig) -> GatewayResult<Self>
    where
        C: GridConnector<Session = S>,
    {
        let options = config.connect_options();
        let pool = SessionPool::connect(connector, &options, config.pool_size).await?;
        Ok(Self {
            pool,
            config: Arc::new(config),
        })
    }

    /// Returns a reference to the gateway configuration.
    #[must_use]
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Acquire a pooled session, waiting until one is free.
    pub(crate) async fn session(&self) -> PooledSession<S> {
        self.pool.acquire().await
    }

    /// Kick off a fire-and-forget refresh of every pooled session.
    pub(crate) fn spawn_refresh(&self) {
        self.pool.spawn_refresh();
    }

    // -----------------------------------------------------------------------
    // Path layout
    // -----------------------------------------------------------------------

    /// Backend path of a bucket's collection.
    pub(crate) fn bucket_path(&self, bucket: &str) -> String {
        format!("{}/{bucket}", self.config.mount)
    }

    /// Backend path of an object's physical data object.
    pub(crate) fn object_path(&self, bucket: &str, key: &str) -> String {
        format!(
            "{}/{bucket}/{}",
            self.config.mount,
            physical_object_name(key)
        )
    }

    /// Backend path of a bucket's multipart sub-collection.
    pub(crate) fn multipart_path(&self, bucket: &str) -> String {
        format!("{}/{bucket}/{MULTIPART_COLLECTION}", self.config.mount)
    }
}

impl<S> Clone for Gateway<S> {
    fn clone(&self) -> Self {
        Self {
            pool: Arc::clone(&self.pool),
            config: Arc::clone(&self.config),
        }
    }
}

impl<S> fmt::Debug for Gateway<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Gateway")
            .field("mount", &self.config.mount)
            .field("pool_size", &self.config.pool_size)
            .finish_non_exhaustive()
    }
}
