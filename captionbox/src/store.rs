//! Mode-aware key/value cache.
//!
//! [`CacheStore`] reads its [`CacheConfig`] at the top of every operation and
//! either talks to the durable backend or does nothing. Backend failures are
//! logged and absorbed: `get` degrades to a miss and `set` to a no-op, so a
//! cache outage costs latency and never availability.
//!
//! The backend handle is opened lazily by the first durable-mode operation and
//! reused until [`CacheStore::shutdown`]. Changing the backend URL after that
//! only takes effect once the store has been shut down.

use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use captionbox_backend::{Backend, Connector};
use captionbox_core::CacheKey;
use captionbox_redis::RedisConnector;
use tracing::{debug, trace, warn};

use crate::config::{CacheConfig, CacheMode, ConfigSource, Environment};

/// Cache with TTL over an optional durable backend.
pub struct CacheStore {
    source: Arc<dyn ConfigSource>,
    connector: Arc<dyn Connector>,
    client: Mutex<Option<Arc<dyn Backend>>>,
}

impl CacheStore {
    /// Creates a store reading configuration from `source` and opening
    /// backends through `connector`. Nothing is opened until first use.
    pub fn new(source: Arc<dyn ConfigSource>, connector: Arc<dyn Connector>) -> Self {
        Self {
            source,
            connector,
            client: Mutex::new(None),
        }
    }

    /// Creates a store over the process environment and redis.
    pub fn from_env() -> Self {
        Self::new(Arc::new(Environment), Arc::new(RedisConnector))
    }

    /// Reads the current configuration.
    pub fn config(&self) -> CacheConfig {
        CacheConfig::load(self.source.as_ref())
    }

    /// Returns `true` while a backend handle is memoized.
    pub fn is_open(&self) -> bool {
        self.client
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .is_some()
    }

    /// Returns the cached value for `key`, or `None` when missing, when the
    /// cache is off or when the backend fails.
    pub async fn get(&self, key: &CacheKey) -> Option<String> {
        let config = self.config();
        let client = self.client(&config)?;
        match client.read(key).await {
            Ok(value) => {
                debug!(key = %key, hit = value.is_some(), backend = client.name(), "Cache read");
                value
            }
            Err(error) => {
                warn!(key = %key, error = %error, "Cache get error");
                None
            }
        }
    }

    /// Stores `value` under `key` for `ttl`, floored to whole seconds and at
    /// least one. Does nothing when the cache is off; failures are logged.
    pub async fn set(&self, key: &CacheKey, value: &str, ttl: Duration) {
        let config = self.config();
        let Some(client) = self.client(&config) else {
            return;
        };
        let ttl = Duration::from_secs(ttl.as_secs().max(1));
        match client.write(key, value, ttl).await {
            Ok(()) => debug!(key = %key, ttl = ttl.as_secs(), "Cache write"),
            Err(error) => warn!(key = %key, error = %error, "Cache set error"),
        }
    }

    /// Closes and forgets the backend handle, if one was opened.
    ///
    /// Idempotent. A later durable-mode operation opens a new handle.
    pub async fn shutdown(&self) {
        let client = self
            .client
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(client) = client {
            trace!(backend = client.name(), "Close cache backend");
            if let Err(error) = client.close().await {
                warn!(error = %error, "Cache close error");
            }
        }
    }

    fn client(&self, config: &CacheConfig) -> Option<Arc<dyn Backend>> {
        if config.mode != CacheMode::Redis {
            return None;
        }
        let mut slot = self.client.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(client) = slot.as_ref() {
            return Some(client.clone());
        }
        let Some(url) = config.backend_url.as_deref() else {
            warn!("CACHE_MODE=redis but CACHE_BACKEND_URL is not set; cache disabled.");
            return None;
        };
        match self.connector.connect(url) {
            Ok(client) => {
                trace!(backend = client.name(), "Open cache backend");
                *slot = Some(client.clone());
                Some(client)
            }
            Err(error) => {
                warn!(error = %error, "Cache backend unavailable; cache disabled.");
                None
            }
        }
    }
}

impl Default for CacheStore {
    fn default() -> Self {
        Self::from_env()
    }
}
