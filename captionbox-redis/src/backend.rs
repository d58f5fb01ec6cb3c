//! Redis backend implementation.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use captionbox_backend::{Backend, BackendError, BackendResult, Connector};
use captionbox_core::CacheKey;
use redis::{Client, aio::ConnectionManager};
use smol_str::SmolStr;
use tokio::sync::Mutex;
use tracing::trace;

use crate::error::Error;

/// Redis cache backend based on redis-rs crate.
///
/// It uses a [`ConnectionManager`] for asynchronous network interaction,
/// created on the first operation and reused by every later one. Clones share
/// the same manager. [`Backend::close`] releases it; commands already in
/// flight keep their own handle and finish first.
///
/// [`ConnectionManager`]: redis::aio::ConnectionManager
#[derive(Clone)]
pub struct RedisBackend {
    client: Client,
    connection: Arc<Mutex<Option<ConnectionManager>>>,
    name: SmolStr,
}

impl RedisBackend {
    /// Creates new RedisBackend builder with default settings.
    #[must_use]
    pub fn builder() -> RedisBackendBuilder {
        RedisBackendBuilder::default()
    }

    /// Create lazy connection to redis via [`ConnectionManager`]
    pub async fn connection(&self) -> Result<ConnectionManager, BackendError> {
        trace!("Get connection manager");
        let mut slot = self.connection.lock().await;
        if let Some(manager) = slot.as_ref() {
            return Ok(manager.clone());
        }
        trace!("Initialize new redis connection manager");
        let manager = self
            .client
            .get_connection_manager()
            .await
            .map_err(Error::from)?;
        *slot = Some(manager.clone());
        Ok(manager)
    }

    /// Returns `true` while an opened connection is held.
    ///
    /// Reports `false` while another task is opening or closing it.
    pub fn is_connected(&self) -> bool {
        self.connection
            .try_lock()
            .is_ok_and(|slot| slot.is_some())
    }
}

/// Part of builder pattern implementation for RedisBackend.
pub struct RedisBackendBuilder {
    connection_info: String,
    name: SmolStr,
}

impl Default for RedisBackendBuilder {
    fn default() -> Self {
        Self {
            connection_info: "redis://127.0.0.1/".to_owned(),
            name: SmolStr::new_static("redis"),
        }
    }
}

impl RedisBackendBuilder {
    /// Set connection info (host, port, database, etc.) for RedisBackend.
    pub fn server(mut self, connection_info: impl Into<String>) -> Self {
        self.connection_info = connection_info.into();
        self
    }

    /// Set a custom name for this backend, used in logs.
    pub fn name(mut self, name: impl Into<SmolStr>) -> Self {
        self.name = name.into();
        self
    }

    /// Create new instance of Redis backend with passed settings.
    ///
    /// Only the connection URL is validated here; no network I/O happens
    /// until the first read or write.
    pub fn build(self) -> Result<RedisBackend, Error> {
        Ok(RedisBackend {
            client: Client::open(self.connection_info)?,
            connection: Arc::new(Mutex::new(None)),
            name: self.name,
        })
    }
}

#[async_trait]
impl Backend for RedisBackend {
    async fn read(&self, key: &CacheKey) -> BackendResult<Option<String>> {
        let mut con = self.connection().await?;
        let cache_key = key.to_string();

        let value: Option<String> = redis::cmd("GET")
            .arg(&cache_key)
            .query_async(&mut con)
            .await
            .map_err(Error::from)?;
        Ok(value)
    }

    async fn write(&self, key: &CacheKey, value: &str, ttl: Duration) -> BackendResult<()> {
        let mut con = self.connection().await?;
        let cache_key = key.to_string();

        // EX rejects zero, so sub-second TTLs round up to one second.
        redis::cmd("SET")
            .arg(&cache_key)
            .arg(value)
            .arg("EX")
            .arg(ttl.as_secs().max(1))
            .query_async::<()>(&mut con)
            .await
            .map_err(Error::from)?;
        Ok(())
    }

    async fn close(&self) -> BackendResult<()> {
        if self.connection.lock().await.take().is_some() {
            trace!(backend = %self.name, "Release redis connection manager");
        }
        Ok(())
    }

    fn name(&self) -> &str {
        &self.name
    }
}

/// Opens [`RedisBackend`] handles from `redis://` URLs.
#[derive(Debug, Clone, Copy, Default)]
pub struct RedisConnector;

impl Connector for RedisConnector {
    fn connect(&self, url: &str) -> BackendResult<Arc<dyn Backend>> {
        trace!(url, "Open redis backend");
        let backend = RedisBackend::builder().server(url).build()?;
        Ok(Arc::new(backend))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_does_not_connect() {
        let backend = RedisBackend::builder()
            .server("redis://127.0.0.1:6379/0")
            .build()
            .unwrap();
        assert!(!backend.is_connected());
        assert_eq!(backend.name(), "redis");
    }

    #[test]
    fn test_invalid_url_is_rejected() {
        let result = RedisBackend::builder().server("not-a-valid-url").build();
        assert!(matches!(result, Err(Error::Redis(_))));
    }

    #[test]
    fn test_custom_name() {
        let backend = RedisBackend::builder().name("subtitles").build().unwrap();
        assert_eq!(backend.name(), "subtitles");
    }

    #[tokio::test]
    async fn test_close_without_connection() {
        let backend = RedisBackend::builder().build().unwrap();
        let clone = backend.clone();

        backend.close().await.unwrap();
        backend.close().await.unwrap();
        assert!(!backend.is_connected());
        assert!(!clone.is_connected());
    }

    #[tokio::test]
    async fn test_close_releases_shared_slot() {
        let backend = RedisBackend::builder().build().unwrap();
        let clone = backend.clone();
        assert!(Arc::ptr_eq(&backend.connection, &clone.connection));

        clone.close().await.unwrap();
        assert!(backend.connection.lock().await.is_none());
    }

    #[test]
    fn test_connector() {
        assert!(RedisConnector.connect("redis://localhost:6379").is_ok());
        assert!(RedisConnector.connect("http://localhost").is_err());
    }
}
