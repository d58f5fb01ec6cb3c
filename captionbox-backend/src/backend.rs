use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use captionbox_core::CacheKey;

use crate::BackendError;

pub type BackendResult<T> = Result<T, BackendError>;

/// Open handle to a durable key/value store with TTL-based expiry.
///
/// Expiry is enforced by the store: a key read after its TTL elapsed is
/// simply absent.
#[async_trait]
pub trait Backend: Sync + Send {
    async fn read(&self, key: &CacheKey) -> BackendResult<Option<String>>;

    async fn write(&self, key: &CacheKey, value: &str, ttl: Duration) -> BackendResult<()>;

    /// Releases the underlying connection.
    ///
    /// Called once when the owner drops the handle. The default does nothing,
    /// for stores whose connection closes on drop.
    async fn close(&self) -> BackendResult<()> {
        Ok(())
    }

    /// Returns the name of this backend for logs.
    fn name(&self) -> &str {
        "backend"
    }
}

#[async_trait]
impl Backend for Arc<dyn Backend> {
    async fn read(&self, key: &CacheKey) -> BackendResult<Option<String>> {
        (**self).read(key).await
    }

    async fn write(&self, key: &CacheKey, value: &str, ttl: Duration) -> BackendResult<()> {
        (**self).write(key, value, ttl).await
    }

    async fn close(&self) -> BackendResult<()> {
        (**self).close().await
    }

    fn name(&self) -> &str {
        (**self).name()
    }
}

/// Opens backend handles from a backend URL.
///
/// Opening must not perform network I/O: the connection itself is
/// established lazily by the handle on its first operation.
pub trait Connector: Sync + Send {
    fn connect(&self, url: &str) -> BackendResult<Arc<dyn Backend>>;
}

impl<F> Connector for F
where
    F: Fn(&str) -> BackendResult<Arc<dyn Backend>> + Sync + Send,
{
    fn connect(&self, url: &str) -> BackendResult<Arc<dyn Backend>> {
        self(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dashmap::DashMap;

    #[derive(Default)]
    struct MapBackend {
        store: DashMap<CacheKey, String>,
    }

    #[async_trait]
    impl Backend for MapBackend {
        async fn read(&self, key: &CacheKey) -> BackendResult<Option<String>> {
            Ok(self.store.get(key).map(|v| v.clone()))
        }

        async fn write(&self, key: &CacheKey, value: &str, _ttl: Duration) -> BackendResult<()> {
            self.store.insert(key.clone(), value.to_owned());
            Ok(())
        }
    }

    #[tokio::test]
    async fn test_arc_dyn_backend_delegates() {
        let backend: Arc<dyn Backend> = Arc::new(MapBackend::default());
        let key = CacheKey::from_str("k", "1");

        backend.write(&key, "value", Duration::from_secs(1)).await.unwrap();
        assert_eq!(backend.read(&key).await.unwrap().as_deref(), Some("value"));
        assert_eq!(backend.name(), "backend");
        backend.close().await.unwrap();
    }

    #[test]
    fn test_closure_connector() {
        let connector = |_url: &str| -> BackendResult<Arc<dyn Backend>> {
            Ok(Arc::new(MapBackend::default()))
        };
        assert!(connector.connect("memory://").is_ok());
    }
}
