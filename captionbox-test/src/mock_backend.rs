use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use captionbox_backend::{Backend, BackendError, BackendResult, Connector};
use captionbox_core::CacheKey;
use dashmap::DashMap;

#[derive(Debug, Default)]
pub struct BackendCounters {
    pub read_count: AtomicUsize,
    pub read_hit_count: AtomicUsize,
    pub read_miss_count: AtomicUsize,
    pub write_count: AtomicUsize,
    pub close_count: AtomicUsize,
}

impl BackendCounters {
    pub fn read_count(&self) -> usize {
        self.read_count.load(Ordering::SeqCst)
    }

    pub fn read_hit_count(&self) -> usize {
        self.read_hit_count.load(Ordering::SeqCst)
    }

    pub fn read_miss_count(&self) -> usize {
        self.read_miss_count.load(Ordering::SeqCst)
    }

    pub fn write_count(&self) -> usize {
        self.write_count.load(Ordering::SeqCst)
    }

    pub fn close_count(&self) -> usize {
        self.close_count.load(Ordering::SeqCst)
    }

    pub fn reset(&self) {
        self.read_count.store(0, Ordering::SeqCst);
        self.read_hit_count.store(0, Ordering::SeqCst);
        self.read_miss_count.store(0, Ordering::SeqCst);
        self.write_count.store(0, Ordering::SeqCst);
        self.close_count.store(0, Ordering::SeqCst);
    }
}

/// A stored value and the TTL it was written with.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StoredEntry {
    pub value: String,
    pub ttl: Duration,
}

/// In-memory durable backend. Clones share storage and counters.
#[derive(Clone, Debug)]
pub struct MockBackend {
    pub cache: Arc<DashMap<String, StoredEntry>>,
    pub counters: Arc<BackendCounters>,
}

impl Default for MockBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl MockBackend {
    pub fn new() -> Self {
        Self {
            cache: Arc::new(DashMap::new()),
            counters: Arc::new(BackendCounters::default()),
        }
    }

    pub fn read_count(&self) -> usize {
        self.counters.read_count()
    }

    pub fn read_hit_count(&self) -> usize {
        self.counters.read_hit_count()
    }

    pub fn read_miss_count(&self) -> usize {
        self.counters.read_miss_count()
    }

    pub fn write_count(&self) -> usize {
        self.counters.write_count()
    }

    pub fn close_count(&self) -> usize {
        self.counters.close_count()
    }

    pub fn reset_counters(&self) {
        self.counters.reset();
    }

    pub fn cache_entry_count(&self) -> usize {
        self.cache.len()
    }

    /// Returns the entry stored under the rendered `key`.
    pub fn entry(&self, key: &str) -> Option<StoredEntry> {
        self.cache.get(key).map(|e| e.value().clone())
    }

    /// Seeds an entry without touching the counters.
    pub fn insert(&self, key: &str, value: &str, ttl: Duration) {
        self.cache.insert(
            key.to_owned(),
            StoredEntry {
                value: value.to_owned(),
                ttl,
            },
        );
    }
}

#[async_trait]
impl Backend for MockBackend {
    async fn read(&self, key: &CacheKey) -> BackendResult<Option<String>> {
        self.counters.read_count.fetch_add(1, Ordering::SeqCst);
        let result = self.cache.get(&key.to_string()).map(|v| v.value.clone());
        if result.is_some() {
            self.counters.read_hit_count.fetch_add(1, Ordering::SeqCst);
        } else {
            self.counters.read_miss_count.fetch_add(1, Ordering::SeqCst);
        }
        Ok(result)
    }

    async fn write(&self, key: &CacheKey, value: &str, ttl: Duration) -> BackendResult<()> {
        self.counters.write_count.fetch_add(1, Ordering::SeqCst);
        self.insert(&key.to_string(), value, ttl);
        Ok(())
    }

    async fn close(&self) -> BackendResult<()> {
        self.counters.close_count.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }

    fn name(&self) -> &str {
        "mock"
    }
}

/// Backend whose every operation fails with a connection error.
#[derive(Clone, Debug, Default)]
pub struct ErrorBackend {
    pub counters: Arc<BackendCounters>,
}

#[async_trait]
impl Backend for ErrorBackend {
    async fn read(&self, _key: &CacheKey) -> BackendResult<Option<String>> {
        self.counters.read_count.fetch_add(1, Ordering::SeqCst);
        Err(BackendError::ConnectionError("connection refused".into()))
    }

    async fn write(&self, _key: &CacheKey, _value: &str, _ttl: Duration) -> BackendResult<()> {
        self.counters.write_count.fetch_add(1, Ordering::SeqCst);
        Err(BackendError::ConnectionError("connection refused".into()))
    }

    fn name(&self) -> &str {
        "error"
    }
}

/// Connector handing out one shared backend and counting how often it was asked.
pub struct MockConnector {
    backend: Arc<dyn Backend>,
    connects: AtomicUsize,
    urls: std::sync::Mutex<Vec<String>>,
}

impl MockConnector {
    pub fn new(backend: impl Backend + 'static) -> Arc<Self> {
        Arc::new(Self {
            backend: Arc::new(backend),
            connects: AtomicUsize::new(0),
            urls: std::sync::Mutex::new(Vec::new()),
        })
    }

    pub fn connect_count(&self) -> usize {
        self.connects.load(Ordering::SeqCst)
    }

    /// URLs passed to every `connect` call, in order.
    pub fn urls(&self) -> Vec<String> {
        self.urls.lock().unwrap().clone()
    }
}

impl Connector for MockConnector {
    fn connect(&self, url: &str) -> BackendResult<Arc<dyn Backend>> {
        self.connects.fetch_add(1, Ordering::SeqCst);
        self.urls.lock().unwrap().push(url.to_owned());
        Ok(self.backend.clone())
    }
}

/// Connector that rejects every URL.
#[derive(Debug, Default)]
pub struct RefusingConnector;

impl Connector for RefusingConnector {
    fn connect(&self, url: &str) -> BackendResult<Arc<dyn Backend>> {
        Err(BackendError::InternalError(
            format!("unsupported backend url {url}").into(),
        ))
    }
}
