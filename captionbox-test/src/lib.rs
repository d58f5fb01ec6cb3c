//! Test doubles for the captionbox integration suites.
//!
//! - [`MockBackend`](mock_backend::MockBackend): DashMap-backed durable
//!   backend with operation counters, plus [`ErrorBackend`](mock_backend::ErrorBackend)
//!   and the connectors that hand them to a `CacheStore`.
//! - [`MockSource`](mock_source::MockSource): scripted caption source that
//!   records every call.
//! - [`tracing`]: capture of warning events.

pub mod mock_backend;
pub mod mock_source;
pub mod tracing;

use std::collections::HashMap;
use std::sync::Arc;

use captionbox::ConfigSource;

/// A configuration source from literal pairs.
pub fn env(pairs: &[(&str, &str)]) -> Arc<dyn ConfigSource> {
    Arc::new(
        pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect::<HashMap<_, _>>(),
    )
}

/// Configuration with the redis mode on and a backend URL set.
pub fn durable_env() -> Arc<dyn ConfigSource> {
    env(&[
        ("CACHE_MODE", "redis"),
        ("CACHE_BACKEND_URL", "redis://cache.test:6379"),
    ])
}
