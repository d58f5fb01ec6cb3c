//! Cache configuration derived from environment-style key/value settings.
//!
//! Configuration is read afresh on every cache operation, so flipping
//! `CACHE_MODE` takes effect without a restart.
//!
//! | key | default | meaning |
//! |-----|---------|---------|
//! | `CACHE_MODE` | `off` | `redis` enables the durable backend; anything else is `off` |
//! | `CACHE_BACKEND_URL` | unset | backend URL (`CACHE_REDIS_URL` is accepted as an alias) |
//! | `CACHE_TTL_SUBTITLES_SECONDS` | `604800` | TTL of subtitle payloads |
//! | `CACHE_TTL_METADATA_SECONDS` | `3600` | TTL of video info and chapters |

use std::collections::HashMap;
use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Default TTL of subtitle payloads (7 days).
pub const DEFAULT_TTL_SUBTITLES_SECONDS: i64 = 604_800;
/// Default TTL of video metadata (1 hour).
pub const DEFAULT_TTL_METADATA_SECONDS: i64 = 3_600;

pub const CACHE_MODE: &str = "CACHE_MODE";
pub const CACHE_BACKEND_URL: &str = "CACHE_BACKEND_URL";
pub const CACHE_REDIS_URL: &str = "CACHE_REDIS_URL";
pub const CACHE_TTL_SUBTITLES_SECONDS: &str = "CACHE_TTL_SUBTITLES_SECONDS";
pub const CACHE_TTL_METADATA_SECONDS: &str = "CACHE_TTL_METADATA_SECONDS";

/// A source of configuration values.
pub trait ConfigSource: Send + Sync {
    /// Returns the raw value of `name`, if set.
    fn var(&self, name: &str) -> Option<String>;
}

/// The process environment.
#[derive(Debug, Clone, Copy, Default)]
pub struct Environment;

impl ConfigSource for Environment {
    fn var(&self, name: &str) -> Option<String> {
        std::env::var(name).ok()
    }
}

impl ConfigSource for HashMap<String, String> {
    fn var(&self, name: &str) -> Option<String> {
        self.get(name).cloned()
    }
}

/// Whether the cache uses a durable backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CacheMode {
    /// No caching; every operation is a miss or a no-op.
    #[default]
    Off,
    /// Redis-backed caching.
    Redis,
}

impl CacheMode {
    fn parse(raw: Option<&str>) -> Self {
        match raw.map(|value| value.trim().to_ascii_lowercase()).as_deref() {
            Some("redis") => CacheMode::Redis,
            _ => CacheMode::Off,
        }
    }
}

/// Cache configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheConfig {
    pub mode: CacheMode,
    pub backend_url: Option<String>,
    pub ttl_subtitles_seconds: i64,
    pub ttl_metadata_seconds: i64,
}

impl Default for CacheConfig {
    fn default() -> Self {
        Self {
            mode: CacheMode::Off,
            backend_url: None,
            ttl_subtitles_seconds: DEFAULT_TTL_SUBTITLES_SECONDS,
            ttl_metadata_seconds: DEFAULT_TTL_METADATA_SECONDS,
        }
    }
}

impl CacheConfig {
    /// Reads the configuration from `source`.
    ///
    /// Never fails: unknown modes resolve to [`CacheMode::Off`] and TTL
    /// overrides without a leading integer fall back to their defaults.
    pub fn load(source: &dyn ConfigSource) -> Self {
        let backend_url = source
            .var(CACHE_BACKEND_URL)
            .or_else(|| source.var(CACHE_REDIS_URL))
            .map(|url| url.trim().to_owned())
            .filter(|url| !url.is_empty());

        Self {
            mode: CacheMode::parse(source.var(CACHE_MODE).as_deref()),
            backend_url,
            ttl_subtitles_seconds: source
                .var(CACHE_TTL_SUBTITLES_SECONDS)
                .as_deref()
                .and_then(leading_integer)
                .unwrap_or(DEFAULT_TTL_SUBTITLES_SECONDS),
            ttl_metadata_seconds: source
                .var(CACHE_TTL_METADATA_SECONDS)
                .as_deref()
                .and_then(leading_integer)
                .unwrap_or(DEFAULT_TTL_METADATA_SECONDS),
        }
    }

    /// Reads the configuration from the process environment.
    pub fn from_env() -> Self {
        Self::load(&Environment)
    }

    /// TTL for subtitle payloads, at least one second.
    pub fn ttl_subtitles(&self) -> Duration {
        positive_seconds(self.ttl_subtitles_seconds)
    }

    /// TTL for video metadata, at least one second.
    pub fn ttl_metadata(&self) -> Duration {
        positive_seconds(self.ttl_metadata_seconds)
    }
}

fn positive_seconds(seconds: i64) -> Duration {
    Duration::from_secs(seconds.max(1).unsigned_abs())
}

/// Parses the integer at the start of `raw` the way `parseInt(raw, 10)` does:
/// `"86400"`, `" 60s"` and `"1.5"` give 86400, 60 and 1; `"abc"` and `""` give nothing.
fn leading_integer(raw: &str) -> Option<i64> {
    let trimmed = raw.trim_start();
    let digits_from = usize::from(trimmed.starts_with(['+', '-']));
    let digits_len = trimmed[digits_from..]
        .bytes()
        .take_while(u8::is_ascii_digit)
        .count();
    if digits_len == 0 {
        return None;
    }
    trimmed[..digits_from + digits_len].parse().ok()
}
