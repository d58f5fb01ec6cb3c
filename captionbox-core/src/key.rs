//! Cache key types and construction.
//!
//! Cache keys have three components:
//!
//! 1. **Prefix** - Namespace grouping related keys (`subtitles`, `video-info`)
//! 2. **Version** - Numeric version, bumped when the cached representation changes
//! 3. **Parts** - List of key-value pairs identifying the entry
//!
//! ## Format
//!
//! When serialized to string, keys follow this format:
//! `{prefix}:v{version}:key1=value1&key2=value2`
//!
//! - Prefix is omitted if empty
//! - Version is omitted if zero
//!
//! ```
//! use captionbox_core::{CacheKey, KeyPart};
//!
//! let key = CacheKey::new("subtitles", 1, vec![
//!     KeyPart::new("video", Some("dQw4w9WgXcQ")),
//!     KeyPart::new("type", Some("auto")),
//!     KeyPart::new("lang", Some("en")),
//! ]);
//! assert_eq!(key.to_string(), "subtitles:v1:video=dQw4w9WgXcQ&type=auto&lang=en");
//!
//! let key = CacheKey::new("", 0, vec![KeyPart::new("flag", None::<&str>)]);
//! assert_eq!(key.to_string(), "flag");
//! ```
//!
//! [`CacheKey`] uses `Arc` internally, so cloning a key only bumps a
//! reference count. [`KeyPart`] stores its strings in [`SmolStr`].

use smol_str::SmolStr;
use std::fmt;
use std::sync::Arc;

#[derive(Clone, Debug, Eq, PartialEq, Hash, serde::Serialize)]
struct CacheKeyInner {
    prefix: SmolStr,
    version: u32,
    parts: Vec<KeyPart>,
}

/// A cache key identifying one cached entry.
///
/// Equal inputs always produce equal keys, and equal keys always render to the
/// same string, which is what the durable backend actually stores under.
#[derive(Clone, Debug, serde::Serialize)]
#[serde(into = "CacheKeyInner")]
pub struct CacheKey {
    inner: Arc<CacheKeyInner>,
}

impl PartialEq for CacheKey {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner) || self.inner == other.inner
    }
}

impl Eq for CacheKey {}

impl std::hash::Hash for CacheKey {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.inner.hash(state);
    }
}

impl From<CacheKey> for CacheKeyInner {
    fn from(key: CacheKey) -> Self {
        Arc::try_unwrap(key.inner).unwrap_or_else(|arc| (*arc).clone())
    }
}

impl fmt::Display for CacheKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if !self.inner.prefix.is_empty() {
            write!(f, "{}:", self.inner.prefix)?;
        }
        if self.inner.version > 0 {
            write!(f, "v{}:", self.inner.version)?;
        }
        for (i, part) in self.inner.parts.iter().enumerate() {
            if i > 0 {
                write!(f, "&")?;
            }
            write!(f, "{}", part)?;
        }
        Ok(())
    }
}

impl CacheKey {
    /// Creates a new cache key with the given components.
    pub fn new(prefix: impl Into<SmolStr>, version: u32, parts: Vec<KeyPart>) -> Self {
        CacheKey {
            inner: Arc::new(CacheKeyInner {
                prefix: prefix.into(),
                version,
                parts,
            }),
        }
    }

    /// Creates a simple cache key with a single key-value part.
    ///
    /// The prefix is empty and version is 0.
    pub fn from_str(key: &str, value: &str) -> Self {
        Self::new(SmolStr::default(), 0, vec![KeyPart::new(key, Some(value))])
    }

    /// Returns an iterator over the key parts.
    pub fn parts(&self) -> impl Iterator<Item = &KeyPart> {
        self.inner.parts.iter()
    }

    /// Returns the cache key version number.
    pub fn version(&self) -> u32 {
        self.inner.version
    }

    /// Returns the cache key prefix.
    pub fn prefix(&self) -> &str {
        &self.inner.prefix
    }
}

/// A single component of a cache key.
///
/// The value is optional - some parts may be key-only (flags).
///
/// ```
/// use captionbox_core::KeyPart;
///
/// let lang = KeyPart::new("lang", Some("en"));
/// assert_eq!(lang.key(), "lang");
/// assert_eq!(lang.value(), Some("en"));
/// ```
#[derive(Clone, Debug, Eq, PartialEq, Hash, serde::Serialize, serde::Deserialize)]
pub struct KeyPart {
    key: SmolStr,
    value: Option<SmolStr>,
}

impl KeyPart {
    /// Creates a new key part.
    pub fn new<K: AsRef<str>, V: AsRef<str>>(key: K, value: Option<V>) -> Self {
        KeyPart {
            key: SmolStr::new(key),
            value: value.map(SmolStr::new),
        }
    }

    /// Returns the key name.
    pub fn key(&self) -> &str {
        &self.key
    }

    /// Returns the value, if any.
    pub fn value(&self) -> Option<&str> {
        self.value.as_deref()
    }
}

impl fmt::Display for KeyPart {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.key)?;
        if let Some(ref value) = self.value {
            write!(f, "={}", value)?;
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_display_omits_empty_prefix_and_zero_version() {
        let key = CacheKey::new("", 0, vec![KeyPart::new("id", Some("42"))]);
        assert_eq!(key.to_string(), "id=42");

        let key = CacheKey::new("cache", 0, vec![KeyPart::new("id", Some("42"))]);
        assert_eq!(key.to_string(), "cache:id=42");

        let key = CacheKey::new("", 2, vec![KeyPart::new("id", Some("42"))]);
        assert_eq!(key.to_string(), "v2:id=42");
    }

    #[test]
    fn test_equal_parts_make_equal_keys() {
        let a = CacheKey::new("subtitles", 1, vec![KeyPart::new("video", Some("abc"))]);
        let b = CacheKey::new("subtitles", 1, vec![KeyPart::new("video", Some("abc"))]);
        assert_eq!(a, b);
        assert_eq!(a.clone(), b);
    }

    #[test]
    fn test_version_changes_key() {
        let a = CacheKey::new("subtitles", 1, vec![KeyPart::new("video", Some("abc"))]);
        let b = CacheKey::new("subtitles", 2, vec![KeyPart::new("video", Some("abc"))]);
        assert_ne!(a, b);
        assert_ne!(a.to_string(), b.to_string());
    }

    #[test]
    fn test_from_str() {
        let key = CacheKey::from_str("any", "key");
        assert_eq!(key.prefix(), "");
        assert_eq!(key.version(), 0);
        assert_eq!(key.parts().count(), 1);
        assert_eq!(key.to_string(), "any=key");
    }
}
