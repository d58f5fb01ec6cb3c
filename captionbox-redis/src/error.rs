//! Error types for Redis backend operations.
//!
//! All errors convert to [`BackendError`] for uniform handling by the cache
//! store, which logs them and degrades to pass-through behavior.
//!
//! [`BackendError`]: captionbox_backend::BackendError

use captionbox_backend::BackendError;
use redis::RedisError;

/// Error type for Redis backend operations.
///
/// You typically don't handle this error directly. It appears when:
///
/// - Building a backend with an invalid connection URL
/// - Performing the first cache operation when Redis is unreachable
///   (the connection is established lazily)
/// - Performing cache operations when the Redis server returns an error
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// An error from the underlying Redis client.
    #[error("Redis backend error: {0}")]
    Redis(#[from] RedisError),
}

impl From<Error> for BackendError {
    fn from(error: Error) -> Self {
        let Error::Redis(inner) = &error;
        if inner.is_io_error()
            || inner.is_connection_refusal()
            || inner.is_connection_dropped()
            || inner.is_timeout()
        {
            Self::ConnectionError(Box::new(error))
        } else {
            Self::InternalError(Box::new(error))
        }
    }
}
