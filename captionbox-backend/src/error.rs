//! Error types for backend operations.

use thiserror::Error;

/// Error type for backend operations.
///
/// Backend errors never reach the callers of the cache store: the store logs
/// them and behaves as a miss or a no-op. The categories exist for logging.
#[derive(Debug, Error)]
pub enum BackendError {
    /// Internal backend error, state or computation error.
    ///
    /// Any error not related to network interaction.
    #[error(transparent)]
    InternalError(Box<dyn std::error::Error + Send + Sync>),

    /// Network interaction error.
    ///
    /// Errors occurring during communication with the remote store.
    #[error(transparent)]
    ConnectionError(Box<dyn std::error::Error + Send + Sync>),
}
