//! Redis durable backend for captionbox.
//!
//! [`RedisBackend`] stores each entry as a plain string with `SET .. EX`, so
//! expiry is enforced by redis itself. The connection is opened lazily on the
//! first operation and reused afterwards. [`RedisConnector`] is the
//! [`Connector`](captionbox_backend::Connector) the cache store uses to open it
//! from `CACHE_BACKEND_URL`.
#![warn(missing_docs)]

pub mod backend;
pub mod error;

#[doc(inline)]
pub use crate::backend::{RedisBackend, RedisBackendBuilder, RedisConnector};
