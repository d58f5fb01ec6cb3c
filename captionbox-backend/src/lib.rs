//! Traits for captionbox durable backend interaction.
//!
//! A [`Backend`] is an open handle to an external key/value store that
//! enforces expiry on its own. A [`Connector`] turns a backend URL into such a
//! handle. The cache store owns at most one handle at a time and talks to it
//! only through these traits, so tests substitute an in-memory fake.
mod backend;
mod error;

pub use backend::{Backend, BackendResult, Connector};
pub use error::BackendError;
