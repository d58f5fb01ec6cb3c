//! # captionbox
//!
//! Cached, windowed access to video captions.
//!
//! - [`CacheStore`] is a key/value cache with TTL that is either off or backed
//!   by redis, chosen per call from [`CacheConfig`].
//! - [`RetrievalFacade`] resolves a video reference, consults the cache, falls
//!   back to a [`CaptionSource`] on a miss and windows long text with
//!   [`window::slice`](captionbox_core::window::slice).
//! - [`tools`] exposes the facade as tool calls with structured results.
//!
//! ```no_run
//! use std::sync::Arc;
//! use captionbox::{CacheStore, RetrievalFacade, TrackKind};
//! # use captionbox::CaptionSource;
//! # async fn run(source: impl CaptionSource) -> Result<(), captionbox::RetrievalError> {
//! let facade = RetrievalFacade::new(source, Arc::new(CacheStore::from_env()));
//! let selector = facade.selector("https://youtu.be/dQw4w9WgXcQ", TrackKind::Auto, "en")?;
//! let window = facade
//!     .get_transcript(&selector, captionbox::ResponseLimit::standard(), None)
//!     .await?;
//! println!("{} ({} of {})", window.text, window.end_offset, window.total_length);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod error;
pub mod facade;
pub mod metrics;
pub mod reference;
pub mod render;
pub mod source;
pub mod store;
pub mod tools;

pub use captionbox_core::{
    AvailableTracks, CacheKey, Chapter, ContentWindow, InvalidCursor, Pagination, ParseError,
    ResponseLimit, SubtitleFormat, SubtitleSelector, TrackKind, VideoInfo,
};
pub use config::{CacheConfig, CacheMode, ConfigSource, Environment};
pub use error::RetrievalError;
pub use facade::{RawContent, RetrievalFacade};
pub use source::{CaptionSource, SourceError};
pub use store::CacheStore;
pub use tools::{ToolError, ToolResult, Tools};
