#![warn(missing_docs)]
//! # captionbox-core
//!
//! Core types shared by every captionbox crate.
//!
//! This crate holds no I/O. It defines:
//!
//! - **What gets cached** ([`CacheKey`], [`SubtitleSelector`])
//! - **How long text is delivered** ([`ContentWindow`], [`window::slice`], [`ResponseLimit`])
//! - **What the extraction collaborator produces** ([`VideoInfo`], [`Chapter`], [`AvailableTracks`])
//! - **How raw subtitle blobs are read** ([`format::detect`], [`format::to_plain_text`])
//!

pub mod format;
pub mod key;
pub mod selector;
pub mod video;
pub mod window;

pub use format::{ParseError, SubtitleFormat};
pub use key::{CacheKey, KeyPart};
pub use selector::{SubtitleSelector, TrackKind};
pub use video::{AvailableTracks, Chapter, VideoInfo};
pub use window::{ContentWindow, InvalidCursor, Pagination, ResponseLimit};
#[doc(hidden)]
pub use smol_str::SmolStr;
