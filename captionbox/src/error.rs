//! Error types for retrieval operations.

use captionbox_core::{InvalidCursor, ParseError};
use thiserror::Error;

use crate::source::SourceError;

/// Error type for [`RetrievalFacade`](crate::RetrievalFacade) operations.
///
/// Cache failures never appear here: the [`CacheStore`](crate::CacheStore)
/// absorbs them and behaves as a miss or a no-op.
#[derive(Debug, Error)]
pub enum RetrievalError {
    /// The video reference is neither a recognizable URL nor a video id.
    ///
    /// Raised before any cache or network access.
    #[error("Invalid YouTube URL or video ID.")]
    InvalidReference,

    /// The language tag contains characters outside `[A-Za-z0-9_-]`.
    #[error("Invalid language tag.")]
    InvalidLanguage,

    /// The cursor does not point inside the content.
    #[error(transparent)]
    InvalidCursor(#[from] InvalidCursor),

    /// The source has no content for the request.
    ///
    /// Distinct from a cache miss, which callers never observe.
    #[error("{0}")]
    NotFound(String),

    /// Content was retrieved but could not be normalized to plain text.
    #[error("Failed to parse subtitles: {0}")]
    ParseFailure(#[from] ParseError),

    /// The extraction collaborator failed.
    #[error(transparent)]
    Source(#[from] SourceError),
}

impl RetrievalError {
    /// Subtitles missing for a selector.
    pub fn subtitles_not_found() -> Self {
        Self::NotFound("Subtitles not found".to_owned())
    }

    /// Video info missing for a video.
    pub fn video_info_not_found(video_id: &str) -> Self {
        Self::NotFound(format!("Failed to fetch video info for \"{video_id}\"."))
    }

    /// Chapters missing for a video.
    pub fn chapters_not_found(video_id: &str) -> Self {
        Self::NotFound(format!("Failed to fetch chapters for \"{video_id}\"."))
    }
}
