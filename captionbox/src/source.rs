//! The extraction collaborator.
//!
//! Talking to the video platform is not part of this crate. A host plugs its
//! extractor in by implementing [`CaptionSource`]; the retrieval facade only
//! consumes the operations below.

use async_trait::async_trait;
use captionbox_core::{
    AvailableTracks, Chapter, ParseError, SubtitleFormat, TrackKind, VideoInfo, format,
};
use thiserror::Error;

/// Failure of the extraction collaborator itself (process crash, network,
/// unexpected output). "No content" is not an error: it is `Ok(None)`.
#[derive(Debug, Error)]
#[error("caption source failed: {0}")]
pub struct SourceError(#[source] pub Box<dyn std::error::Error + Send + Sync>);

impl SourceError {
    /// Wraps any error as a source failure.
    pub fn new<E>(error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self(error.into())
    }
}

/// Extraction operations consumed by the retrieval facade.
///
/// Every fetching method returns `Ok(None)` when the platform has nothing for
/// the request. Implementations may cache internally; the facade still wraps
/// subtitle downloads and metadata in its own cache.
#[async_trait]
pub trait CaptionSource: Send + Sync {
    /// Downloads one caption track in its container format.
    async fn download_caption_track(
        &self,
        video_id: &str,
        kind: TrackKind,
        lang: &str,
    ) -> Result<Option<String>, SourceError>;

    /// Lists the languages available for each track kind.
    async fn list_available_tracks(&self, video_id: &str) -> Result<AvailableTracks, SourceError>;

    async fn fetch_video_info(&self, video_id: &str) -> Result<Option<VideoInfo>, SourceError>;

    async fn fetch_chapters(&self, video_id: &str) -> Result<Option<Vec<Chapter>>, SourceError>;

    /// Converts a downloaded track to plain text.
    fn normalize_to_plain_text(&self, raw: &str) -> Result<String, ParseError> {
        format::to_plain_text(raw)
    }

    /// Names the container format of a downloaded track.
    fn detect_container_format(&self, raw: &str) -> SubtitleFormat {
        format::detect(raw)
    }
}
