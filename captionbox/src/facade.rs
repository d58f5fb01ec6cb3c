//! Cache-aware retrieval of subtitles and video metadata.
//!
//! Each operation runs strictly in order: validate, look up the cache, fetch
//! from the [`CaptionSource`] on a miss, write the cache, then window the
//! result. Two concurrent requests for the same selector may both miss and
//! both write; the value is deterministic so the last write wins harmlessly.
//!
//! Subtitles are cached in their downloaded container form under the
//! selector's key. Transcript and raw delivery therefore share one entry, and
//! normalization runs on every read.

use std::sync::Arc;

use captionbox_core::{
    AvailableTracks, CacheKey, Chapter, ContentWindow, KeyPart, ResponseLimit, SubtitleFormat,
    SubtitleSelector, TrackKind, VideoInfo, window,
};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, warn};

use crate::error::RetrievalError;
use crate::metrics;
use crate::reference;
use crate::source::CaptionSource;
use crate::store::CacheStore;

/// Cache key prefix of video info entries.
pub const VIDEO_INFO_PREFIX: &str = "video-info";
/// Cache key prefix of chapter list entries.
pub const VIDEO_CHAPTERS_PREFIX: &str = "video-chapters";
const METADATA_KEY_VERSION: u32 = 1;

/// A window over raw subtitle content plus its container format.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawContent {
    pub format: SubtitleFormat,
    pub window: ContentWindow,
}

/// Orchestrates the cache, the caption source and windowing.
pub struct RetrievalFacade<S> {
    source: S,
    cache: Arc<CacheStore>,
}

impl<S> RetrievalFacade<S>
where
    S: CaptionSource,
{
    pub fn new(source: S, cache: Arc<CacheStore>) -> Self {
        Self { source, cache }
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn cache(&self) -> &Arc<CacheStore> {
        &self.cache
    }

    /// Resolves a URL or bare id to a video id.
    pub fn resolve_video(&self, reference: &str) -> Result<String, RetrievalError> {
        reference::resolve_video_id(reference).ok_or(RetrievalError::InvalidReference)
    }

    /// Builds a validated selector from client input.
    pub fn selector(
        &self,
        reference: &str,
        kind: TrackKind,
        lang: &str,
    ) -> Result<SubtitleSelector, RetrievalError> {
        let video_id = self.resolve_video(reference)?;
        let lang = reference::sanitize_language_tag(lang).ok_or(RetrievalError::InvalidLanguage)?;
        Ok(SubtitleSelector::new(video_id, kind, lang))
    }

    /// Returns the full plain-text transcript for `selector`.
    #[tracing::instrument(skip(self), level = "trace")]
    pub async fn get_full_transcript(
        &self,
        selector: &SubtitleSelector,
    ) -> Result<String, RetrievalError> {
        let raw = self.subtitles(selector).await?;
        Ok(self.source.normalize_to_plain_text(&raw)?)
    }

    /// Returns one window of the plain-text transcript for `selector`.
    #[tracing::instrument(skip(self), level = "trace")]
    pub async fn get_transcript(
        &self,
        selector: &SubtitleSelector,
        limit: ResponseLimit,
        cursor: Option<&str>,
    ) -> Result<ContentWindow, RetrievalError> {
        check_cursor(cursor)?;
        let text = self.get_full_transcript(selector).await?;
        Ok(window::slice(&text, limit, cursor)?)
    }

    /// Returns the full raw subtitle content for `selector` and its format.
    #[tracing::instrument(skip(self), level = "trace")]
    pub async fn get_full_raw_content(
        &self,
        selector: &SubtitleSelector,
    ) -> Result<(SubtitleFormat, String), RetrievalError> {
        let raw = self.subtitles(selector).await?;
        Ok((self.source.detect_container_format(&raw), raw))
    }

    /// Returns one window of the raw subtitle content for `selector`.
    #[tracing::instrument(skip(self), level = "trace")]
    pub async fn get_raw_content(
        &self,
        selector: &SubtitleSelector,
        limit: ResponseLimit,
        cursor: Option<&str>,
    ) -> Result<RawContent, RetrievalError> {
        check_cursor(cursor)?;
        let (format, raw) = self.get_full_raw_content(selector).await?;
        let window = window::slice(&raw, limit, cursor)?;
        Ok(RawContent { format, window })
    }

    /// Lists available track languages. Never cached.
    #[tracing::instrument(skip(self), level = "trace")]
    pub async fn get_available_tracks(
        &self,
        video_id: &str,
    ) -> Result<AvailableTracks, RetrievalError> {
        Ok(self.source.list_available_tracks(video_id).await?)
    }

    /// Returns video info, cached under the metadata TTL.
    #[tracing::instrument(skip(self), level = "trace")]
    pub async fn get_video_info(&self, video_id: &str) -> Result<VideoInfo, RetrievalError> {
        let key = metadata_key(VIDEO_INFO_PREFIX, video_id);
        if let Some(info) = self.cached_json::<VideoInfo>(&key).await {
            return Ok(info);
        }
        let info = self
            .source
            .fetch_video_info(video_id)
            .await?
            .ok_or_else(|| RetrievalError::video_info_not_found(video_id))?;
        self.store_json(&key, &info).await;
        Ok(info)
    }

    /// Returns the chapter list, cached under the metadata TTL.
    ///
    /// An empty list is a valid result and is cached like any other.
    #[tracing::instrument(skip(self), level = "trace")]
    pub async fn get_chapters(&self, video_id: &str) -> Result<Vec<Chapter>, RetrievalError> {
        let key = metadata_key(VIDEO_CHAPTERS_PREFIX, video_id);
        if let Some(chapters) = self.cached_json::<Vec<Chapter>>(&key).await {
            return Ok(chapters);
        }
        let chapters = self
            .source
            .fetch_chapters(video_id)
            .await?
            .ok_or_else(|| RetrievalError::chapters_not_found(video_id))?;
        self.store_json(&key, &chapters).await;
        Ok(chapters)
    }

    async fn subtitles(&self, selector: &SubtitleSelector) -> Result<String, RetrievalError> {
        let key = selector.cache_key();
        if let Some(raw) = self.cache.get(&key).await {
            debug!(%selector, "Subtitles served from cache");
            metrics::record_cache_hit();
            return Ok(raw);
        }
        metrics::record_cache_miss();

        let raw = self
            .source
            .download_caption_track(selector.video_id(), selector.kind(), selector.lang())
            .await?
            .filter(|raw| !raw.trim().is_empty())
            .ok_or_else(RetrievalError::subtitles_not_found)?;

        let ttl = self.cache.config().ttl_subtitles();
        self.cache.set(&key, &raw, ttl).await;
        Ok(raw)
    }

    async fn cached_json<T: DeserializeOwned>(&self, key: &CacheKey) -> Option<T> {
        let Some(cached) = self.cache.get(key).await else {
            metrics::record_cache_miss();
            return None;
        };
        match serde_json::from_str(&cached) {
            Ok(value) => {
                metrics::record_cache_hit();
                Some(value)
            }
            Err(error) => {
                warn!(key = %key, error = %error, "Discarding undecodable cache entry");
                metrics::record_cache_miss();
                None
            }
        }
    }

    async fn store_json<T: Serialize>(&self, key: &CacheKey, value: &T) {
        match serde_json::to_string(value) {
            Ok(encoded) => {
                let ttl = self.cache.config().ttl_metadata();
                self.cache.set(key, &encoded, ttl).await;
            }
            Err(error) => warn!(key = %key, error = %error, "Skipping cache write"),
        }
    }
}

/// Rejects a malformed cursor before any cache or source access. The range
/// check waits for the content.
fn check_cursor(cursor: Option<&str>) -> Result<(), RetrievalError> {
    if let Some(raw) = cursor {
        window::parse_cursor(raw)?;
    }
    Ok(())
}

/// Cache key of a metadata entry, e.g. `video-info:v1:video=dQw4w9WgXcQ`.
pub fn metadata_key(prefix: &'static str, video_id: &str) -> CacheKey {
    CacheKey::new(
        prefix,
        METADATA_KEY_VERSION,
        vec![KeyPart::new("video", Some(video_id))],
    )
}
