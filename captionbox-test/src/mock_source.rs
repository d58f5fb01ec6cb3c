use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use captionbox::{CaptionSource, SourceError};
use captionbox_core::{
    AvailableTracks, Chapter, ParseError, SubtitleFormat, TrackKind, VideoInfo, format,
};

/// A collaborator call recorded by [`MockSource`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SourceCall {
    Download {
        video_id: String,
        kind: TrackKind,
        lang: String,
    },
    ListTracks(String),
    VideoInfo(String),
    Chapters(String),
    Normalize(String),
    Detect(String),
}

#[derive(Default)]
struct Script {
    subtitles: Option<String>,
    normalized: Option<Result<String, ParseError>>,
    format: Option<SubtitleFormat>,
    tracks: AvailableTracks,
    video_info: Option<VideoInfo>,
    chapters: Option<Vec<Chapter>>,
    failing: bool,
}

/// Scripted caption source. Clones share the script and the call log.
///
/// Unscripted downloads, video info and chapters answer "no content";
/// normalization and format detection use the real parsers unless overridden.
#[derive(Clone, Default)]
pub struct MockSource {
    script: Arc<Mutex<Script>>,
    calls: Arc<Mutex<Vec<SourceCall>>>,
}

impl MockSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Every download returns `raw`.
    pub fn with_subtitles(self, raw: impl Into<String>) -> Self {
        self.script.lock().unwrap().subtitles = Some(raw.into());
        self
    }

    /// Normalization returns `text` whatever the input.
    pub fn with_normalized(self, text: impl Into<String>) -> Self {
        self.script.lock().unwrap().normalized = Some(Ok(text.into()));
        self
    }

    /// Normalization fails with `error`.
    pub fn with_parse_error(self, error: ParseError) -> Self {
        self.script.lock().unwrap().normalized = Some(Err(error));
        self
    }

    /// Format detection returns `format` whatever the input.
    pub fn with_format(self, format: SubtitleFormat) -> Self {
        self.script.lock().unwrap().format = Some(format);
        self
    }

    pub fn with_tracks(self, official: &[&str], auto: &[&str]) -> Self {
        self.script.lock().unwrap().tracks = AvailableTracks {
            official: official.iter().map(|s| s.to_string()).collect(),
            auto: auto.iter().map(|s| s.to_string()).collect(),
        };
        self
    }

    pub fn with_video_info(self, info: VideoInfo) -> Self {
        self.script.lock().unwrap().video_info = Some(info);
        self
    }

    pub fn with_chapters(self, chapters: Vec<Chapter>) -> Self {
        self.script.lock().unwrap().chapters = Some(chapters);
        self
    }

    /// Every fetching call fails with a [`SourceError`].
    pub fn failing(self) -> Self {
        self.script.lock().unwrap().failing = true;
        self
    }

    pub fn calls(&self) -> Vec<SourceCall> {
        self.calls.lock().unwrap().clone()
    }

    /// Number of fetching calls, i.e. calls that would hit the platform.
    pub fn fetch_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| !matches!(call, SourceCall::Normalize(_) | SourceCall::Detect(_)))
            .count()
    }

    pub fn download_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|call| matches!(call, SourceCall::Download { .. }))
            .count()
    }

    fn record(&self, call: SourceCall) {
        self.calls.lock().unwrap().push(call);
    }

    fn check_failing(&self) -> Result<(), SourceError> {
        if self.script.lock().unwrap().failing {
            Err(SourceError::new("extractor exited with status 1"))
        } else {
            Ok(())
        }
    }
}

#[async_trait]
impl CaptionSource for MockSource {
    async fn download_caption_track(
        &self,
        video_id: &str,
        kind: TrackKind,
        lang: &str,
    ) -> Result<Option<String>, SourceError> {
        self.record(SourceCall::Download {
            video_id: video_id.to_owned(),
            kind,
            lang: lang.to_owned(),
        });
        self.check_failing()?;
        Ok(self.script.lock().unwrap().subtitles.clone())
    }

    async fn list_available_tracks(&self, video_id: &str) -> Result<AvailableTracks, SourceError> {
        self.record(SourceCall::ListTracks(video_id.to_owned()));
        self.check_failing()?;
        Ok(self.script.lock().unwrap().tracks.clone())
    }

    async fn fetch_video_info(&self, video_id: &str) -> Result<Option<VideoInfo>, SourceError> {
        self.record(SourceCall::VideoInfo(video_id.to_owned()));
        self.check_failing()?;
        Ok(self.script.lock().unwrap().video_info.clone())
    }

    async fn fetch_chapters(&self, video_id: &str) -> Result<Option<Vec<Chapter>>, SourceError> {
        self.record(SourceCall::Chapters(video_id.to_owned()));
        self.check_failing()?;
        Ok(self.script.lock().unwrap().chapters.clone())
    }

    fn normalize_to_plain_text(&self, raw: &str) -> Result<String, ParseError> {
        self.record(SourceCall::Normalize(raw.to_owned()));
        match self.script.lock().unwrap().normalized.clone() {
            Some(result) => result,
            None => format::to_plain_text(raw),
        }
    }

    fn detect_container_format(&self, raw: &str) -> SubtitleFormat {
        self.record(SourceCall::Detect(raw.to_owned()));
        self.script
            .lock()
            .unwrap()
            .format
            .unwrap_or_else(|| format::detect(raw))
    }
}
