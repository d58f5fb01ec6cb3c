//! Subtitle selectors and the cache keys derived from them.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use smol_str::SmolStr;

use crate::key::{CacheKey, KeyPart};

/// Cache key prefix for subtitle payloads.
pub const SUBTITLES_PREFIX: &str = "subtitles";

/// Version of the cached subtitle representation.
pub const SUBTITLES_KEY_VERSION: u32 = 1;

/// Kind of caption track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TrackKind {
    /// Captions uploaded by the video owner.
    Official,
    /// Captions generated by speech recognition.
    #[default]
    Auto,
}

impl TrackKind {
    /// Returns the wire name of the track kind.
    pub fn as_str(&self) -> &'static str {
        match self {
            TrackKind::Official => "official",
            TrackKind::Auto => "auto",
        }
    }
}

impl fmt::Display for TrackKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Error returned when parsing an unknown track kind.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown track kind: {0:?}")]
pub struct UnknownTrackKind(pub String);

impl FromStr for TrackKind {
    type Err = UnknownTrackKind;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "official" => Ok(TrackKind::Official),
            "auto" => Ok(TrackKind::Auto),
            _ => Err(UnknownTrackKind(s.to_owned())),
        }
    }
}

/// Identifies one cacheable unit of subtitle text: a video, a track kind and a language.
///
/// The selector holds already-validated values; validation happens before one is built.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct SubtitleSelector {
    video_id: SmolStr,
    kind: TrackKind,
    lang: SmolStr,
}

impl SubtitleSelector {
    /// Creates a selector from validated parts.
    pub fn new(video_id: impl Into<SmolStr>, kind: TrackKind, lang: impl Into<SmolStr>) -> Self {
        Self {
            video_id: video_id.into(),
            kind,
            lang: lang.into(),
        }
    }

    /// Returns the video identifier.
    pub fn video_id(&self) -> &str {
        &self.video_id
    }

    /// Returns the track kind.
    pub fn kind(&self) -> TrackKind {
        self.kind
    }

    /// Returns the language tag.
    pub fn lang(&self) -> &str {
        &self.lang
    }

    /// Derives the cache key for the subtitle payload this selector names.
    ///
    /// Same selector, same key.
    pub fn cache_key(&self) -> CacheKey {
        CacheKey::new(
            SUBTITLES_PREFIX,
            SUBTITLES_KEY_VERSION,
            vec![
                KeyPart::new("video", Some(self.video_id.as_str())),
                KeyPart::new("type", Some(self.kind.as_str())),
                KeyPart::new("lang", Some(self.lang.as_str())),
            ],
        )
    }
}

impl fmt::Display for SubtitleSelector {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}/{}", self.video_id, self.kind, self.lang)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_same_selector_same_key() {
        let a = SubtitleSelector::new("dQw4w9WgXcQ", TrackKind::Auto, "en");
        let b = SubtitleSelector::new("dQw4w9WgXcQ", TrackKind::Auto, "en");
        assert_eq!(a.cache_key(), b.cache_key());
        assert_eq!(
            a.cache_key().to_string(),
            "subtitles:v1:video=dQw4w9WgXcQ&type=auto&lang=en"
        );
    }

    #[test]
    fn test_kind_and_lang_separate_keys() {
        let auto = SubtitleSelector::new("dQw4w9WgXcQ", TrackKind::Auto, "en");
        let official = SubtitleSelector::new("dQw4w9WgXcQ", TrackKind::Official, "en");
        let russian = SubtitleSelector::new("dQw4w9WgXcQ", TrackKind::Auto, "ru");
        assert_ne!(auto.cache_key(), official.cache_key());
        assert_ne!(auto.cache_key(), russian.cache_key());
    }

    #[test]
    fn test_track_kind_parse() {
        assert_eq!("official".parse::<TrackKind>(), Ok(TrackKind::Official));
        assert_eq!(" AUTO ".parse::<TrackKind>(), Ok(TrackKind::Auto));
        assert!("manual".parse::<TrackKind>().is_err());
    }

    #[test]
    fn test_track_kind_serde() {
        let json = serde_json::to_string(&TrackKind::Official).unwrap();
        assert_eq!(json, "\"official\"");
        let kind: TrackKind = serde_json::from_str("\"auto\"").unwrap();
        assert_eq!(kind, TrackKind::Auto);
    }
}
