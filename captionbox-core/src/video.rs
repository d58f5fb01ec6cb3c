//! Read-only facts about a video, as produced by the extraction collaborator.

use serde::{Deserialize, Serialize};

/// Video metadata.
///
/// Every field except the id is optional: the extraction tool reports what
/// the platform exposes and nothing more.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VideoInfo {
    /// Platform video id.
    pub id: String,
    /// Video title.
    pub title: Option<String>,
    /// Display name of the uploader.
    pub uploader: Option<String>,
    /// Handle of the uploader.
    pub uploader_id: Option<String>,
    /// Channel name.
    pub channel: Option<String>,
    /// Channel id.
    pub channel_id: Option<String>,
    /// Channel page.
    pub channel_url: Option<String>,
    /// Duration in seconds.
    pub duration: Option<f64>,
    /// Full description text.
    pub description: Option<String>,
    /// Upload date as reported, `YYYYMMDD` or ISO.
    pub upload_date: Option<String>,
    /// Canonical watch page.
    pub webpage_url: Option<String>,
    /// View count.
    pub view_count: Option<u64>,
    /// Like count.
    pub like_count: Option<u64>,
    /// Comment count.
    pub comment_count: Option<u64>,
    /// Uploader-assigned tags.
    pub tags: Option<Vec<String>>,
    /// Platform categories.
    pub categories: Option<Vec<String>>,
    /// Live status label, e.g. `not_live` or `was_live`.
    pub live_status: Option<String>,
    /// Whether the video is streaming now.
    pub is_live: Option<bool>,
    /// Whether the video was a past stream.
    pub was_live: Option<bool>,
    /// Availability label, e.g. `public` or `unlisted`.
    pub availability: Option<String>,
    /// Default thumbnail URL.
    pub thumbnail: Option<String>,
    /// Every thumbnail variant.
    pub thumbnails: Option<Vec<Thumbnail>>,
}

/// A thumbnail variant of a video.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct Thumbnail {
    /// Image URL.
    pub url: String,
    /// Width in pixels.
    pub width: Option<u32>,
    /// Height in pixels.
    pub height: Option<u32>,
}

/// A chapter marker. Times are in seconds from the start of the video.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chapter {
    /// Chapter start.
    pub start_time: f64,
    /// Chapter end.
    pub end_time: f64,
    /// Chapter title.
    pub title: String,
}

/// Language tags of the caption tracks a video offers, in the order the platform lists them.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct AvailableTracks {
    /// Tracks uploaded by the owner.
    pub official: Vec<String>,
    /// Speech-recognition tracks.
    pub auto: Vec<String>,
}

impl AvailableTracks {
    /// Returns `true` if the video has no caption track at all.
    pub fn is_empty(&self) -> bool {
        self.official.is_empty() && self.auto.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_video_info_uses_camel_case() {
        let info: VideoInfo = serde_json::from_value(serde_json::json!({
            "id": "dQw4w9WgXcQ",
            "title": "Test title",
            "uploaderId": "uploader123",
            "viewCount": 42,
            "likeCount": null,
            "webpageUrl": "https://example.com/watch?v=dQw4w9WgXcQ",
        }))
        .unwrap();
        assert_eq!(info.uploader_id.as_deref(), Some("uploader123"));
        assert_eq!(info.view_count, Some(42));
        assert_eq!(info.like_count, None);
        assert_eq!(info.duration, None);
    }

    #[test]
    fn test_chapter_round_trips_through_json() {
        let chapter = Chapter {
            start_time: 0.0,
            end_time: 60.0,
            title: "Intro".to_owned(),
        };
        let value = serde_json::to_value(&chapter).unwrap();
        assert_eq!(
            value,
            serde_json::json!({ "startTime": 0.0, "endTime": 60.0, "title": "Intro" })
        );
    }
}
