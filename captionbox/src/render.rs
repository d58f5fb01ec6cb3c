//! Human-readable summaries that accompany structured tool results.

use std::fmt::Write;

use captionbox_core::{AvailableTracks, Chapter, VideoInfo};

/// `Official: en, ru` and `Auto: en` lines.
pub fn tracks(video_id: &str, tracks: &AvailableTracks) -> String {
    format!(
        "Available subtitles for \"{video_id}\":\nOfficial: {}\nAuto: {}",
        languages(&tracks.official),
        languages(&tracks.auto),
    )
}

fn languages(tags: &[String]) -> String {
    if tags.is_empty() {
        "none".to_owned()
    } else {
        tags.join(", ")
    }
}

/// One `Label: value` line per field the platform reported.
pub fn video_info(info: &VideoInfo) -> String {
    let mut out = String::new();
    let mut line = |label: &str, value: Option<String>| {
        if let Some(value) = value {
            let _ = writeln!(out, "{label}: {value}");
        }
    };
    line("Title", info.title.clone());
    line("Uploader", info.uploader.clone());
    line("Channel", info.channel.clone());
    line("Duration", info.duration.map(|d| format!("{d}s")));
    line("Views", info.view_count.map(|n| n.to_string()));
    line("Likes", info.like_count.map(|n| n.to_string()));
    line("Upload date", info.upload_date.clone());
    line("URL", info.webpage_url.clone());

    if out.is_empty() {
        return format!("Video \"{}\"", info.id);
    }
    out.truncate(out.trim_end().len());
    out
}

/// `0s - 60s: Intro` lines, or a notice when the video has no chapters.
pub fn chapters(video_id: &str, chapters: &[Chapter]) -> String {
    if chapters.is_empty() {
        return format!("No chapters found for \"{video_id}\".");
    }
    chapters
        .iter()
        .map(|c| format!("{}s - {}s: {}", c.start_time, c.end_time, c.title))
        .collect::<Vec<_>>()
        .join("\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_tracks() {
        let rendered = tracks(
            "dQw4w9WgXcQ",
            &AvailableTracks {
                official: vec!["en".into(), "ru".into()],
                auto: vec![],
            },
        );
        assert!(rendered.contains("Official: en, ru"));
        assert!(rendered.contains("Auto: none"));
    }

    #[test]
    fn test_video_info_skips_missing_fields() {
        let info = VideoInfo {
            id: "dQw4w9WgXcQ".into(),
            title: Some("Test title".into()),
            duration: Some(120.0),
            view_count: Some(42),
            ..VideoInfo::default()
        };
        assert_eq!(video_info(&info), "Title: Test title\nDuration: 120s\nViews: 42");
    }

    #[test]
    fn test_video_info_without_fields() {
        let info = VideoInfo {
            id: "dQw4w9WgXcQ".into(),
            ..VideoInfo::default()
        };
        assert_eq!(video_info(&info), "Video \"dQw4w9WgXcQ\"");
    }

    #[test]
    fn test_chapters() {
        let list = vec![
            Chapter {
                start_time: 0.0,
                end_time: 60.0,
                title: "Intro".into(),
            },
            Chapter {
                start_time: 60.0,
                end_time: 90.5,
                title: "Main".into(),
            },
        ];
        assert_eq!(
            chapters("dQw4w9WgXcQ", &list),
            "0s - 60s: Intro\n60s - 90.5s: Main"
        );
        assert_eq!(
            chapters("dQw4w9WgXcQ", &[]),
            "No chapters found for \"dQw4w9WgXcQ\"."
        );
    }
}
