//! Video reference validation.
//!
//! Clients name a video either by URL or by bare id. Everything here is pure
//! and runs before any cache or network access.

use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref VIDEO_URL: Regex = Regex::new(
        r"^(?i:https?://)?(?i:(?:www|m|music)\.)?(?i:youtube\.com|youtube-nocookie\.com|youtu\.be)(?:/\S*)?$"
    )
    .expect("valid video URL regex");
    static ref SHORT_LINK_ID: Regex =
        Regex::new(r"(?i:youtu\.be)/([A-Za-z0-9_-]{11})(?:[?#&/]|$)").expect("valid short link regex");
    static ref QUERY_ID: Regex =
        Regex::new(r"[?&]v=([A-Za-z0-9_-]{11})(?:[#&]|$)").expect("valid query id regex");
    static ref PATH_ID: Regex =
        Regex::new(r"/(?:embed|shorts|live|v)/([A-Za-z0-9_-]{11})(?:[?#&/]|$)")
            .expect("valid path id regex");
    static ref VIDEO_ID: Regex = Regex::new(r"^[A-Za-z0-9_-]{11}$").expect("valid video id regex");
    static ref LANGUAGE_TAG: Regex =
        Regex::new(r"^[A-Za-z0-9_-]{1,35}$").expect("valid language tag regex");
}

/// Returns `true` when `input` is a URL on one of the video platform hosts.
pub fn is_valid_reference(input: &str) -> bool {
    VIDEO_URL.is_match(input.trim())
}

/// Extracts the video id from a watch, short-link, embed, shorts or live URL.
pub fn extract_video_id(url: &str) -> Option<String> {
    let url = url.trim();
    [&*SHORT_LINK_ID, &*QUERY_ID, &*PATH_ID]
        .into_iter()
        .find_map(|pattern| pattern.captures(url))
        .and_then(|captures| captures.get(1))
        .map(|id| id.as_str().to_owned())
}

/// Returns the trimmed id when it is 11 characters of `[A-Za-z0-9_-]`.
pub fn sanitize_video_id(input: &str) -> Option<String> {
    let trimmed = input.trim();
    VIDEO_ID.is_match(trimmed).then(|| trimmed.to_owned())
}

/// Returns the trimmed tag when it is 1 to 35 characters of `[A-Za-z0-9_-]`.
pub fn sanitize_language_tag(input: &str) -> Option<String> {
    let trimmed = input.trim();
    LANGUAGE_TAG.is_match(trimmed).then(|| trimmed.to_owned())
}

/// Resolves a URL or bare id to a sanitized video id.
pub fn resolve_video_id(input: &str) -> Option<String> {
    if is_valid_reference(input) {
        extract_video_id(input).and_then(|id| sanitize_video_id(&id))
    } else {
        sanitize_video_id(input)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_watch_url() {
        let url = "https://www.youtube.com/watch?v=dQw4w9WgXcQ&t=42s";
        assert!(is_valid_reference(url));
        assert_eq!(extract_video_id(url).as_deref(), Some("dQw4w9WgXcQ"));
    }

    #[test]
    fn test_short_and_path_urls() {
        for url in [
            "https://youtu.be/dQw4w9WgXcQ",
            "youtu.be/dQw4w9WgXcQ?si=abc",
            "https://www.youtube.com/embed/dQw4w9WgXcQ",
            "https://youtube.com/shorts/dQw4w9WgXcQ",
            "https://m.youtube.com/live/dQw4w9WgXcQ?feature=share",
            "https://music.youtube.com/watch?feature=share&v=dQw4w9WgXcQ",
        ] {
            assert!(is_valid_reference(url), "{url}");
            assert_eq!(resolve_video_id(url).as_deref(), Some("dQw4w9WgXcQ"), "{url}");
        }
    }

    #[test]
    fn test_foreign_host_is_not_a_reference() {
        assert!(!is_valid_reference("https://example.com/watch?v=dQw4w9WgXcQ"));
        assert!(!is_valid_reference("https://youtube.com.evil.io/watch?v=dQw4w9WgXcQ"));
    }

    #[test]
    fn test_bare_id() {
        assert!(!is_valid_reference("dQw4w9WgXcQ"));
        assert_eq!(resolve_video_id(" dQw4w9WgXcQ ").as_deref(), Some("dQw4w9WgXcQ"));
    }

    #[test]
    fn test_invalid_ids() {
        for input in ["", "invalid", "dQw4w9WgXcQX", "dQw4w9WgX/Q", "https://youtube.com/"] {
            assert_eq!(resolve_video_id(input), None, "{input:?}");
        }
    }

    #[test]
    fn test_language_tags() {
        assert_eq!(sanitize_language_tag("en").as_deref(), Some("en"));
        assert_eq!(sanitize_language_tag(" pt-BR ").as_deref(), Some("pt-BR"));
        assert_eq!(sanitize_language_tag("zh_Hans").as_deref(), Some("zh_Hans"));
        assert_eq!(sanitize_language_tag(""), None);
        assert_eq!(sanitize_language_tag("en;rm -rf"), None);
        assert_eq!(sanitize_language_tag(&"a".repeat(36)), None);
    }
}
