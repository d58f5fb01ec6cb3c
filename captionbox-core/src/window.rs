//! Cursor-based windowing of long text payloads.
//!
//! Full transcripts and raw subtitle blobs can be far larger than what a
//! tool-invocation client accepts in one response. [`slice`] cuts a bounded
//! window out of the full text and reports where the next window starts.
//!
//! ## Offsets
//!
//! Offsets count Unicode scalar values (`char`s) of the full text, not bytes,
//! so a window never splits a multi-byte character. No structural boundary
//! (line, cue, word) is respected.
//!
//! ## Cursors
//!
//! A cursor is the decimal rendering of the offset where the next window
//! starts. It is valid when it parses to a non-negative integer that points
//! inside the content. The end of pagination is signaled by
//! `is_truncated == false`, never by an out-of-range cursor.
//!
//! ```
//! use captionbox_core::window::{slice, ResponseLimit};
//!
//! let limit = ResponseLimit::new(4).unwrap();
//! let first = slice("abcdefghij", limit, None).unwrap();
//! assert_eq!(first.text, "abcd");
//! assert_eq!(first.next_cursor.as_deref(), Some("4"));
//!
//! let second = slice("abcdefghij", limit, first.next_cursor.as_deref()).unwrap();
//! assert_eq!(second.text, "efgh");
//! ```

use bounded_integer::bounded_integer;
use serde::{Deserialize, Serialize};

/// Window size used when a request does not name one.
pub const DEFAULT_RESPONSE_LIMIT: u32 = 10_000;

bounded_integer! {
    /// Maximum number of characters delivered in one window (1-100000).
    #[repr(u32)]
    pub struct ResponseLimit { 1..=100000 }
}

const _: () = assert!(DEFAULT_RESPONSE_LIMIT >= 1 && DEFAULT_RESPONSE_LIMIT <= 100_000);

impl ResponseLimit {
    /// The deployment default, [`DEFAULT_RESPONSE_LIMIT`].
    pub fn standard() -> Self {
        match Self::new(DEFAULT_RESPONSE_LIMIT) {
            Some(limit) => limit,
            None => unreachable!("default response limit is checked at compile time"),
        }
    }

    /// Returns the limit as a character count.
    #[inline]
    pub fn chars(self) -> usize {
        self.get() as usize
    }
}

/// The cursor could not be used to resume the content.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid cursor {cursor:?}")]
pub struct InvalidCursor {
    /// The cursor as received.
    pub cursor: String,
    /// Length of the content the cursor was applied to, `None` when the
    /// cursor was rejected on syntax alone.
    pub total_length: Option<usize>,
}

/// A bounded slice of a larger text plus what is needed to request the next one.
///
/// Invariants:
/// - `end_offset == min(start_offset + limit, total_length)`
/// - `is_truncated == (end_offset < total_length)`
/// - `next_cursor == Some(end_offset.to_string())` exactly when `is_truncated`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ContentWindow {
    /// The delivered text.
    pub text: String,
    /// Offset of the first delivered character.
    pub start_offset: usize,
    /// Offset one past the last delivered character.
    pub end_offset: usize,
    /// Length of the full text.
    pub total_length: usize,
    /// Whether content remains after this window.
    pub is_truncated: bool,
    /// Cursor of the next window, present only when truncated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

/// Pagination fields of a [`ContentWindow`] without the text.
///
/// Every paginated result carries these next to its domain payload.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Pagination {
    /// Length of the full text.
    pub total_length: usize,
    /// Offset of the first delivered character.
    pub start_offset: usize,
    /// Offset one past the last delivered character.
    pub end_offset: usize,
    /// Whether content remains after this window.
    pub is_truncated: bool,
    /// Cursor of the next window, present only when truncated.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_cursor: Option<String>,
}

impl ContentWindow {
    /// Splits the window into its text and pagination fields.
    pub fn into_parts(self) -> (String, Pagination) {
        let pagination = Pagination {
            total_length: self.total_length,
            start_offset: self.start_offset,
            end_offset: self.end_offset,
            is_truncated: self.is_truncated,
            next_cursor: self.next_cursor,
        };
        (self.text, pagination)
    }
}

/// Cuts the window of `full_text` that starts at `cursor` (or at 0 when absent).
///
/// Pure: identical arguments always produce identical windows, so a cursor
/// can be retried or reused freely.
pub fn slice(
    full_text: &str,
    limit: ResponseLimit,
    cursor: Option<&str>,
) -> Result<ContentWindow, InvalidCursor> {
    let total_length = full_text.chars().count();
    let start_offset = match cursor {
        None => 0,
        Some(raw) => check_range(raw, parse_cursor(raw)?, total_length)?,
    };
    let end_offset = start_offset.saturating_add(limit.chars()).min(total_length);

    let from = byte_index(full_text, start_offset);
    let to = byte_index(full_text, end_offset);
    let is_truncated = end_offset < total_length;

    Ok(ContentWindow {
        text: full_text[from..to].to_owned(),
        start_offset,
        end_offset,
        total_length,
        is_truncated,
        next_cursor: is_truncated.then(|| end_offset.to_string()),
    })
}

/// Parses the offset a cursor names, without looking at any content.
///
/// Only the canonical rendering `offset.to_string()` is accepted: plain ASCII
/// digits, no sign, no surrounding whitespace and no leading zeros. Each
/// offset therefore has exactly one valid cursor.
pub fn parse_cursor(raw: &str) -> Result<usize, InvalidCursor> {
    let invalid = || InvalidCursor {
        cursor: raw.to_owned(),
        total_length: None,
    };
    let canonical = !raw.is_empty()
        && raw.bytes().all(|b| b.is_ascii_digit())
        && (raw == "0" || !raw.starts_with('0'));
    if !canonical {
        return Err(invalid());
    }
    raw.parse::<usize>().map_err(|_| invalid())
}

fn check_range(raw: &str, offset: usize, total_length: usize) -> Result<usize, InvalidCursor> {
    // Empty content only admits the start offset.
    let in_range = if total_length > 0 {
        offset < total_length
    } else {
        offset == 0
    };
    in_range.then_some(offset).ok_or_else(|| InvalidCursor {
        cursor: raw.to_owned(),
        total_length: Some(total_length),
    })
}

fn byte_index(text: &str, char_offset: usize) -> usize {
    text.char_indices()
        .nth(char_offset)
        .map_or(text.len(), |(index, _)| index)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn limit(n: u32) -> ResponseLimit {
        ResponseLimit::new(n).unwrap()
    }

    #[test]
    fn test_first_window() {
        let window = slice("abcdefghij", limit(4), None).unwrap();
        assert_eq!(
            window,
            ContentWindow {
                text: "abcd".to_owned(),
                start_offset: 0,
                end_offset: 4,
                total_length: 10,
                is_truncated: true,
                next_cursor: Some("4".to_owned()),
            }
        );
    }

    #[test]
    fn test_following_windows() {
        let second = slice("abcdefghij", limit(4), Some("4")).unwrap();
        assert_eq!(second.text, "efgh");
        assert!(second.is_truncated);
        assert_eq!(second.next_cursor.as_deref(), Some("8"));

        let last = slice("abcdefghij", limit(4), Some("8")).unwrap();
        assert_eq!(last.text, "ij");
        assert_eq!(last.start_offset, 8);
        assert_eq!(last.end_offset, 10);
        assert!(!last.is_truncated);
        assert_eq!(last.next_cursor, None);
    }

    #[test]
    fn test_short_text_fits() {
        let window = slice("short", limit(10), None).unwrap();
        assert_eq!(window.text, "short");
        assert!(!window.is_truncated);
        assert_eq!(window.next_cursor, None);

        let err = slice("short", limit(10), Some("999")).unwrap_err();
        assert_eq!(err.cursor, "999");
        assert_eq!(err.total_length, Some(5));
    }

    #[test]
    fn test_cursor_at_end_is_invalid() {
        assert!(slice("abcdefghij", limit(4), Some("10")).is_err());
        assert!(slice("abcdefghij", limit(4), Some("9")).is_ok());
    }

    #[test]
    fn test_unparseable_cursor_is_invalid() {
        for cursor in ["", "-1", "abc", "4.5", "0x10"] {
            assert!(
                slice("abcdefghij", limit(4), Some(cursor)).is_err(),
                "cursor {cursor:?} should be rejected"
            );
        }
    }

    #[test]
    fn test_only_canonical_cursor_is_accepted() {
        for cursor in ["+4", " 4 ", "04", "4 ", "٤"] {
            let err = slice("abcdefghij", limit(4), Some(cursor)).unwrap_err();
            assert_eq!(err.total_length, None, "cursor {cursor:?}");
        }
        assert_eq!(slice("abcdefghij", limit(4), Some("4")).unwrap().text, "efgh");
        assert_eq!(slice("abcdefghij", limit(4), Some("0")).unwrap().text, "abcd");
    }

    #[test]
    fn test_parse_cursor_ignores_content() {
        assert_eq!(parse_cursor("999"), Ok(999));
        assert_eq!(parse_cursor("0"), Ok(0));
        assert!(parse_cursor("00").is_err());
        assert!(parse_cursor("99999999999999999999999999").is_err());
    }

    #[test]
    fn test_empty_text() {
        let window = slice("", limit(4), None).unwrap();
        assert_eq!(window.total_length, 0);
        assert_eq!(window.text, "");
        assert!(!window.is_truncated);
        assert_eq!(window.next_cursor, None);

        assert!(slice("", limit(4), Some("0")).is_ok());
        assert!(slice("", limit(4), Some("1")).is_err());
    }

    #[test]
    fn test_round_trip_reconstructs_text() {
        let text = "The quick brown fox jumps over the lazy dog. ".repeat(7);
        for n in [1, 3, 7, 50, 314] {
            let mut cursor: Option<String> = None;
            let mut rebuilt = String::new();
            let mut pages = 0;
            loop {
                let window = slice(&text, limit(n), cursor.as_deref()).unwrap();
                rebuilt.push_str(&window.text);
                pages += 1;
                if !window.is_truncated {
                    assert_eq!(window.next_cursor, None);
                    assert_eq!(window.end_offset, window.total_length);
                    break;
                }
                cursor = window.next_cursor;
            }
            assert_eq!(rebuilt, text);
            assert_eq!(pages, text.len().div_ceil(n as usize));
        }
    }

    #[test]
    fn test_identical_arguments_identical_windows() {
        let a = slice("abcdefghij", limit(3), Some("3")).unwrap();
        let b = slice("abcdefghij", limit(3), Some("3")).unwrap();
        assert_eq!(a, b);
    }

    #[test]
    fn test_multibyte_characters_are_not_split() {
        let text = "привет, мир";
        let window = slice(text, limit(6), None).unwrap();
        assert_eq!(window.text, "привет");
        assert_eq!(window.total_length, 11);
        assert_eq!(window.next_cursor.as_deref(), Some("6"));

        let rest = slice(text, limit(6), Some("6")).unwrap();
        assert_eq!(rest.text, ", мир");
        assert!(!rest.is_truncated);
    }

    #[test]
    fn test_pagination_serialization() {
        let (text, pagination) = slice("abcdefghij", limit(4), None).unwrap().into_parts();
        assert_eq!(text, "abcd");
        assert_eq!(
            serde_json::to_value(&pagination).unwrap(),
            serde_json::json!({
                "total_length": 10,
                "start_offset": 0,
                "end_offset": 4,
                "is_truncated": true,
                "next_cursor": "4",
            })
        );

        let (_, last) = slice("abcdefghij", limit(4), Some("8")).unwrap().into_parts();
        let value = serde_json::to_value(&last).unwrap();
        assert!(value.get("next_cursor").is_none());
    }

    #[test]
    fn test_response_limit_bounds() {
        assert!(ResponseLimit::new(0).is_none());
        assert!(ResponseLimit::new(100_001).is_none());
        assert_eq!(ResponseLimit::standard().get(), DEFAULT_RESPONSE_LIMIT);
    }
}
