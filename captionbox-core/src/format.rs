//! Subtitle container detection and plain-text normalization.
//!
//! The extraction tool hands back subtitle files verbatim. Raw delivery only
//! needs to know which container it is looking at ([`detect`]); transcript
//! delivery needs the spoken text alone ([`to_plain_text`]).

use std::fmt;

use lazy_static::lazy_static;
use regex::Regex;
use serde::{Deserialize, Serialize};

lazy_static! {
    static ref SRT_TIMING: Regex =
        Regex::new(r"\d{1,2}:\d{2}:\d{2},\d{3}\s*-->\s*\d{1,2}:\d{2}:\d{2},\d{3}")
            .expect("valid SRT timing regex");
    static ref INLINE_TAG: Regex =
        Regex::new(r"<[^>]*>|\{\\[^}]*\}").expect("valid inline tag regex");
    static ref WHITESPACE: Regex = Regex::new(r"\s+").expect("valid whitespace regex");
}

/// Container format of a raw subtitle payload.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubtitleFormat {
    /// WebVTT.
    Vtt,
    /// SubRip.
    Srt,
    /// YouTube timed-text JSON.
    Json3,
    /// Anything else.
    Unknown,
}

impl SubtitleFormat {
    /// Returns the format tag reported to clients.
    pub fn as_str(&self) -> &'static str {
        match self {
            SubtitleFormat::Vtt => "vtt",
            SubtitleFormat::Srt => "srt",
            SubtitleFormat::Json3 => "json3",
            SubtitleFormat::Unknown => "unknown",
        }
    }
}

impl fmt::Display for SubtitleFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Raw subtitles could not be turned into plain text.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ParseError {
    /// The payload is empty or whitespace only.
    #[error("subtitle content is empty")]
    Empty,
    /// The payload is not in a known subtitle container.
    #[error("unrecognized subtitle format")]
    UnrecognizedFormat,
    /// The payload looked like timed-text JSON but did not parse.
    #[error("malformed timed-text JSON: {0}")]
    MalformedJson(String),
}

/// Detects the container format of a raw subtitle payload.
pub fn detect(raw: &str) -> SubtitleFormat {
    let head = raw.trim_start_matches('\u{feff}').trim_start();
    if head.starts_with("WEBVTT") {
        SubtitleFormat::Vtt
    } else if head.starts_with('{') && head.contains("\"events\"") {
        SubtitleFormat::Json3
    } else if SRT_TIMING.is_match(raw) {
        SubtitleFormat::Srt
    } else {
        SubtitleFormat::Unknown
    }
}

/// Normalizes a raw subtitle payload into plain text, one caption line per line.
///
/// Cue numbers, timing lines, headers, comment blocks and inline markup are
/// dropped. Consecutive identical lines are collapsed, because recognized
/// captions repeat the previous line in every rolling cue.
pub fn to_plain_text(raw: &str) -> Result<String, ParseError> {
    if raw.trim().is_empty() {
        return Err(ParseError::Empty);
    }
    let lines = match detect(raw) {
        SubtitleFormat::Vtt | SubtitleFormat::Srt => cue_lines(raw),
        SubtitleFormat::Json3 => json3_lines(raw)?,
        SubtitleFormat::Unknown => return Err(ParseError::UnrecognizedFormat),
    };

    let mut out: Vec<String> = Vec::new();
    for line in lines {
        let line = clean_line(&line);
        if line.is_empty() || out.last() == Some(&line) {
            continue;
        }
        out.push(line);
    }
    Ok(out.join("\n"))
}

/// Text lines of every block that carries a timing line; other blocks
/// (headers, NOTE, STYLE, REGION) have none and are skipped.
///
/// Blocks end at any blank line, including one holding only spaces or tabs.
fn cue_lines(raw: &str) -> Vec<String> {
    let normalized = raw.replace("\r\n", "\n").replace('\r', "\n");
    let mut lines = Vec::new();
    let mut block: Vec<&str> = Vec::new();
    for line in normalized.lines().chain(std::iter::once("")) {
        if !line.trim().is_empty() {
            block.push(line);
            continue;
        }
        if let Some(timing) = block.iter().position(|line| line.contains("-->")) {
            lines.extend(block[timing + 1..].iter().map(|line| (*line).to_owned()));
        }
        block.clear();
    }
    lines
}

#[derive(Deserialize)]
struct TimedText {
    #[serde(default)]
    events: Vec<TimedTextEvent>,
}

#[derive(Deserialize)]
struct TimedTextEvent {
    #[serde(default)]
    segs: Vec<TimedTextSegment>,
}

#[derive(Deserialize)]
struct TimedTextSegment {
    #[serde(default)]
    utf8: String,
}

fn json3_lines(raw: &str) -> Result<Vec<String>, ParseError> {
    let doc: TimedText =
        serde_json::from_str(raw).map_err(|e| ParseError::MalformedJson(e.to_string()))?;
    Ok(doc
        .events
        .into_iter()
        .map(|event| event.segs.into_iter().map(|seg| seg.utf8).collect::<String>())
        .flat_map(|text| text.lines().map(str::to_owned).collect::<Vec<_>>())
        .collect())
}

fn clean_line(line: &str) -> String {
    let stripped = INLINE_TAG.replace_all(line, "");
    let decoded = stripped
        .replace("&nbsp;", " ")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&amp;", "&");
    WHITESPACE.replace_all(decoded.trim(), " ").into_owned()
}
