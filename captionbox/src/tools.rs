//! Tool-invocation layer.
//!
//! Each tool takes a JSON argument object, validates it into an explicit
//! argument struct before any collaborator call, and answers with a
//! [`ToolResult`]: a text summary for display plus the structured payload.
//!
//! Content problems the user can act on (bad reference, missing subtitles,
//! unparseable subtitles) come back as results flagged `isError`. Protocol
//! problems (unknown tool, malformed arguments, a cursor that does not fit the
//! content) and collaborator failures fail the call with a [`ToolError`].

use std::sync::Arc;

use captionbox_core::{
    AvailableTracks, Chapter, InvalidCursor, Pagination, ResponseLimit, SubtitleFormat, TrackKind,
    VideoInfo,
};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};
use thiserror::Error;
use tracing::debug;

use crate::error::RetrievalError;
use crate::facade::RetrievalFacade;
use crate::render;
use crate::source::{CaptionSource, SourceError};

pub const GET_TRANSCRIPT: &str = "get_transcript";
pub const GET_RAW_SUBTITLES: &str = "get_raw_subtitles";
pub const GET_AVAILABLE_SUBTITLES: &str = "get_available_subtitles";
pub const GET_VIDEO_INFO: &str = "get_video_info";
pub const GET_VIDEO_CHAPTERS: &str = "get_video_chapters";

fn default_lang() -> String {
    "en".to_owned()
}

/// Arguments of the subtitle tools.
#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct SubtitleArgs {
    /// Video URL or bare id.
    pub url: String,
    #[serde(default, rename = "type")]
    pub kind: TrackKind,
    #[serde(default = "default_lang")]
    pub lang: String,
    /// Window size in characters; the deployment default when absent.
    #[serde(default)]
    pub response_limit: Option<ResponseLimit>,
    /// Cursor returned by the previous window.
    #[serde(default)]
    pub next_cursor: Option<String>,
}

/// Arguments of `get_transcript`.
pub type TranscriptArgs = SubtitleArgs;
/// Arguments of `get_raw_subtitles`.
pub type RawSubtitlesArgs = SubtitleArgs;

/// Arguments of the tools that only need a video.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct VideoArgs {
    /// Video URL or bare id.
    pub url: String,
}

/// One block of a tool result's content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Content {
    Text { text: String },
}

/// Result of a tool call.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolResult {
    pub content: Vec<Content>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub structured_content: Option<Value>,
    pub is_error: bool,
}

impl ToolResult {
    fn success(text: String, structured: Value) -> Self {
        Self {
            content: vec![Content::Text { text }],
            structured_content: Some(structured),
            is_error: false,
        }
    }

    fn error(text: String) -> Self {
        Self {
            content: vec![Content::Text { text }],
            structured_content: None,
            is_error: true,
        }
    }

    /// Text of the first content block.
    pub fn text(&self) -> &str {
        match self.content.first() {
            Some(Content::Text { text }) => text,
            None => "",
        }
    }
}

/// A tool call that could not be answered at all.
#[derive(Debug, Error)]
pub enum ToolError {
    #[error("Unknown tool \"{0}\".")]
    UnknownTool(String),
    #[error("Invalid arguments: {0}")]
    InvalidArguments(#[from] serde_json::Error),
    #[error("Invalid next_cursor value.")]
    InvalidCursor(#[source] InvalidCursor),
    #[error(transparent)]
    Source(#[from] SourceError),
}

/// Name, description and JSON schema of a tool.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ToolDescriptor {
    pub name: &'static str,
    pub description: &'static str,
    pub input_schema: Value,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TranscriptPayload<'a> {
    video_id: &'a str,
    #[serde(rename = "type")]
    kind: TrackKind,
    lang: &'a str,
    text: &'a str,
    #[serde(flatten)]
    pagination: Pagination,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct RawPayload<'a> {
    video_id: &'a str,
    #[serde(rename = "type")]
    kind: TrackKind,
    lang: &'a str,
    format: SubtitleFormat,
    content: &'a str,
    #[serde(flatten)]
    pagination: Pagination,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct TracksPayload<'a> {
    video_id: &'a str,
    #[serde(flatten)]
    tracks: &'a AvailableTracks,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct InfoPayload<'a> {
    video_id: &'a str,
    #[serde(flatten)]
    info: &'a VideoInfo,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct ChaptersPayload<'a> {
    video_id: &'a str,
    chapters: &'a [Chapter],
}

/// Splits retrieval failures into user-facing error results and call failures.
fn fail(error: RetrievalError) -> Result<ToolResult, ToolError> {
    match error {
        RetrievalError::InvalidCursor(cursor) => Err(ToolError::InvalidCursor(cursor)),
        RetrievalError::Source(source) => Err(ToolError::Source(source)),
        other => Ok(ToolResult::error(other.to_string())),
    }
}

fn structured<T: Serialize>(payload: &T) -> Result<Value, ToolError> {
    Ok(serde_json::to_value(payload)?)
}

/// Describes every tool.
pub fn descriptors() -> Vec<ToolDescriptor> {
    let subtitle_schema = json!({
        "type": "object",
        "properties": {
            "url": { "type": "string", "description": "Video URL or ID" },
            "type": { "type": "string", "enum": ["official", "auto"], "default": "auto" },
            "lang": { "type": "string", "default": "en" },
            "response_limit": { "type": "integer", "minimum": 1, "maximum": 100000 },
            "next_cursor": { "type": "string" }
        },
        "required": ["url"]
    });
    let video_schema = json!({
        "type": "object",
        "properties": {
            "url": { "type": "string", "description": "Video URL or ID" }
        },
        "required": ["url"]
    });
    vec![
        ToolDescriptor {
            name: GET_TRANSCRIPT,
            description: "Fetch the plain-text transcript of a video, paginated by next_cursor.",
            input_schema: subtitle_schema.clone(),
        },
        ToolDescriptor {
            name: GET_RAW_SUBTITLES,
            description: "Fetch raw subtitles (SRT/VTT/JSON3) of a video, paginated by next_cursor.",
            input_schema: subtitle_schema,
        },
        ToolDescriptor {
            name: GET_AVAILABLE_SUBTITLES,
            description: "List the official and auto-generated subtitle languages of a video.",
            input_schema: video_schema.clone(),
        },
        ToolDescriptor {
            name: GET_VIDEO_INFO,
            description: "Fetch video metadata: title, channel, duration, views and more.",
            input_schema: video_schema.clone(),
        },
        ToolDescriptor {
            name: GET_VIDEO_CHAPTERS,
            description: "Fetch the chapter markers of a video.",
            input_schema: video_schema,
        },
    ]
}

/// The tool set served over a [`RetrievalFacade`].
pub struct Tools<S> {
    facade: Arc<RetrievalFacade<S>>,
}

impl<S> Clone for Tools<S> {
    fn clone(&self) -> Self {
        Self {
            facade: self.facade.clone(),
        }
    }
}

impl<S> Tools<S>
where
    S: CaptionSource,
{
    pub fn new(facade: Arc<RetrievalFacade<S>>) -> Self {
        Self { facade }
    }

    /// Dispatches a call by tool name.
    pub async fn call(&self, name: &str, args: Value) -> Result<ToolResult, ToolError> {
        debug!(tool = name, "Tool call");
        match name {
            GET_TRANSCRIPT => self.get_transcript(serde_json::from_value(args)?).await,
            GET_RAW_SUBTITLES => self.get_raw_subtitles(serde_json::from_value(args)?).await,
            GET_AVAILABLE_SUBTITLES => {
                self.get_available_subtitles(serde_json::from_value(args)?)
                    .await
            }
            GET_VIDEO_INFO => self.get_video_info(serde_json::from_value(args)?).await,
            GET_VIDEO_CHAPTERS => self.get_video_chapters(serde_json::from_value(args)?).await,
            other => Err(ToolError::UnknownTool(other.to_owned())),
        }
    }

    pub async fn get_transcript(&self, args: TranscriptArgs) -> Result<ToolResult, ToolError> {
        let selector = match self.facade.selector(&args.url, args.kind, &args.lang) {
            Ok(selector) => selector,
            Err(error) => return fail(error),
        };
        let limit = args.response_limit.unwrap_or_else(ResponseLimit::standard);
        let window = match self
            .facade
            .get_transcript(&selector, limit, args.next_cursor.as_deref())
            .await
        {
            Ok(window) => window,
            Err(error) => return fail(error),
        };
        let (text, pagination) = window.into_parts();
        let payload = structured(&TranscriptPayload {
            video_id: selector.video_id(),
            kind: selector.kind(),
            lang: selector.lang(),
            text: &text,
            pagination,
        })?;
        Ok(ToolResult::success(text, payload))
    }

    pub async fn get_raw_subtitles(
        &self,
        args: RawSubtitlesArgs,
    ) -> Result<ToolResult, ToolError> {
        let selector = match self.facade.selector(&args.url, args.kind, &args.lang) {
            Ok(selector) => selector,
            Err(error) => return fail(error),
        };
        let limit = args.response_limit.unwrap_or_else(ResponseLimit::standard);
        let raw = match self
            .facade
            .get_raw_content(&selector, limit, args.next_cursor.as_deref())
            .await
        {
            Ok(raw) => raw,
            Err(error) => return fail(error),
        };
        let (content, pagination) = raw.window.into_parts();
        let payload = structured(&RawPayload {
            video_id: selector.video_id(),
            kind: selector.kind(),
            lang: selector.lang(),
            format: raw.format,
            content: &content,
            pagination,
        })?;
        Ok(ToolResult::success(content, payload))
    }

    pub async fn get_available_subtitles(
        &self,
        args: VideoArgs,
    ) -> Result<ToolResult, ToolError> {
        let video_id = match self.facade.resolve_video(&args.url) {
            Ok(video_id) => video_id,
            Err(error) => return fail(error),
        };
        let tracks = match self.facade.get_available_tracks(&video_id).await {
            Ok(tracks) => tracks,
            Err(error) => return fail(error),
        };
        let payload = structured(&TracksPayload {
            video_id: &video_id,
            tracks: &tracks,
        })?;
        Ok(ToolResult::success(render::tracks(&video_id, &tracks), payload))
    }

    pub async fn get_video_info(&self, args: VideoArgs) -> Result<ToolResult, ToolError> {
        let video_id = match self.facade.resolve_video(&args.url) {
            Ok(video_id) => video_id,
            Err(error) => return fail(error),
        };
        let info = match self.facade.get_video_info(&video_id).await {
            Ok(info) => info,
            Err(error) => return fail(error),
        };
        let payload = structured(&InfoPayload {
            video_id: &video_id,
            info: &info,
        })?;
        Ok(ToolResult::success(render::video_info(&info), payload))
    }

    pub async fn get_video_chapters(&self, args: VideoArgs) -> Result<ToolResult, ToolError> {
        let video_id = match self.facade.resolve_video(&args.url) {
            Ok(video_id) => video_id,
            Err(error) => return fail(error),
        };
        let chapters = match self.facade.get_chapters(&video_id).await {
            Ok(chapters) => chapters,
            Err(error) => return fail(error),
        };
        let payload = structured(&ChaptersPayload {
            video_id: &video_id,
            chapters: &chapters,
        })?;
        Ok(ToolResult::success(
            render::chapters(&video_id, &chapters),
            payload,
        ))
    }
}
