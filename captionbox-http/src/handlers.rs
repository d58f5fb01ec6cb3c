use axum::{
    Json,
    extract::{Path, Request, State},
    middleware::Next,
    response::{IntoResponse, Response},
};
use captionbox::{
    AvailableTracks, CaptionSource, Chapter, SubtitleFormat, ToolResult, TrackKind, VideoInfo,
    metrics::{record_error, record_request},
    tools,
};
use http::{StatusCode, header};
use serde::{Deserialize, Serialize};
use serde_json::{Value, json};

use crate::{ApiError, AppState};

fn default_lang() -> String {
    "en".to_owned()
}

#[derive(Debug, Deserialize)]
pub(crate) struct SubtitlesRequest {
    url: String,
    #[serde(default, rename = "type")]
    kind: TrackKind,
    #[serde(default = "default_lang")]
    lang: String,
}

#[derive(Debug, Deserialize)]
pub(crate) struct VideoRequest {
    url: String,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct SubtitlesResponse {
    video_id: String,
    #[serde(rename = "type")]
    kind: TrackKind,
    lang: String,
    text: String,
    length: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct RawSubtitlesResponse {
    video_id: String,
    #[serde(rename = "type")]
    kind: TrackKind,
    lang: String,
    format: SubtitleFormat,
    content: String,
    length: usize,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct AvailableResponse {
    video_id: String,
    #[serde(flatten)]
    tracks: AvailableTracks,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct VideoInfoResponse {
    video_id: String,
    #[serde(flatten)]
    info: VideoInfo,
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct ChaptersResponse {
    video_id: String,
    chapters: Vec<Chapter>,
}

/// Counts every request and every 4xx/5xx answer.
pub(crate) async fn track_requests(request: Request, next: Next) -> Response {
    record_request();
    let response = next.run(request).await;
    let status = response.status();
    if status.is_client_error() || status.is_server_error() {
        record_error();
    }
    response
}

pub(crate) async fn health() -> Json<Value> {
    Json(json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}

pub(crate) async fn metrics<S>(State(state): State<AppState<S>>) -> Response
where
    S: CaptionSource,
{
    match &state.prometheus {
        Some(handle) => (
            [(header::CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
            handle.render(),
        )
            .into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

pub(crate) async fn subtitles<S>(
    State(state): State<AppState<S>>,
    Json(request): Json<SubtitlesRequest>,
) -> Result<Json<SubtitlesResponse>, ApiError>
where
    S: CaptionSource,
{
    let selector = state
        .facade
        .selector(&request.url, request.kind, &request.lang)?;
    let text = state.facade.get_full_transcript(&selector).await?;
    Ok(Json(SubtitlesResponse {
        video_id: selector.video_id().to_owned(),
        kind: selector.kind(),
        lang: selector.lang().to_owned(),
        length: text.chars().count(),
        text,
    }))
}

pub(crate) async fn raw_subtitles<S>(
    State(state): State<AppState<S>>,
    Json(request): Json<SubtitlesRequest>,
) -> Result<Json<RawSubtitlesResponse>, ApiError>
where
    S: CaptionSource,
{
    let selector = state
        .facade
        .selector(&request.url, request.kind, &request.lang)?;
    let (format, content) = state.facade.get_full_raw_content(&selector).await?;
    Ok(Json(RawSubtitlesResponse {
        video_id: selector.video_id().to_owned(),
        kind: selector.kind(),
        lang: selector.lang().to_owned(),
        format,
        length: content.chars().count(),
        content,
    }))
}

pub(crate) async fn available<S>(
    State(state): State<AppState<S>>,
    Json(request): Json<VideoRequest>,
) -> Result<Json<AvailableResponse>, ApiError>
where
    S: CaptionSource,
{
    let video_id = state.facade.resolve_video(&request.url)?;
    let tracks = state.facade.get_available_tracks(&video_id).await?;
    Ok(Json(AvailableResponse { video_id, tracks }))
}

pub(crate) async fn video_info<S>(
    State(state): State<AppState<S>>,
    Json(request): Json<VideoRequest>,
) -> Result<Json<VideoInfoResponse>, ApiError>
where
    S: CaptionSource,
{
    let video_id = state.facade.resolve_video(&request.url)?;
    let info = state.facade.get_video_info(&video_id).await?;
    Ok(Json(VideoInfoResponse { video_id, info }))
}

pub(crate) async fn video_chapters<S>(
    State(state): State<AppState<S>>,
    Json(request): Json<VideoRequest>,
) -> Result<Json<ChaptersResponse>, ApiError>
where
    S: CaptionSource,
{
    let video_id = state.facade.resolve_video(&request.url)?;
    let chapters = state.facade.get_chapters(&video_id).await?;
    Ok(Json(ChaptersResponse { video_id, chapters }))
}

pub(crate) async fn list_tools() -> Json<Value> {
    Json(json!({ "tools": tools::descriptors() }))
}

pub(crate) async fn call_tool<S>(
    State(state): State<AppState<S>>,
    Path(name): Path<String>,
    Json(args): Json<Value>,
) -> Result<Json<ToolResult>, ApiError>
where
    S: CaptionSource,
{
    Ok(Json(state.tools.call(&name, args).await?))
}
