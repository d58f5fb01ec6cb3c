use std::sync::Arc;

use axum_test::TestServer;
use captionbox::{CacheStore, Chapter, ParseError, RetrievalFacade, SubtitleFormat, VideoInfo};
use captionbox_http::{AppState, router};
use captionbox_test::durable_env;
use captionbox_test::mock_backend::{MockBackend, MockConnector};
use captionbox_test::mock_source::MockSource;
use http::StatusCode;
use pretty_assertions::assert_eq;
use serde_json::{Value, json};

const VIDEO: &str = "dQw4w9WgXcQ";
const URL: &str = "https://youtu.be/dQw4w9WgXcQ";
const SRT: &str = "1\n00:00:01,000 --> 00:00:02,000\nHello <i>World</i>\n\n2\n00:00:02,500 --> 00:00:04,000\nSecond line\n";

fn server(source: MockSource) -> TestServer {
    let store = CacheStore::new(durable_env(), MockConnector::new(MockBackend::new()));
    let facade = RetrievalFacade::new(source, Arc::new(store));
    TestServer::new(router(AppState::new(Arc::new(facade)))).unwrap()
}

#[tokio::test]
async fn health_reports_version() {
    let response = server(MockSource::new()).get("/health").await;

    response.assert_status_ok();
    response.assert_json(&json!({ "status": "ok", "version": "0.1.0" }));
}

#[tokio::test]
async fn subtitles_returns_plain_text() {
    let source = MockSource::new().with_subtitles(SRT);

    let response = server(source)
        .post("/subtitles")
        .json(&json!({ "url": URL, "type": "official", "lang": "en" }))
        .await;

    response.assert_status_ok();
    response.assert_json(&json!({
        "videoId": VIDEO,
        "type": "official",
        "lang": "en",
        "text": "Hello World\nSecond line",
        "length": 23
    }));
}

#[tokio::test]
async fn subtitles_defaults_to_auto_english() {
    let source = MockSource::new().with_subtitles(SRT);

    let response = server(source.clone())
        .post("/subtitles")
        .json(&json!({ "url": VIDEO }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["type"], "auto");
    assert_eq!(body["lang"], "en");
}

#[tokio::test]
async fn subtitles_error_statuses() {
    let cases = [
        (
            MockSource::new(),
            json!({ "url": "not a video" }),
            StatusCode::BAD_REQUEST,
            "Invalid YouTube URL or video ID.",
        ),
        (
            MockSource::new(),
            json!({ "url": VIDEO }),
            StatusCode::NOT_FOUND,
            "Subtitles not found",
        ),
        (
            MockSource::new()
                .with_subtitles("garbage")
                .with_parse_error(ParseError::MalformedJson("bad".to_owned())),
            json!({ "url": VIDEO }),
            StatusCode::UNPROCESSABLE_ENTITY,
            "bad",
        ),
        (
            MockSource::new().failing(),
            json!({ "url": VIDEO }),
            StatusCode::BAD_GATEWAY,
            "extractor exited with status 1",
        ),
    ];

    for (source, body, status, message) in cases {
        let response = server(source).post("/subtitles").json(&body).await;

        response.assert_status(status);
        let error: Value = response.json();
        let text = error["error"].as_str().unwrap();
        assert!(text.contains(message), "{status}: {text}");
    }
}

#[tokio::test]
async fn raw_subtitles_returns_format() {
    let source = MockSource::new().with_subtitles(SRT);

    let response = server(source)
        .post("/subtitles/raw")
        .json(&json!({ "url": URL }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["videoId"], VIDEO);
    assert_eq!(body["format"], json!(SubtitleFormat::Srt));
    assert_eq!(body["content"], SRT);
    assert_eq!(body["length"], SRT.chars().count());
}

#[tokio::test]
async fn available_lists_tracks() {
    let source = MockSource::new().with_tracks(&["en"], &["en", "de"]);

    let response = server(source)
        .post("/subtitles/available")
        .json(&json!({ "url": URL }))
        .await;

    response.assert_status_ok();
    response.assert_json(&json!({
        "videoId": VIDEO,
        "official": ["en"],
        "auto": ["en", "de"]
    }));
}

#[tokio::test]
async fn video_info_and_chapters() {
    let info = VideoInfo {
        id: VIDEO.to_owned(),
        title: Some("Title".to_owned()),
        duration: Some(212.0),
        ..VideoInfo::default()
    };
    let chapters = vec![Chapter {
        start_time: 0.0,
        end_time: 212.0,
        title: "Song".to_owned(),
    }];
    let server = server(
        MockSource::new()
            .with_video_info(info)
            .with_chapters(chapters),
    );

    let response = server
        .post("/video/info")
        .json(&json!({ "url": VIDEO }))
        .await;
    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["videoId"], VIDEO);
    assert_eq!(body["title"], "Title");
    assert_eq!(body["duration"], 212.0);

    let response = server
        .post("/video/chapters")
        .json(&json!({ "url": VIDEO }))
        .await;
    response.assert_status_ok();
    response.assert_json(&json!({
        "videoId": VIDEO,
        "chapters": [{ "startTime": 0.0, "endTime": 212.0, "title": "Song" }]
    }));
}

#[tokio::test]
async fn video_info_not_found() {
    let response = server(MockSource::new())
        .post("/video/info")
        .json(&json!({ "url": VIDEO }))
        .await;

    response.assert_status_not_found();
    response.assert_json(&json!({
        "error": "Failed to fetch video info for \"dQw4w9WgXcQ\"."
    }));
}

#[tokio::test]
async fn lists_tools() {
    let response = server(MockSource::new()).get("/mcp/tools").await;

    response.assert_status_ok();
    let body: Value = response.json();
    let names: Vec<&str> = body["tools"]
        .as_array()
        .unwrap()
        .iter()
        .map(|tool| tool["name"].as_str().unwrap())
        .collect();
    assert_eq!(
        names,
        vec![
            "get_transcript",
            "get_raw_subtitles",
            "get_available_subtitles",
            "get_video_info",
            "get_video_chapters",
        ]
    );
}

#[tokio::test]
async fn calls_tool() {
    let source = MockSource::new()
        .with_subtitles("subtitle content")
        .with_normalized("abcdefghij");

    let response = server(source)
        .post("/mcp/tools/get_transcript/call")
        .json(&json!({ "url": URL, "response_limit": 4 }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["isError"], false);
    assert_eq!(body["content"], json!([{ "type": "text", "text": "abcd" }]));
    assert_eq!(body["structuredContent"]["next_cursor"], "4");
}

#[tokio::test]
async fn tool_error_result_is_ok_response() {
    let response = server(MockSource::new())
        .post("/mcp/tools/get_video_chapters/call")
        .json(&json!({ "url": "invalid" }))
        .await;

    response.assert_status_ok();
    let body: Value = response.json();
    assert_eq!(body["isError"], true);
}

#[tokio::test]
async fn unknown_tool_is_not_found() {
    let response = server(MockSource::new())
        .post("/mcp/tools/get_comments/call")
        .json(&json!({ "url": VIDEO }))
        .await;

    response.assert_status_not_found();
}

#[tokio::test]
async fn invalid_cursor_is_bad_request() {
    let source = MockSource::new()
        .with_subtitles("subtitle content")
        .with_normalized("short");

    let response = server(source)
        .post("/mcp/tools/get_transcript/call")
        .json(&json!({ "url": VIDEO, "next_cursor": "abc" }))
        .await;

    response.assert_status_bad_request();
    response.assert_json(&json!({ "error": "Invalid next_cursor value." }));
}

#[tokio::test]
async fn metrics_without_exporter_is_not_found() {
    let response = server(MockSource::new()).get("/metrics").await;

    response.assert_status_not_found();
}
