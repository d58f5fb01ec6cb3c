//! HTTP surface of captionbox.
//!
//! [`router`] builds an axum [`Router`](axum::Router) over an [`AppState`]:
//!
//! | method | path | body | answer |
//! |--------|------|------|--------|
//! | GET | `/health` | | `{status, version}` |
//! | GET | `/metrics` | | Prometheus text |
//! | POST | `/subtitles` | `{url, type?, lang?}` | `{videoId, type, lang, text, length}` |
//! | POST | `/subtitles/raw` | `{url, type?, lang?}` | `{videoId, type, lang, format, content, length}` |
//! | POST | `/subtitles/available` | `{url}` | `{videoId, official, auto}` |
//! | POST | `/video/info` | `{url}` | `{videoId, ...info}` |
//! | POST | `/video/chapters` | `{url}` | `{videoId, chapters}` |
//! | GET | `/mcp/tools` | | `{tools}` |
//! | POST | `/mcp/tools/{name}/call` | tool arguments | tool result |
//!
//! Errors answer `{"error": message}` with 400 for invalid input, 404 when
//! nothing was found, 422 when subtitles could not be parsed and 502 when the
//! caption source failed.

mod error;
mod handlers;
mod state;

pub use error::ApiError;
pub use state::AppState;

use axum::{
    Router, middleware,
    routing::{get, post},
};
use captionbox::CaptionSource;
use metrics_exporter_prometheus::{BuildError, PrometheusBuilder, PrometheusHandle};
use tower::ServiceBuilder;

/// Builds the router serving every endpoint over `state`.
pub fn router<S>(state: AppState<S>) -> Router
where
    S: CaptionSource + 'static,
{
    Router::new()
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics::<S>))
        .route("/subtitles", post(handlers::subtitles::<S>))
        .route("/subtitles/raw", post(handlers::raw_subtitles::<S>))
        .route("/subtitles/available", post(handlers::available::<S>))
        .route("/video/info", post(handlers::video_info::<S>))
        .route("/video/chapters", post(handlers::video_chapters::<S>))
        .route("/mcp/tools", get(handlers::list_tools))
        .route("/mcp/tools/{name}/call", post(handlers::call_tool::<S>))
        .layer(ServiceBuilder::new().layer(middleware::from_fn(handlers::track_requests)))
        .with_state(state)
}

/// Installs the Prometheus recorder as the global `metrics` recorder.
///
/// Pass the handle to [`AppState::with_prometheus`] to serve `/metrics`.
pub fn install_prometheus() -> Result<PrometheusHandle, BuildError> {
    PrometheusBuilder::new().install_recorder()
}
