use axum::{
    Json,
    response::{IntoResponse, Response},
};
use captionbox::{RetrievalError, ToolError};
use http::StatusCode;
use serde_json::json;
use tracing::warn;

/// A failed request, rendered as `{"error": message}`.
#[derive(Debug)]
pub struct ApiError {
    status: StatusCode,
    message: String,
}

impl ApiError {
    pub fn new(status: StatusCode, message: impl Into<String>) -> Self {
        Self {
            status,
            message: message.into(),
        }
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }
}

impl From<RetrievalError> for ApiError {
    fn from(error: RetrievalError) -> Self {
        let status = match &error {
            RetrievalError::InvalidReference
            | RetrievalError::InvalidLanguage
            | RetrievalError::InvalidCursor(_) => StatusCode::BAD_REQUEST,
            RetrievalError::NotFound(_) => StatusCode::NOT_FOUND,
            RetrievalError::ParseFailure(_) => StatusCode::UNPROCESSABLE_ENTITY,
            RetrievalError::Source(source) => {
                warn!(error = %source, "Caption source failed");
                StatusCode::BAD_GATEWAY
            }
        };
        Self::new(status, error.to_string())
    }
}

impl From<ToolError> for ApiError {
    fn from(error: ToolError) -> Self {
        let status = match &error {
            ToolError::UnknownTool(_) => StatusCode::NOT_FOUND,
            ToolError::InvalidArguments(_) | ToolError::InvalidCursor(_) => {
                StatusCode::BAD_REQUEST
            }
            ToolError::Source(source) => {
                warn!(error = %source, "Caption source failed");
                StatusCode::BAD_GATEWAY
            }
        };
        Self::new(status, error.to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        (self.status, Json(json!({ "error": self.message }))).into_response()
    }
}
