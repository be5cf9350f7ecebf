//! VoxPedia Server
//!
//! HTTP front end for the voice query pipeline: audio upload in, grounded
//! answer with a citation out.

pub mod http;
pub mod metrics;
pub mod state;

pub use http::create_router;
pub use metrics::{init_metrics, record_query};
pub use state::AppState;

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use thiserror::Error;

/// Shown when a request carries no audio
pub const UPLOAD_HINT: &str = "Please record your question and upload the audio file";

/// Server errors
#[derive(Error, Debug)]
pub enum ServerError {
    #[error("{}", UPLOAD_HINT)]
    MissingAudio,

    #[error("Invalid request: {0}")]
    InvalidRequest(String),

    #[error("Pipeline error: {0}")]
    Pipeline(String),

    #[error("Metrics error: {0}")]
    Metrics(String),
}

impl From<ServerError> for StatusCode {
    fn from(err: ServerError) -> Self {
        (&err).into()
    }
}

impl From<&ServerError> for StatusCode {
    fn from(err: &ServerError) -> Self {
        match err {
            ServerError::MissingAudio => StatusCode::BAD_REQUEST,
            ServerError::InvalidRequest(_) => StatusCode::BAD_REQUEST,
            ServerError::Pipeline(_) => StatusCode::INTERNAL_SERVER_ERROR,
            ServerError::Metrics(_) => StatusCode::SERVICE_UNAVAILABLE,
        }
    }
}

impl IntoResponse for ServerError {
    fn into_response(self) -> Response {
        let status = StatusCode::from(&self);
        if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_codes() {
        assert_eq!(StatusCode::from(ServerError::MissingAudio), StatusCode::BAD_REQUEST);
        assert_eq!(
            StatusCode::from(ServerError::InvalidRequest("bad lang".into())),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            StatusCode::from(ServerError::Pipeline("embedder down".into())),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            StatusCode::from(ServerError::Metrics("disabled".into())),
            StatusCode::SERVICE_UNAVAILABLE
        );
    }

    #[test]
    fn test_missing_audio_message_is_upload_hint() {
        assert_eq!(ServerError::MissingAudio.to_string(), UPLOAD_HINT);
    }
}
