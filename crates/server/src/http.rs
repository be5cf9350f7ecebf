//! HTTP Endpoints
//!
//! REST API for the voice query pipeline.

use std::time::Instant;

use axum::{
    extract::{DefaultBodyLimit, Multipart, Query, State},
    http::{HeaderValue, Method},
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};
use tower_http::cors::{Any, CorsLayer};
use tower_http::limit::RequestBodyLimitLayer;
use tower_http::trace::TraceLayer;
use uuid::Uuid;
use voxpedia_core::{Language, VoiceQuery};
use voxpedia_pipeline::{QueryOutcome, VoiceAnswer};

use crate::metrics::{metrics_handler, record_query};
use crate::state::AppState;
use crate::ServerError;

const DEFAULT_ORIGIN: &str = "http://localhost:3000";

/// Create the application router
pub fn create_router(state: AppState) -> Router {
    let cors_layer = build_cors_layer(&state.config.server.cors_origins, state.config.server.cors_enabled);
    let body_limit = state.config.server.max_upload_bytes;

    Router::new()
        .route("/api/voice-query", post(voice_query))
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(body_limit))
        .layer(TraceLayer::new_for_http())
        .layer(cors_layer)
        .with_state(state)
}

/// Build CORS layer from configured origins
///
/// - disabled: permissive (development only)
/// - no origins configured: localhost:3000
fn build_cors_layer(origins: &[String], enabled: bool) -> CorsLayer {
    if !enabled {
        tracing::warn!("CORS is disabled - allowing all origins (NOT FOR PRODUCTION)");
        return CorsLayer::permissive();
    }

    let parsed_origins: Vec<HeaderValue> = origins
        .iter()
        .filter_map(|origin| {
            origin.parse::<HeaderValue>().ok().or_else(|| {
                tracing::warn!("Invalid CORS origin: {}", origin);
                None
            })
        })
        .collect();

    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers(Any);

    if parsed_origins.is_empty() {
        tracing::info!("No valid CORS origins configured, defaulting to {}", DEFAULT_ORIGIN);
        return cors.allow_origin(HeaderValue::from_static(DEFAULT_ORIGIN));
    }

    tracing::info!("CORS configured with {} origins", parsed_origins.len());
    cors.allow_origin(parsed_origins)
}

/// Optional query-string parameters for `POST /api/voice-query`
#[derive(Debug, Default, Deserialize)]
pub struct VoiceQueryParams {
    pub lang: Option<String>,
}

/// Response body for `POST /api/voice-query`
#[derive(Debug, Serialize, Deserialize)]
pub struct VoiceQueryResponse {
    pub request_id: Uuid,
    pub answer: String,
    pub source: String,
    pub outcome: QueryOutcome,
    /// Answer and source rendered for chat display
    pub markdown: String,
}

impl From<VoiceAnswer> for VoiceQueryResponse {
    fn from(answer: VoiceAnswer) -> Self {
        let markdown = answer.to_markdown();
        Self {
            request_id: answer.request_id,
            answer: answer.text,
            source: answer.citation,
            outcome: answer.outcome,
            markdown,
        }
    }
}

struct Upload {
    audio: Vec<u8>,
    file_name: Option<String>,
    lang: Option<String>,
}

async fn read_upload(mut multipart: Multipart) -> Result<Upload, ServerError> {
    let mut upload = Upload {
        audio: Vec::new(),
        file_name: None,
        lang: None,
    };

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ServerError::InvalidRequest(e.to_string()))?
    {
        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                upload.file_name = field.file_name().map(str::to_string);
                upload.audio = field
                    .bytes()
                    .await
                    .map_err(|e| ServerError::InvalidRequest(e.to_string()))?
                    .to_vec();
            }
            Some("lang") => {
                let lang = field
                    .text()
                    .await
                    .map_err(|e| ServerError::InvalidRequest(e.to_string()))?;
                if !lang.trim().is_empty() {
                    upload.lang = Some(lang.trim().to_string());
                }
            }
            other => tracing::debug!(field = ?other, "Ignoring multipart field"),
        }
    }

    Ok(upload)
}

/// `POST /api/voice-query`
///
/// Multipart upload: `file` (audio, required) and `lang` (optional; the
/// `?lang=` query parameter is also accepted).
pub async fn voice_query(
    State(state): State<AppState>,
    Query(params): Query<VoiceQueryParams>,
    multipart: Multipart,
) -> Result<Json<VoiceQueryResponse>, ServerError> {
    let upload = read_upload(multipart).await?;
    if upload.audio.is_empty() {
        return Err(ServerError::MissingAudio);
    }

    let language = match upload.lang.or(params.lang) {
        Some(code) => code
            .parse::<Language>()
            .map_err(|e| ServerError::InvalidRequest(e.to_string()))?,
        None => state.config.pipeline.source_language,
    };

    let mut query = VoiceQuery::new(upload.audio, language);
    if let Some(name) = upload.file_name {
        query = query.with_file_name(name);
    }

    let start = Instant::now();
    match state.pipeline.run(query).await {
        Ok(answer) => {
            record_query(answer.outcome.as_str(), start.elapsed());
            Ok(Json(answer.into()))
        }
        Err(e) => {
            record_query("error", start.elapsed());
            Err(ServerError::Pipeline(e.to_string()))
        }
    }
}

/// Health check
async fn health_check() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "version": env!("CARGO_PKG_VERSION"),
    }))
}
