//! Router tests against a pipeline wired to in-process fakes

use std::sync::Arc;

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{header, Request, StatusCode};
use axum::Router;
use tower::ServiceExt;
use voxpedia_config::Settings;
use voxpedia_core::{
    Embedder, Error, Language, LanguageModel, Result, SearchDepth, SearchHit, SpeechToText,
    TranscriptionResult, Translator, VoiceQuery, WebSearch,
};
use voxpedia_llm::RetryPolicy;
use voxpedia_pipeline::{Collaborators, PipelineSettings, QueryOutcome, VoiceQueryPipeline};
use voxpedia_rag::{EmbeddingConfig, HashEmbedder};
use voxpedia_server::http::VoiceQueryResponse;
use voxpedia_server::{create_router, AppState, UPLOAD_HINT};

const BOUNDARY: &str = "voxpedia-test-boundary";

/// Echoes the requested language back as the transcript
struct EchoStt;

#[async_trait]
impl SpeechToText for EchoStt {
    async fn transcribe(&self, query: &VoiceQuery) -> Result<TranscriptionResult> {
        Ok(TranscriptionResult::success(format!(
            "question in {}",
            query.language().name()
        )))
    }

    fn model_name(&self) -> &str {
        "echo"
    }
}

struct UpperTranslator;

#[async_trait]
impl Translator for UpperTranslator {
    async fn translate(&self, text: &str, _from: Language, _to: Language) -> Result<String> {
        Ok(text.to_uppercase())
    }

    fn supports_pair(&self, _from: Language, _to: Language) -> bool {
        true
    }

    fn name(&self) -> &str {
        "upper"
    }
}

struct StaticSearch;

#[async_trait]
impl WebSearch for StaticSearch {
    async fn search(&self, _query: &str, _depth: SearchDepth) -> Result<Vec<SearchHit>> {
        Ok(vec![
            SearchHit::new("first passage", "https://example.org/first"),
            SearchHit::new("second passage", "https://example.org/second"),
        ])
    }

    fn name(&self) -> &str {
        "static"
    }
}

struct BrokenEmbedder;

#[async_trait]
impl Embedder for BrokenEmbedder {
    async fn embed(&self, _texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        Err(Error::Embedding("embedding model offline".into()))
    }

    fn dim(&self) -> usize {
        384
    }

    fn model_name(&self) -> &str {
        "broken"
    }
}

struct CannedLlm;

#[async_trait]
impl LanguageModel for CannedLlm {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        Ok("A grounded answer.".to_string())
    }

    fn model_name(&self) -> &str {
        "canned"
    }
}

fn router_with(embedder: Arc<dyn Embedder>) -> Router {
    let collaborators = Collaborators {
        stt: Arc::new(EchoStt),
        translator: Arc::new(UpperTranslator),
        search: Arc::new(StaticSearch),
        embedder,
        llm: Arc::new(CannedLlm),
    };
    let settings = Settings::default();
    let pipeline = VoiceQueryPipeline::new(
        collaborators,
        PipelineSettings::from(&settings.pipeline),
        RetryPolicy::default(),
    );
    create_router(AppState::new(settings, pipeline, None))
}

fn router() -> Router {
    router_with(Arc::new(HashEmbedder::new(EmbeddingConfig::default())))
}

fn multipart_body(parts: &[(&str, Option<&str>, &[u8])]) -> Vec<u8> {
    let mut body = Vec::new();
    for (name, file_name, data) in parts {
        body.extend_from_slice(format!("--{}\r\n", BOUNDARY).as_bytes());
        match file_name {
            Some(file_name) => body.extend_from_slice(
                format!(
                    "Content-Disposition: form-data; name=\"{}\"; filename=\"{}\"\r\n\
                     Content-Type: application/octet-stream\r\n\r\n",
                    name, file_name
                )
                .as_bytes(),
            ),
            None => body.extend_from_slice(
                format!("Content-Disposition: form-data; name=\"{}\"\r\n\r\n", name).as_bytes(),
            ),
        }
        body.extend_from_slice(data);
        body.extend_from_slice(b"\r\n");
    }
    body.extend_from_slice(format!("--{}--\r\n", BOUNDARY).as_bytes());
    body
}

fn upload_request(uri: &str, body: Vec<u8>) -> Request<Body> {
    Request::builder()
        .method("POST")
        .uri(uri)
        .header(
            header::CONTENT_TYPE,
            format!("multipart/form-data; boundary={}", BOUNDARY),
        )
        .body(Body::from(body))
        .unwrap()
}

async fn json_body(response: axum::response::Response) -> serde_json::Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn test_health() {
    let response = router()
        .oneshot(Request::get("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["status"], "ok");
}

#[tokio::test]
async fn test_voice_query_answers_with_citation() {
    let body = multipart_body(&[("file", Some("question.wav"), b"RIFF....WAVE")]);
    let response = router()
        .oneshot(upload_request("/api/voice-query", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    let parsed: VoiceQueryResponse = serde_json::from_slice(&bytes).unwrap();

    assert_eq!(parsed.outcome, QueryOutcome::Answered);
    assert_eq!(parsed.answer, "A grounded answer.");
    assert_eq!(parsed.source, "https://example.org/first");
    assert_eq!(
        parsed.markdown,
        "**Answer:** A grounded answer.\n\n**Source:** https://example.org/first"
    );
}

#[tokio::test]
async fn test_lang_field_selects_language() {
    let body = multipart_body(&[
        ("lang", None, b"hi"),
        ("file", Some("question.webm"), b"\x1aE\xdf\xa3"),
    ]);
    let response = router()
        .oneshot(upload_request("/api/voice-query", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["outcome"], "answered");
}

#[tokio::test]
async fn test_lang_query_param_accepted() {
    let body = multipart_body(&[("file", Some("q.wav"), b"audio")]);
    let response = router()
        .oneshot(upload_request("/api/voice-query?lang=te", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
}

#[tokio::test]
async fn test_missing_file_returns_upload_hint() {
    let body = multipart_body(&[("lang", None, b"ta")]);
    let response = router()
        .oneshot(upload_request("/api/voice-query", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["error"], UPLOAD_HINT);
}

#[tokio::test]
async fn test_empty_file_returns_upload_hint() {
    let body = multipart_body(&[("file", Some("empty.wav"), b"")]);
    let response = router()
        .oneshot(upload_request("/api/voice-query", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_unknown_language_rejected() {
    let body = multipart_body(&[("file", Some("q.wav"), b"audio"), ("lang", None, b"klingon")]);
    let response = router()
        .oneshot(upload_request("/api/voice-query", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn test_embedding_failure_is_server_error() {
    let body = multipart_body(&[("file", Some("q.wav"), b"audio")]);
    let response = router_with(Arc::new(BrokenEmbedder))
        .oneshot(upload_request("/api/voice-query", body))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
    let error = json_body(response).await["error"].as_str().unwrap().to_string();
    assert!(error.contains("embedding model offline"));
}

#[tokio::test]
async fn test_metrics_disabled() {
    let response = router()
        .oneshot(Request::get("/metrics").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::SERVICE_UNAVAILABLE);
}
