//! HTTP STT Backend - calls an external ASR service
//!
//! The service takes a whole recording as a multipart upload
//! (`POST /transcribe?lang=ta`, field `file`) and sanitizes/decodes it
//! server-side, so any container the service's decoder accepts can be sent
//! as-is.
//!
//! A reachable service that fails to process the audio still answers 200
//! with `{"status": "error", "message": ...}`; that is reported as an
//! unsuccessful [`TranscriptionResult`], not as an `Err`.

use std::time::{Duration, Instant};

use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use serde::Deserialize;
use voxpedia_config::constants::{endpoints, timeouts};
use voxpedia_config::AsrConfig;
use voxpedia_core::{SpeechToText, TranscriptionResult, VoiceQuery};

use crate::PipelineError;

const DEFAULT_FILE_NAME: &str = "query.wav";

/// HTTP STT Backend configuration
#[derive(Debug, Clone)]
pub struct HttpSttConfig {
    /// Base URL of the ASR service
    pub url: String,
    /// Request timeout in milliseconds
    pub timeout_ms: u64,
}

impl Default for HttpSttConfig {
    fn default() -> Self {
        Self {
            url: endpoints::ASR_DEFAULT.to_string(),
            timeout_ms: timeouts::ASR_MS,
        }
    }
}

impl From<&AsrConfig> for HttpSttConfig {
    fn from(config: &AsrConfig) -> Self {
        Self {
            url: config.endpoint.clone(),
            timeout_ms: config.timeout_ms,
        }
    }
}

/// Response from the ASR service
#[derive(Debug, Deserialize)]
struct SttResponse {
    status: String,
    #[serde(default)]
    transcription: Option<String>,
    #[serde(default)]
    message: Option<String>,
}

impl From<SttResponse> for TranscriptionResult {
    fn from(response: SttResponse) -> Self {
        if response.status.eq_ignore_ascii_case("success") {
            TranscriptionResult::success(response.transcription.unwrap_or_default())
        } else {
            TranscriptionResult::failure(
                response
                    .message
                    .unwrap_or_else(|| format!("ASR status '{}'", response.status)),
            )
        }
    }
}

/// HTTP STT Backend
pub struct HttpSttBackend {
    config: HttpSttConfig,
    client: reqwest::Client,
}

impl HttpSttBackend {
    /// Create a new HTTP STT backend
    pub fn new(config: HttpSttConfig) -> Result<Self, PipelineError> {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| {
                PipelineError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { config, client })
    }

    fn transcribe_url(&self) -> String {
        format!("{}/transcribe", self.config.url.trim_end_matches('/'))
    }

    /// Upload the recording and parse the service reply
    pub async fn transcribe_query(
        &self,
        query: &VoiceQuery,
    ) -> Result<TranscriptionResult, PipelineError> {
        let start = Instant::now();
        let file_name = query.file_name().unwrap_or(DEFAULT_FILE_NAME).to_string();
        let part = Part::bytes(query.audio().to_vec()).file_name(file_name);
        let form = Form::new().part("file", part);

        let response = self
            .client
            .post(self.transcribe_url())
            .query(&[("lang", query.language().code())])
            .multipart(form)
            .send()
            .await
            .map_err(|e| PipelineError::Stt(format!("ASR request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(PipelineError::AsrStatus {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: SttResponse = response
            .json()
            .await
            .map_err(|e| PipelineError::InvalidResponse(e.to_string()))?;

        let result = TranscriptionResult::from(parsed);
        if !result.success {
            tracing::warn!(message = %result.text, "ASR service could not process audio");
        }
        tracing::debug!(
            elapsed_ms = start.elapsed().as_millis() as u64,
            bytes = query.audio().len(),
            success = result.success,
            "ASR request complete"
        );

        Ok(result)
    }
}

#[async_trait]
impl SpeechToText for HttpSttBackend {
    async fn transcribe(&self, query: &VoiceQuery) -> voxpedia_core::Result<TranscriptionResult> {
        Ok(self.transcribe_query(query).await?)
    }

    fn model_name(&self) -> &str {
        "http-asr"
    }
}
