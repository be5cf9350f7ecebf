//! Sarvam AI translator
//!
//! `POST {endpoint}/translate` with the subscription key header. Languages
//! are sent as `xx-IN` locale codes.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use voxpedia_config::constants::{endpoints, models, timeouts};
use voxpedia_config::TranslationSettings;
use voxpedia_core::{Language, Translator};

use crate::TranslationError;

/// Sarvam translator configuration
#[derive(Debug, Clone)]
pub struct SarvamTranslatorConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub model: String,
    pub timeout_ms: u64,
}

impl Default for SarvamTranslatorConfig {
    fn default() -> Self {
        Self {
            endpoint: endpoints::SARVAM_DEFAULT.to_string(),
            api_key: None,
            model: models::TRANSLATION_DEFAULT.to_string(),
            timeout_ms: timeouts::TRANSLATION_MS,
        }
    }
}

impl From<&TranslationSettings> for SarvamTranslatorConfig {
    fn from(settings: &TranslationSettings) -> Self {
        Self {
            endpoint: settings.endpoint.clone(),
            api_key: settings.api_key.clone(),
            model: settings.model.clone(),
            timeout_ms: settings.timeout_ms,
        }
    }
}

#[derive(Debug, Serialize)]
struct TranslateRequest<'a> {
    input: &'a str,
    source_language_code: String,
    target_language_code: String,
    model: &'a str,
}

#[derive(Debug, Deserialize)]
struct TranslateResponse {
    #[serde(default)]
    translated_text: Option<String>,
}

/// Sarvam AI translate client
pub struct SarvamTranslator {
    client: Client,
    config: SarvamTranslatorConfig,
}

impl SarvamTranslator {
    pub fn new(config: SarvamTranslatorConfig) -> crate::Result<Self> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| {
                TranslationError::Configuration(format!("Failed to create HTTP client: {}", e))
            })?;

        Ok(Self { client, config })
    }

    /// Translate one text. A response without `translated_text` yields an
    /// empty string.
    pub async fn translate_text(
        &self,
        text: &str,
        from: Language,
        to: Language,
    ) -> crate::Result<String> {
        let input = text.trim();
        if input.is_empty() {
            return Ok(String::new());
        }

        let api_key = self.config.api_key.as_deref().ok_or_else(|| {
            TranslationError::Configuration("Sarvam API key not configured".to_string())
        })?;

        let request = TranslateRequest {
            input,
            source_language_code: from.locale(),
            target_language_code: to.locale(),
            model: &self.config.model,
        };

        let url = format!("{}/translate", self.config.endpoint.trim_end_matches('/'));
        let response = self
            .client
            .post(&url)
            .header("api-subscription-key", api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| TranslationError::Request(e.to_string()))?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(TranslationError::Provider {
                status: status.as_u16(),
                body,
            });
        }

        let parsed: TranslateResponse = response
            .json()
            .await
            .map_err(|e| TranslationError::InvalidResponse(e.to_string()))?;

        Ok(translated_text(parsed))
    }
}

fn translated_text(response: TranslateResponse) -> String {
    response
        .translated_text
        .map(|t| t.trim().to_string())
        .unwrap_or_default()
}

#[async_trait]
impl Translator for SarvamTranslator {
    async fn translate(
        &self,
        text: &str,
        from: Language,
        to: Language,
    ) -> voxpedia_core::Result<String> {
        if !self.supports_pair(from, to) {
            return Err(TranslationError::UnsupportedPair {
                from: from.to_string(),
                to: to.to_string(),
            }
            .into());
        }
        Ok(self.translate_text(text, from, to).await?)
    }

    fn supports_pair(&self, from: Language, to: Language) -> bool {
        from != to
    }

    fn name(&self) -> &str {
        "sarvam"
    }
}
