//! Ollama Embeddings
//!
//! Uses Ollama's batch embedding API (`/api/embed`) for generating dense
//! vectors. One request per batch; the response must carry exactly one vector
//! per input, each of the configured dimension.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use voxpedia_config::constants::{endpoints, models, timeouts};
use voxpedia_core::Embedder;

use crate::RagError;

/// Ollama embedding configuration
#[derive(Debug, Clone)]
pub struct OllamaEmbeddingConfig {
    /// Ollama API endpoint
    pub endpoint: String,
    /// Model name
    pub model: String,
    /// Embedding dimension
    pub embedding_dim: usize,
    /// Request timeout
    pub timeout_ms: u64,
}

impl Default for OllamaEmbeddingConfig {
    fn default() -> Self {
        Self {
            endpoint: endpoints::OLLAMA_DEFAULT.to_string(),
            model: models::EMBEDDING_DEFAULT.to_string(),
            embedding_dim: models::EMBEDDING_DIM,
            timeout_ms: timeouts::EMBEDDING_MS,
        }
    }
}

/// Request to Ollama embedding API
#[derive(Debug, Serialize)]
struct EmbedRequest<'a> {
    model: &'a str,
    input: &'a [&'a str],
}

/// Response from Ollama embedding API
#[derive(Debug, Deserialize)]
struct EmbedResponse {
    embeddings: Vec<Vec<f32>>,
}

/// Ollama embedder
pub struct OllamaEmbedder {
    client: Client,
    config: OllamaEmbeddingConfig,
}

impl OllamaEmbedder {
    pub fn new(config: OllamaEmbeddingConfig) -> Result<Self, RagError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| RagError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Embed multiple texts in one request
    pub async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>, RagError> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }

        let request = EmbedRequest {
            model: &self.config.model,
            input: texts,
        };

        let url = format!("{}/api/embed", self.config.endpoint.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| RagError::Embedding(format!("Ollama request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let text = response.text().await.unwrap_or_default();
            return Err(RagError::Embedding(format!(
                "Ollama embedding failed: {} - {}",
                status, text
            )));
        }

        let embed_response: EmbedResponse = response
            .json()
            .await
            .map_err(|e| RagError::Embedding(format!("Failed to parse Ollama response: {}", e)))?;

        self.check_shape(texts.len(), embed_response.embeddings)
    }

    fn check_shape(
        &self,
        expected: usize,
        embeddings: Vec<Vec<f32>>,
    ) -> Result<Vec<Vec<f32>>, RagError> {
        if embeddings.len() != expected {
            return Err(RagError::Embedding(format!(
                "Expected {} embeddings, got {}",
                expected,
                embeddings.len()
            )));
        }

        if let Some(bad) = embeddings
            .iter()
            .find(|e| e.len() != self.config.embedding_dim)
        {
            return Err(RagError::Embedding(format!(
                "Embedding dimension mismatch: expected {}, got {}",
                self.config.embedding_dim,
                bad.len()
            )));
        }

        Ok(embeddings)
    }

    pub fn model(&self) -> &str {
        &self.config.model
    }
}

#[async_trait]
impl Embedder for OllamaEmbedder {
    async fn embed(&self, texts: &[&str]) -> voxpedia_core::Result<Vec<Vec<f32>>> {
        Ok(self.embed_batch(texts).await?)
    }

    fn dim(&self) -> usize {
        self.config.embedding_dim
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}
