//! Text Embeddings
//!
//! Generates dense embeddings for passage ranking.

use std::sync::Arc;

use async_trait::async_trait;
use voxpedia_config::{EmbeddingBackend, EmbeddingSettings};
use voxpedia_core::Embedder;

use crate::ollama_embeddings::{OllamaEmbedder, OllamaEmbeddingConfig};
use crate::RagError;

/// Embedding configuration
#[derive(Debug, Clone)]
pub struct EmbeddingConfig {
    /// Embedding dimension
    pub embedding_dim: usize,
    /// Normalize embeddings to unit length
    pub normalize: bool,
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            embedding_dim: voxpedia_config::constants::models::EMBEDDING_DIM,
            normalize: true,
        }
    }
}

/// Hash-based embedder (no model required)
///
/// Character histogram folded into `embedding_dim` buckets. Identical texts map
/// to identical vectors, which is all ranking tests and offline runs need.
pub struct HashEmbedder {
    config: EmbeddingConfig,
}

impl HashEmbedder {
    pub fn new(config: EmbeddingConfig) -> Self {
        Self { config }
    }

    /// Generate a simple hash-based embedding
    pub fn embed_one(&self, text: &str) -> Vec<f32> {
        let dim = self.config.embedding_dim.max(1);
        let mut embedding = vec![0.0f32; dim];

        for (i, c) in text.chars().enumerate() {
            let idx = (c as usize + i) % dim;
            embedding[idx] += 1.0;
        }

        if self.config.normalize {
            let norm: f32 = embedding.iter().map(|x| x * x).sum::<f32>().sqrt();
            if norm > 0.0 {
                for v in &mut embedding {
                    *v /= norm;
                }
            }
        }

        embedding
    }
}

#[async_trait]
impl Embedder for HashEmbedder {
    async fn embed(&self, texts: &[&str]) -> voxpedia_core::Result<Vec<Vec<f32>>> {
        Ok(texts.iter().map(|t| self.embed_one(t)).collect())
    }

    fn dim(&self) -> usize {
        self.config.embedding_dim.max(1)
    }

    fn model_name(&self) -> &str {
        "hash"
    }
}

/// Create embedder based on config
pub fn create_embedder(settings: &EmbeddingSettings) -> Result<Arc<dyn Embedder>, RagError> {
    match settings.provider {
        EmbeddingBackend::Ollama => {
            let config = OllamaEmbeddingConfig {
                endpoint: settings.endpoint.clone(),
                model: settings.model.clone(),
                embedding_dim: settings.dim,
                timeout_ms: settings.timeout_ms,
            };
            tracing::info!(model = %config.model, endpoint = %config.endpoint, "Using Ollama embedder");
            Ok(Arc::new(OllamaEmbedder::new(config)?))
        }
        EmbeddingBackend::Hash => {
            tracing::info!(dim = settings.dim, "Using hash embedder (no model)");
            Ok(Arc::new(HashEmbedder::new(EmbeddingConfig {
                embedding_dim: settings.dim,
                normalize: true,
            })))
        }
    }
}
