//! Embedding trait

use crate::Result;
use async_trait::async_trait;

/// Dense text embedder
///
/// Implementations:
/// - `OllamaEmbedder` - Ollama `/api/embed`
/// - `HashEmbedder` - deterministic, model-free (offline runs and tests)
#[async_trait]
pub trait Embedder: Send + Sync + 'static {
    /// Embed texts, one vector per input, order preserved.
    ///
    /// Every returned vector has length `dim()`.
    async fn embed(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>>;

    /// Embedding dimension
    fn dim(&self) -> usize;

    fn model_name(&self) -> &str;
}
