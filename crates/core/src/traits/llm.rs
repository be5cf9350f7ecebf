//! Language model trait

use crate::Result;
use async_trait::async_trait;

/// Answer-generation interface
///
/// Implementations:
/// - `GeminiBackend` - Google Gemini `generateContent`
///
/// Rate-limit and quota failures must surface as
/// [`Error::ResourceExhausted`](crate::Error::ResourceExhausted); that is the
/// only class the resilient caller retries.
#[async_trait]
pub trait LanguageModel: Send + Sync + 'static {
    /// Generate a completion for a single prompt
    async fn generate(&self, prompt: &str) -> Result<String>;

    /// Get model name
    fn model_name(&self) -> &str;
}
