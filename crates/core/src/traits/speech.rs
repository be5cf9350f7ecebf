//! Speech processing traits

use crate::{Result, TranscriptionResult, VoiceQuery};
use async_trait::async_trait;

/// Speech-to-Text interface
///
/// Implementations:
/// - `HttpSttBackend` - remote ASR service (multipart upload)
///
/// `Err` means the service could not be reached or answered with a non-success
/// HTTP status. A reachable service that fails to decode the audio returns
/// `Ok` with `success = false`.
///
/// # Example
///
/// ```ignore
/// let stt: Arc<dyn SpeechToText> = Arc::new(HttpSttBackend::new(config)?);
/// let result = stt.transcribe(&query).await?;
/// println!("Transcribed: {}", result.text);
/// ```
#[async_trait]
pub trait SpeechToText: Send + Sync + 'static {
    /// Transcribe a complete recording
    async fn transcribe(&self, query: &VoiceQuery) -> Result<TranscriptionResult>;

    /// Get model or service name for logging
    fn model_name(&self) -> &str;
}
