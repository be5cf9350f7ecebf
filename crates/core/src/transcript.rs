//! Transcription result from the ASR collaborator

use serde::{Deserialize, Serialize};

/// Result of a transcription call.
///
/// `success` is false when the service processed the request but could not
/// decode the audio. Text may still be empty on success (silence).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TranscriptionResult {
    pub text: String,
    pub success: bool,
}

impl TranscriptionResult {
    pub fn success(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            success: true,
        }
    }

    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            text: message.into(),
            success: false,
        }
    }

    /// Whether the transcript carries usable text
    pub fn has_text(&self) -> bool {
        self.success && !self.text.trim().is_empty()
    }
}
