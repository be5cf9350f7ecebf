//! Voice query submitted to the pipeline

use bytes::Bytes;

use crate::Language;

/// An audio recording plus the language it was spoken in.
///
/// Immutable once built; the pipeline drops it after transcription.
#[derive(Debug, Clone)]
pub struct VoiceQuery {
    audio: Bytes,
    language: Language,
    file_name: Option<String>,
}

impl VoiceQuery {
    pub fn new(audio: impl Into<Bytes>, language: Language) -> Self {
        Self {
            audio: audio.into(),
            language,
            file_name: None,
        }
    }

    /// Attach the uploaded file name so the ASR service can sniff the container
    pub fn with_file_name(mut self, name: impl Into<String>) -> Self {
        self.file_name = Some(name.into());
        self
    }

    pub fn audio(&self) -> &Bytes {
        &self.audio
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn file_name(&self) -> Option<&str> {
        self.file_name.as_deref()
    }

    pub fn is_empty(&self) -> bool {
        self.audio.is_empty()
    }
}
