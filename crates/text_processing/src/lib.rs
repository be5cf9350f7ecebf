//! Text processing for the voice query pipeline
//!
//! Currently a single concern: rendering the transcribed question into the
//! language the search and answer stages work in.
//!
//! ```ignore
//! use voxpedia_text_processing::create_translator;
//!
//! let translator = create_translator(&settings.translation)?;
//! let english = translator.translate(&transcript, Language::Tamil, Language::English).await?;
//! ```

pub mod translation;

pub use translation::{
    create_translator, NoopTranslator, SarvamTranslator, SarvamTranslatorConfig,
};

use thiserror::Error;

/// Translation errors
#[derive(Error, Debug)]
pub enum TranslationError {
    #[error("Translation request failed: {0}")]
    Request(String),

    #[error("Translation provider error {status}: {body}")]
    Provider { status: u16, body: String },

    #[error("Invalid translation response: {0}")]
    InvalidResponse(String),

    #[error("Unsupported language pair: {from} -> {to}")]
    UnsupportedPair { from: String, to: String },

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<TranslationError> for voxpedia_core::Error {
    fn from(err: TranslationError) -> Self {
        match err {
            TranslationError::Configuration(msg) => voxpedia_core::Error::Config(msg),
            other => voxpedia_core::Error::Translation(other.to_string()),
        }
    }
}

pub type Result<T> = std::result::Result<T, TranslationError>;
