//! Voice query pipeline
//!
//! One spoken question in, one grounded answer with a citation out:
//!
//! 1. transcribe the recording (remote ASR service)
//! 2. translate the transcript into the search language
//! 3. search the web
//! 4. embed and rank the results, keeping the nearest passages
//! 5. generate an answer from the ranked context, retrying on rate limits
//!
//! Every stage failure ends the run in a named [`QueryOutcome`] with a
//! user-facing message; only a failed embedding is returned as an error.

pub mod orchestrator;
pub mod stt;

pub use orchestrator::{
    build_collaborators, Collaborators, PipelineSettings, QueryOutcome, VoiceAnswer,
    VoiceQueryPipeline, NO_CITATION,
};
pub use stt::{HttpSttBackend, HttpSttConfig};

use thiserror::Error;

/// Pipeline errors
#[derive(Error, Debug)]
pub enum PipelineError {
    #[error("STT error: {0}")]
    Stt(String),

    #[error("ASR service returned {status}: {body}")]
    AsrStatus { status: u16, body: String },

    #[error("Invalid ASR response: {0}")]
    InvalidResponse(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<PipelineError> for voxpedia_core::Error {
    fn from(err: PipelineError) -> Self {
        match err {
            PipelineError::Configuration(msg) => voxpedia_core::Error::Config(msg),
            other => voxpedia_core::Error::Stt(other.to_string()),
        }
    }
}
