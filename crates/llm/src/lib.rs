//! Grounded answer generation
//!
//! Features:
//! - Gemini `generateContent` backend
//! - Grounded prompt construction from ranked web context
//! - Resilient caller: bounded fixed-backoff retry on rate-limit failures

pub mod backend;
pub mod prompt;
pub mod retry;

pub use backend::{GeminiBackend, LlmConfig};
pub use prompt::GroundedPrompt;
pub use retry::{CallOutcome, ResilientCaller, RetryPolicy, Sleeper, TokioSleeper};

use thiserror::Error;

/// LLM errors
#[derive(Error, Debug)]
pub enum LlmError {
    #[error("API error: {0}")]
    Api(String),

    /// HTTP 429 or a `RESOURCE_EXHAUSTED` status from the provider
    #[error("Rate limited: {0}")]
    RateLimited(String),

    #[error("Network error: {0}")]
    Network(String),

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Timeout")]
    Timeout,

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<reqwest::Error> for LlmError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_timeout() {
            LlmError::Timeout
        } else {
            LlmError::Network(err.to_string())
        }
    }
}

impl From<LlmError> for voxpedia_core::Error {
    fn from(err: LlmError) -> Self {
        match err {
            LlmError::RateLimited(msg) => voxpedia_core::Error::ResourceExhausted(msg),
            other => voxpedia_core::Error::Llm(other.to_string()),
        }
    }
}
