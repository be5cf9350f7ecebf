//! Error types shared across crates

use thiserror::Error;

/// Cross-crate error type
///
/// Crate-local errors (`RagError`, `LlmError`, ...) convert into this at the
/// trait boundary so the orchestrator only deals with one taxonomy.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum Error {
    #[error("STT error: {0}")]
    Stt(String),

    #[error("Translation error: {0}")]
    Translation(String),

    #[error("Search error: {0}")]
    Search(String),

    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Retrieval error: {0}")]
    Rag(String),

    #[error("LLM error: {0}")]
    Llm(String),

    /// Rate-limited or quota-exhausted remote service.
    ///
    /// This is the only class the resilient caller retries.
    #[error("Resource exhausted: {0}")]
    ResourceExhausted(String),

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Timeout after {0}ms")]
    Timeout(u64),
}

impl Error {
    /// Whether this error belongs to the rate-limit / resource-exhausted class
    pub fn is_resource_exhausted(&self) -> bool {
        matches!(self, Error::ResourceExhausted(_))
    }
}

pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resource_exhausted_classification() {
        assert!(Error::ResourceExhausted("429".into()).is_resource_exhausted());
        assert!(!Error::Llm("boom".into()).is_resource_exhausted());
        assert!(!Error::Timeout(100).is_resource_exhausted());
    }

    #[test]
    fn test_display() {
        let err = Error::Embedding("model missing".into());
        assert_eq!(err.to_string(), "Embedding error: model missing");
    }
}
