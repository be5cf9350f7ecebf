//! Retrieval over live web results
//!
//! Features:
//! - Web search via Tavily (advanced depth)
//! - Dense passage embeddings via Ollama, or a model-free hash embedder
//! - Per-request flat L2 index for top-K passage ranking
//!
//! Nothing here persists across requests: every query builds a fresh index
//! over exactly the passages its search returned.

pub mod embeddings;
pub mod ollama_embeddings;
pub mod ranker;
pub mod web_search;

pub use embeddings::{create_embedder, EmbeddingConfig, HashEmbedder};
pub use ollama_embeddings::{OllamaEmbedder, OllamaEmbeddingConfig};
pub use ranker::{rank, squared_l2, FlatL2Index, Neighbor};
pub use web_search::{TavilyConfig, TavilySearch};

use thiserror::Error;

/// RAG errors
#[derive(Error, Debug)]
pub enum RagError {
    #[error("Embedding error: {0}")]
    Embedding(String),

    #[error("Search error: {0}")]
    Search(String),

    #[error("Index error: {0}")]
    Index(String),

    #[error("Connection error: {0}")]
    Connection(String),

    #[error("Configuration error: {0}")]
    Configuration(String),
}

impl From<RagError> for voxpedia_core::Error {
    fn from(err: RagError) -> Self {
        match err {
            RagError::Embedding(msg) => voxpedia_core::Error::Embedding(msg),
            RagError::Search(msg) | RagError::Connection(msg) => voxpedia_core::Error::Search(msg),
            RagError::Configuration(msg) => voxpedia_core::Error::Config(msg),
            other => voxpedia_core::Error::Rag(other.to_string()),
        }
    }
}
