//! Centralized constants for the voice query pipeline
//!
//! Single source of truth for default endpoints, timeouts and retrieval
//! parameters. Settings defaults and client `Default` impls read from here.

/// Service endpoints (defaults for local development)
pub mod endpoints {
    /// Local ASR service (multipart `/transcribe`)
    pub const ASR_DEFAULT: &str = "http://127.0.0.1:8000";

    /// Sarvam AI translation API
    pub const SARVAM_DEFAULT: &str = "https://api.sarvam.ai";

    /// Tavily web search API
    pub const TAVILY_DEFAULT: &str = "https://api.tavily.com";

    /// Ollama embedding endpoint
    pub const OLLAMA_DEFAULT: &str = "http://localhost:11434";

    /// Google Generative Language API
    pub const GEMINI_DEFAULT: &str = "https://generativelanguage.googleapis.com";
}

/// Model identifiers
pub mod models {
    pub const TRANSLATION_DEFAULT: &str = "sarvam-translate:v1";

    /// MiniLM sentence embedder as published by Ollama
    pub const EMBEDDING_DEFAULT: &str = "all-minilm";

    /// Output dimension of `all-minilm`
    pub const EMBEDDING_DIM: usize = 384;

    pub const LLM_DEFAULT: &str = "gemini-2.5-flash-lite";
}

/// Timeouts (in milliseconds)
pub mod timeouts {
    /// ASR includes server-side audio sanitization, so it gets the most room
    pub const ASR_MS: u64 = 120_000;

    pub const TRANSLATION_MS: u64 = 30_000;

    pub const SEARCH_MS: u64 = 60_000;

    pub const EMBEDDING_MS: u64 = 30_000;

    pub const LLM_MS: u64 = 60_000;
}

/// Answer-generation retry defaults
pub mod retry {
    /// Total attempts, including the first one
    pub const MAX_ATTEMPTS: u32 = 3;

    /// Fixed wait between attempts (seconds)
    pub const BACKOFF_SECS: u64 = 60;
}

/// Retrieval defaults
pub mod rag {
    /// Passages kept as grounding context
    pub const DEFAULT_TOP_K: usize = 2;

    /// Results requested from the web search provider
    pub const MAX_SEARCH_RESULTS: usize = 5;
}

/// Server defaults
pub mod server {
    pub const PORT: u16 = 7860;

    /// Maximum accepted upload (bytes)
    pub const MAX_UPLOAD_BYTES: usize = 25 * 1024 * 1024;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_retrieval_defaults_consistent() {
        assert!(rag::DEFAULT_TOP_K <= rag::MAX_SEARCH_RESULTS);
        assert!(retry::MAX_ATTEMPTS >= 1);
    }
}
