//! Core traits and types for the voice query pipeline
//!
//! This crate provides foundational types used across all other crates:
//! - Collaborator traits for pluggable backends (STT, translation, search, embeddings, LLM)
//! - Language definitions
//! - Voice query, transcript and search hit types
//! - Error types

pub mod error;
pub mod language;
pub mod search;
pub mod traits;
pub mod transcript;
pub mod voice_query;

pub use error::{Error, Result};
pub use language::Language;
pub use search::{SearchDepth, SearchHit};
pub use transcript::TranscriptionResult;
pub use voice_query::VoiceQuery;

pub use traits::{Embedder, LanguageModel, SpeechToText, Translator, WebSearch};
