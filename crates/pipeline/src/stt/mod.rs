//! Speech-to-Text
//!
//! Transcription is delegated to a remote ASR service over HTTP.

mod http_backend;

pub use http_backend::{HttpSttBackend, HttpSttConfig};
