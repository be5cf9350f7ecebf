//! Configuration management for the voice query pipeline
//!
//! Supports loading configuration from:
//! - TOML/YAML/JSON files in `config/` (`default.*`, then `{env}.*`)
//! - Environment variables (`VOXPEDIA__` prefix, `__` section separator)
//!
//! API keys are expected from the environment, e.g.
//! `VOXPEDIA__LLM__API_KEY`, `VOXPEDIA__SEARCH__API_KEY`,
//! `VOXPEDIA__TRANSLATION__API_KEY`.

pub mod constants;
pub mod settings;

pub use settings::{
    load_settings, load_settings_from, AsrConfig, EmbeddingBackend, EmbeddingSettings,
    LlmSettings, ObservabilityConfig, PipelineConfig, RetryConfig, RuntimeEnvironment,
    SearchConfig, ServerConfig, Settings, TranslationBackend, TranslationSettings,
};

use thiserror::Error;

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Configuration file not found: {0}")]
    FileNotFound(String),

    #[error("Failed to parse configuration: {0}")]
    ParseError(String),

    #[error("Missing required field: {0}")]
    MissingField(String),

    #[error("Invalid value for {field}: {message}")]
    InvalidValue { field: String, message: String },
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ParseError(err.to_string())
    }
}

impl From<ConfigError> for voxpedia_core::Error {
    fn from(err: ConfigError) -> Self {
        voxpedia_core::Error::Config(err.to_string())
    }
}
