//! Main settings module

use config::{Config, Environment, File};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use voxpedia_core::{Language, SearchDepth};

use crate::constants::{endpoints, models, rag, retry, server, timeouts};
use crate::ConfigError;

/// Runtime environment
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RuntimeEnvironment {
    /// Development mode - relaxed validation, warnings only
    #[default]
    Development,
    /// Staging mode - stricter validation
    Staging,
    /// Production mode - all validations enforced
    Production,
}

impl RuntimeEnvironment {
    pub fn is_production(&self) -> bool {
        matches!(self, Self::Production)
    }

    /// Check if strict validation should be applied
    pub fn is_strict(&self) -> bool {
        matches!(self, Self::Production | Self::Staging)
    }
}

/// Main application settings
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Settings {
    #[serde(default)]
    pub environment: RuntimeEnvironment,

    #[serde(default)]
    pub server: ServerConfig,

    /// Stage parameters for the voice query pipeline
    #[serde(default)]
    pub pipeline: PipelineConfig,

    #[serde(default)]
    pub asr: AsrConfig,

    #[serde(default)]
    pub translation: TranslationSettings,

    #[serde(default)]
    pub search: SearchConfig,

    #[serde(default)]
    pub embedding: EmbeddingSettings,

    #[serde(default)]
    pub llm: LlmSettings,

    /// Retry policy for answer generation
    #[serde(default)]
    pub retry: RetryConfig,

    #[serde(default)]
    pub observability: ObservabilityConfig,
}

/// Server configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_host")]
    pub host: String,

    #[serde(default = "default_port")]
    pub port: u16,

    /// Enable CORS
    #[serde(default = "default_true")]
    pub cors_enabled: bool,

    /// CORS allowed origins (empty = localhost only)
    #[serde(default)]
    pub cors_origins: Vec<String>,

    /// Maximum upload size in bytes
    #[serde(default = "default_max_upload_bytes")]
    pub max_upload_bytes: usize,
}

fn default_host() -> String {
    "0.0.0.0".to_string()
}
fn default_port() -> u16 {
    server::PORT
}
fn default_true() -> bool {
    true
}
fn default_max_upload_bytes() -> usize {
    server::MAX_UPLOAD_BYTES
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            port: default_port(),
            cors_enabled: true,
            cors_origins: Vec::new(),
            max_upload_bytes: default_max_upload_bytes(),
        }
    }
}

/// Pipeline stage parameters
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PipelineConfig {
    /// Language users speak (used when a request does not name one)
    #[serde(default = "default_source_language")]
    pub source_language: Language,

    /// Working language for search and generation
    #[serde(default)]
    pub target_language: Language,

    /// Passages kept as grounding context
    #[serde(default = "default_top_k")]
    pub top_k: usize,

    #[serde(default)]
    pub search_depth: SearchDepth,

    /// Results requested from the search provider
    #[serde(default = "default_max_search_results")]
    pub max_search_results: usize,
}

fn default_source_language() -> Language {
    Language::Tamil
}
fn default_top_k() -> usize {
    rag::DEFAULT_TOP_K
}
fn default_max_search_results() -> usize {
    rag::MAX_SEARCH_RESULTS
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            source_language: default_source_language(),
            target_language: Language::English,
            top_k: default_top_k(),
            search_depth: SearchDepth::Advanced,
            max_search_results: default_max_search_results(),
        }
    }
}

/// ASR service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AsrConfig {
    #[serde(default = "default_asr_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_asr_timeout")]
    pub timeout_ms: u64,
}

fn default_asr_endpoint() -> String {
    endpoints::ASR_DEFAULT.to_string()
}
fn default_asr_timeout() -> u64 {
    timeouts::ASR_MS
}

impl Default for AsrConfig {
    fn default() -> Self {
        Self {
            endpoint: default_asr_endpoint(),
            timeout_ms: default_asr_timeout(),
        }
    }
}

/// Translation providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum TranslationBackend {
    /// Sarvam AI translate API
    #[default]
    Sarvam,
    /// Pass-through (same-language deployments)
    Disabled,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TranslationSettings {
    #[serde(default)]
    pub provider: TranslationBackend,

    #[serde(default = "default_translation_endpoint")]
    pub endpoint: String,

    /// Subscription key (set via VOXPEDIA__TRANSLATION__API_KEY)
    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_translation_model")]
    pub model: String,

    #[serde(default = "default_translation_timeout")]
    pub timeout_ms: u64,
}

fn default_translation_endpoint() -> String {
    endpoints::SARVAM_DEFAULT.to_string()
}
fn default_translation_model() -> String {
    models::TRANSLATION_DEFAULT.to_string()
}
fn default_translation_timeout() -> u64 {
    timeouts::TRANSLATION_MS
}

impl Default for TranslationSettings {
    fn default() -> Self {
        Self {
            provider: TranslationBackend::Sarvam,
            endpoint: default_translation_endpoint(),
            api_key: None,
            model: default_translation_model(),
            timeout_ms: default_translation_timeout(),
        }
    }
}

/// Web search configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchConfig {
    #[serde(default = "default_search_endpoint")]
    pub endpoint: String,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_search_timeout")]
    pub timeout_ms: u64,
}

fn default_search_endpoint() -> String {
    endpoints::TAVILY_DEFAULT.to_string()
}
fn default_search_timeout() -> u64 {
    timeouts::SEARCH_MS
}

impl Default for SearchConfig {
    fn default() -> Self {
        Self {
            endpoint: default_search_endpoint(),
            api_key: None,
            timeout_ms: default_search_timeout(),
        }
    }
}

/// Embedding providers
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum EmbeddingBackend {
    #[default]
    Ollama,
    /// Deterministic hash embedder, no model required
    Hash,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EmbeddingSettings {
    #[serde(default)]
    pub provider: EmbeddingBackend,

    #[serde(default = "default_embedding_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_embedding_model")]
    pub model: String,

    #[serde(default = "default_embedding_dim")]
    pub dim: usize,

    #[serde(default = "default_embedding_timeout")]
    pub timeout_ms: u64,
}

fn default_embedding_endpoint() -> String {
    endpoints::OLLAMA_DEFAULT.to_string()
}
fn default_embedding_model() -> String {
    models::EMBEDDING_DEFAULT.to_string()
}
fn default_embedding_dim() -> usize {
    models::EMBEDDING_DIM
}
fn default_embedding_timeout() -> u64 {
    timeouts::EMBEDDING_MS
}

impl Default for EmbeddingSettings {
    fn default() -> Self {
        Self {
            provider: EmbeddingBackend::Ollama,
            endpoint: default_embedding_endpoint(),
            model: default_embedding_model(),
            dim: default_embedding_dim(),
            timeout_ms: default_embedding_timeout(),
        }
    }
}

/// Answer-generation model configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmSettings {
    #[serde(default = "default_llm_endpoint")]
    pub endpoint: String,

    #[serde(default = "default_llm_model")]
    pub model: String,

    #[serde(default)]
    pub api_key: Option<String>,

    #[serde(default = "default_llm_timeout")]
    pub timeout_ms: u64,
}

fn default_llm_endpoint() -> String {
    endpoints::GEMINI_DEFAULT.to_string()
}
fn default_llm_model() -> String {
    models::LLM_DEFAULT.to_string()
}
fn default_llm_timeout() -> u64 {
    timeouts::LLM_MS
}

impl Default for LlmSettings {
    fn default() -> Self {
        Self {
            endpoint: default_llm_endpoint(),
            model: default_llm_model(),
            api_key: None,
            timeout_ms: default_llm_timeout(),
        }
    }
}

/// Retry policy for rate-limited answer generation
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RetryConfig {
    /// Total attempts including the first
    #[serde(default = "default_max_attempts")]
    pub max_attempts: u32,

    /// Fixed wait between attempts
    #[serde(default = "default_backoff_secs")]
    pub backoff_secs: u64,
}

fn default_max_attempts() -> u32 {
    retry::MAX_ATTEMPTS
}
fn default_backoff_secs() -> u64 {
    retry::BACKOFF_SECS
}

impl RetryConfig {
    pub fn backoff(&self) -> Duration {
        Duration::from_secs(self.backoff_secs)
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: default_max_attempts(),
            backoff_secs: default_backoff_secs(),
        }
    }
}

/// Observability configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ObservabilityConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Enable JSON logging
    #[serde(default)]
    pub log_json: bool,

    /// Expose Prometheus metrics at /metrics
    #[serde(default = "default_true")]
    pub metrics_enabled: bool,
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            log_json: false,
            metrics_enabled: true,
        }
    }
}

impl Settings {
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate settings
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.validate_pipeline()?;
        self.validate_timeouts()?;
        self.validate_retry()?;
        self.validate_credentials()?;
        Ok(())
    }

    fn validate_pipeline(&self) -> Result<(), ConfigError> {
        let pipeline = &self.pipeline;

        if pipeline.top_k == 0 {
            return Err(ConfigError::InvalidValue {
                field: "pipeline.top_k".to_string(),
                message: "Must be at least 1".to_string(),
            });
        }

        if pipeline.max_search_results == 0 {
            return Err(ConfigError::InvalidValue {
                field: "pipeline.max_search_results".to_string(),
                message: "Must be at least 1".to_string(),
            });
        }

        if pipeline.top_k > pipeline.max_search_results {
            tracing::warn!(
                top_k = pipeline.top_k,
                max_search_results = pipeline.max_search_results,
                "pipeline.top_k exceeds max_search_results, context will be limited by search"
            );
        }

        if self.embedding.dim == 0 {
            return Err(ConfigError::InvalidValue {
                field: "embedding.dim".to_string(),
                message: "Must be at least 1".to_string(),
            });
        }

        Ok(())
    }

    /// Every remote call needs a finite, non-zero timeout
    fn validate_timeouts(&self) -> Result<(), ConfigError> {
        let timeouts = [
            ("asr.timeout_ms", self.asr.timeout_ms),
            ("translation.timeout_ms", self.translation.timeout_ms),
            ("search.timeout_ms", self.search.timeout_ms),
            ("embedding.timeout_ms", self.embedding.timeout_ms),
            ("llm.timeout_ms", self.llm.timeout_ms),
        ];

        for (field, value) in timeouts {
            if value == 0 {
                return Err(ConfigError::InvalidValue {
                    field: field.to_string(),
                    message: "Timeout must be greater than zero".to_string(),
                });
            }
        }

        Ok(())
    }

    fn validate_retry(&self) -> Result<(), ConfigError> {
        if self.retry.max_attempts == 0 {
            return Err(ConfigError::InvalidValue {
                field: "retry.max_attempts".to_string(),
                message: "Must be at least 1".to_string(),
            });
        }
        Ok(())
    }

    /// Missing API keys are fatal in staging/production, a warning otherwise
    fn validate_credentials(&self) -> Result<(), ConfigError> {
        let mut missing = Vec::new();
        if self.translation.provider == TranslationBackend::Sarvam
            && self.translation.api_key.is_none()
        {
            missing.push("translation.api_key");
        }
        if self.search.api_key.is_none() {
            missing.push("search.api_key");
        }
        if self.llm.api_key.is_none() {
            missing.push("llm.api_key");
        }

        if missing.is_empty() {
            return Ok(());
        }

        if self.environment.is_strict() {
            return Err(ConfigError::MissingField(missing.join(", ")));
        }

        tracing::warn!(
            missing = ?missing,
            "API keys not configured; affected stages will fail at request time"
        );
        Ok(())
    }
}

/// Load settings from `config/` relative to the working directory
pub fn load_settings(env: Option<&str>) -> Result<Settings, ConfigError> {
    load_settings_from("config", env)
}

/// Load settings from a config directory.
///
/// Priority: env vars > {dir}/{env}.* > {dir}/default.* > defaults
pub fn load_settings_from(dir: impl AsRef<Path>, env: Option<&str>) -> Result<Settings, ConfigError> {
    let dir = dir.as_ref();
    let mut builder = Config::builder();

    builder = builder.add_source(File::from(dir.join("default")).required(false));

    if let Some(env_name) = env {
        builder = builder.add_source(File::from(dir.join(env_name)).required(false));
    }

    builder = builder.add_source(
        Environment::with_prefix("VOXPEDIA")
            .separator("__")
            .try_parsing(true),
    );

    let config = builder.build()?;
    let settings: Settings = config.try_deserialize()?;

    settings.validate()?;

    Ok(settings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_default_settings() {
        let settings = Settings::default();
        assert_eq!(settings.server.port, 7860);
        assert_eq!(settings.pipeline.top_k, 2);
        assert_eq!(settings.pipeline.source_language, Language::Tamil);
        assert_eq!(settings.pipeline.target_language, Language::English);
        assert_eq!(settings.pipeline.search_depth, SearchDepth::Advanced);
        assert_eq!(settings.retry.max_attempts, 3);
        assert_eq!(settings.retry.backoff(), Duration::from_secs(60));
    }

    #[test]
    fn test_default_settings_valid_in_development() {
        assert!(Settings::default().validate().is_ok());
    }

    #[test]
    fn test_missing_keys_rejected_in_production() {
        let mut settings = Settings::default();
        settings.environment = RuntimeEnvironment::Production;
        assert!(matches!(
            settings.validate(),
            Err(ConfigError::MissingField(_))
        ));

        settings.translation.api_key = Some("t".into());
        settings.search.api_key = Some("s".into());
        settings.llm.api_key = Some("l".into());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_disabled_translation_needs_no_key() {
        let mut settings = Settings::default();
        settings.environment = RuntimeEnvironment::Production;
        settings.translation.provider = TranslationBackend::Disabled;
        settings.search.api_key = Some("s".into());
        settings.llm.api_key = Some("l".into());
        assert!(settings.validate().is_ok());
    }

    #[test]
    fn test_zero_top_k_rejected() {
        let mut settings = Settings::default();
        settings.pipeline.top_k = 0;
        assert!(settings.validate_pipeline().is_err());
    }

    #[test]
    fn test_zero_timeout_rejected() {
        let mut settings = Settings::default();
        settings.llm.timeout_ms = 0;
        let err = settings.validate().unwrap_err();
        assert!(err.to_string().contains("llm.timeout_ms"));
    }

    #[test]
    fn test_zero_attempts_rejected() {
        let mut settings = Settings::default();
        settings.retry.max_attempts = 0;
        assert!(settings.validate_retry().is_err());
    }

    #[test]
    fn test_load_from_file_overrides_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let mut file = std::fs::File::create(dir.path().join("default.toml")).unwrap();
        writeln!(
            file,
            r#"
[pipeline]
source_language = "hindi"
top_k = 3

[retry]
backoff_secs = 5
"#
        )
        .unwrap();

        let settings = load_settings_from(dir.path(), None).unwrap();
        assert_eq!(settings.pipeline.source_language, Language::Hindi);
        assert_eq!(settings.pipeline.top_k, 3);
        assert_eq!(settings.retry.backoff_secs, 5);
        // untouched sections keep defaults
        assert_eq!(settings.server.port, 7860);
    }

    #[test]
    fn test_language_codes_accepted_in_file() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(
            dir.path().join("default.toml"),
            "[pipeline]\nsource_language = \"ta\"\ntarget_language = \"en-IN\"\n",
        )
        .unwrap();

        let settings = load_settings_from(dir.path(), None).unwrap();
        assert_eq!(settings.pipeline.source_language, Language::Tamil);
        assert_eq!(settings.pipeline.target_language, Language::English);
    }

    #[test]
    fn test_env_file_layers_over_default() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("default.toml"), "[server]\nport = 9000\n").unwrap();
        std::fs::write(dir.path().join("staging.toml"), "[server]\nport = 9100\n").unwrap();

        let settings = load_settings_from(dir.path(), Some("staging")).unwrap();
        assert_eq!(settings.server.port, 9100);
    }

    #[test]
    fn test_invalid_file_fails_validation() {
        let dir = tempfile::tempdir().unwrap();
        std::fs::write(dir.path().join("default.toml"), "[pipeline]\ntop_k = 0\n").unwrap();

        assert!(load_settings_from(dir.path(), None).is_err());
    }
}
