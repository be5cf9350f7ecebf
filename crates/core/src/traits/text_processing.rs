//! Text processing traits

use crate::{Language, Result};
use async_trait::async_trait;

/// Translation interface
///
/// Implementations:
/// - `SarvamTranslator` - Sarvam AI translate API
/// - `NoopTranslator` - pass-through for same-language deployments
#[async_trait]
pub trait Translator: Send + Sync + 'static {
    /// Translate `text` from `from` to `to`.
    ///
    /// An empty string means the provider answered without a translation.
    async fn translate(&self, text: &str, from: Language, to: Language) -> Result<String>;

    /// Check if translation pair is supported
    fn supports_pair(&self, from: Language, to: Language) -> bool;

    /// Get translator name
    fn name(&self) -> &str;
}
