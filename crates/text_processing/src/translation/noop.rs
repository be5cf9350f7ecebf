//! Pass-through translator

use async_trait::async_trait;
use voxpedia_core::{Language, Translator};

/// Returns its input unchanged. Used when the spoken language already is the
/// search language.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoopTranslator;

impl NoopTranslator {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl Translator for NoopTranslator {
    async fn translate(
        &self,
        text: &str,
        _from: Language,
        _to: Language,
    ) -> voxpedia_core::Result<String> {
        Ok(text.trim().to_string())
    }

    fn supports_pair(&self, _from: Language, _to: Language) -> bool {
        true
    }

    fn name(&self) -> &str {
        "noop"
    }
}
