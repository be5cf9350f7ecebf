//! Query translation
//!
//! The deployment's spoken language is rendered into the search language
//! (Tamil to English by default) before web search.

mod noop;
mod sarvam;

pub use noop::NoopTranslator;
pub use sarvam::{SarvamTranslator, SarvamTranslatorConfig};

use std::sync::Arc;

use voxpedia_config::{TranslationBackend, TranslationSettings};
use voxpedia_core::Translator;

/// Create translator based on config
pub fn create_translator(settings: &TranslationSettings) -> crate::Result<Arc<dyn Translator>> {
    match settings.provider {
        TranslationBackend::Sarvam => {
            tracing::info!(
                endpoint = %settings.endpoint,
                model = %settings.model,
                "Using Sarvam translator"
            );
            let config = SarvamTranslatorConfig::from(settings);
            Ok(Arc::new(SarvamTranslator::new(config)?))
        }
        TranslationBackend::Disabled => {
            tracing::info!("Translation disabled, passing transcripts through");
            Ok(Arc::new(NoopTranslator::new()))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_create_disabled() {
        let settings = TranslationSettings {
            provider: TranslationBackend::Disabled,
            ..Default::default()
        };
        assert_eq!(create_translator(&settings).unwrap().name(), "noop");
    }

    #[test]
    fn test_create_sarvam() {
        let translator = create_translator(&TranslationSettings::default()).unwrap();
        assert_eq!(translator.name(), "sarvam");
    }
}
