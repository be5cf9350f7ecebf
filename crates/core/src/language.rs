//! Language definitions
//!
//! ASR services address languages by ISO-639-1 code (`ta`), translation
//! providers by regional locale (`ta-IN`).

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::Error;

/// Supported languages
///
/// Serialized as the lowercase name; deserialized with the same rules as
/// [`FromStr`], so config files and API callers may use either form.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase", try_from = "String")]
pub enum Language {
    #[default]
    English,
    Tamil,
    Hindi,
    Telugu,
    Kannada,
    Malayalam,
    Bengali,
    Marathi,
    Gujarati,
    Punjabi,
    Odia,
}

impl Language {
    pub const ALL: [Language; 11] = [
        Language::English,
        Language::Tamil,
        Language::Hindi,
        Language::Telugu,
        Language::Kannada,
        Language::Malayalam,
        Language::Bengali,
        Language::Marathi,
        Language::Gujarati,
        Language::Punjabi,
        Language::Odia,
    ];

    /// ISO-639-1 code
    pub fn code(&self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Tamil => "ta",
            Language::Hindi => "hi",
            Language::Telugu => "te",
            Language::Kannada => "kn",
            Language::Malayalam => "ml",
            Language::Bengali => "bn",
            Language::Marathi => "mr",
            Language::Gujarati => "gu",
            Language::Punjabi => "pa",
            Language::Odia => "od",
        }
    }

    /// Regional locale code (e.g. `ta-IN`)
    pub fn locale(&self) -> String {
        format!("{}-IN", self.code())
    }

    pub fn name(&self) -> &'static str {
        match self {
            Language::English => "English",
            Language::Tamil => "Tamil",
            Language::Hindi => "Hindi",
            Language::Telugu => "Telugu",
            Language::Kannada => "Kannada",
            Language::Malayalam => "Malayalam",
            Language::Bengali => "Bengali",
            Language::Marathi => "Marathi",
            Language::Gujarati => "Gujarati",
            Language::Punjabi => "Punjabi",
            Language::Odia => "Odia",
        }
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Language {
    type Err = Error;

    /// Accepts ISO codes, locales (`ta-IN`) and English names, case-insensitive.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let normalized = s.trim().to_lowercase();
        let code = normalized.split(['-', '_']).next().unwrap_or_default();

        Language::ALL
            .iter()
            .copied()
            .find(|lang| lang.code() == code || lang.name().to_lowercase() == normalized)
            .ok_or_else(|| Error::InvalidInput(format!("unsupported language: {s}")))
    }
}

impl TryFrom<String> for Language {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}
