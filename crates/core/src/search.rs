//! Web search result types

use serde::{Deserialize, Serialize};

/// One web search hit
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchHit {
    /// Extracted passage text
    pub content: String,
    /// Source URL
    pub url: String,
    #[serde(default)]
    pub title: Option<String>,
    /// Provider relevance score, if any
    #[serde(default)]
    pub score: Option<f32>,
}

impl SearchHit {
    pub fn new(content: impl Into<String>, url: impl Into<String>) -> Self {
        Self {
            content: content.into(),
            url: url.into(),
            title: None,
            score: None,
        }
    }
}

/// Search depth requested from the provider
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum SearchDepth {
    Basic,
    #[default]
    Advanced,
}

impl SearchDepth {
    pub fn as_str(&self) -> &'static str {
        match self {
            SearchDepth::Basic => "basic",
            SearchDepth::Advanced => "advanced",
        }
    }
}
