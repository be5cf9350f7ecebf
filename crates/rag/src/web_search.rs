//! Web search via Tavily
//!
//! Knowledge sourcing for the pipeline: the translated query goes to Tavily
//! and each result's extracted `content` becomes a ranking candidate, with its
//! `url` kept for citation.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::{Deserialize, Serialize};
use voxpedia_config::constants::{endpoints, rag, timeouts};
use voxpedia_config::SearchConfig;
use voxpedia_core::{SearchDepth, SearchHit, WebSearch};

use crate::RagError;

/// Tavily client configuration
#[derive(Debug, Clone)]
pub struct TavilyConfig {
    pub endpoint: String,
    pub api_key: Option<String>,
    pub max_results: usize,
    pub timeout_ms: u64,
}

impl Default for TavilyConfig {
    fn default() -> Self {
        Self {
            endpoint: endpoints::TAVILY_DEFAULT.to_string(),
            api_key: None,
            max_results: rag::MAX_SEARCH_RESULTS,
            timeout_ms: timeouts::SEARCH_MS,
        }
    }
}

impl TavilyConfig {
    pub fn from_settings(settings: &SearchConfig, max_results: usize) -> Self {
        Self {
            endpoint: settings.endpoint.clone(),
            api_key: settings.api_key.clone(),
            max_results,
            timeout_ms: settings.timeout_ms,
        }
    }
}

#[derive(Debug, Serialize)]
struct SearchRequest<'a> {
    query: &'a str,
    search_depth: &'static str,
    max_results: usize,
}

#[derive(Debug, Deserialize)]
struct SearchResponse {
    #[serde(default)]
    results: Vec<TavilyResult>,
}

#[derive(Debug, Deserialize)]
struct TavilyResult {
    #[serde(default)]
    url: String,
    #[serde(default)]
    content: String,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    score: Option<f32>,
}

impl From<TavilyResult> for SearchHit {
    fn from(r: TavilyResult) -> Self {
        SearchHit {
            content: r.content,
            url: r.url,
            title: r.title,
            score: r.score,
        }
    }
}

/// Tavily web search client
pub struct TavilySearch {
    client: Client,
    config: TavilyConfig,
}

impl TavilySearch {
    pub fn new(config: TavilyConfig) -> Result<Self, RagError> {
        let client = Client::builder()
            .timeout(Duration::from_millis(config.timeout_ms))
            .build()
            .map_err(|e| RagError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { client, config })
    }

    /// Run a search, returning hits in provider order
    pub async fn search_hits(
        &self,
        query: &str,
        depth: SearchDepth,
    ) -> Result<Vec<SearchHit>, RagError> {
        let api_key = self
            .config
            .api_key
            .as_deref()
            .ok_or_else(|| RagError::Configuration("Tavily API key not configured".to_string()))?;

        let request = SearchRequest {
            query,
            search_depth: depth.as_str(),
            max_results: self.config.max_results,
        };

        let url = format!("{}/search", self.config.endpoint.trim_end_matches('/'));

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| RagError::Connection(format!("Tavily request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(RagError::Search(format!("Tavily error {}: {}", status, body)));
        }

        let parsed: SearchResponse = response
            .json()
            .await
            .map_err(|e| RagError::Search(format!("Failed to parse Tavily response: {}", e)))?;

        Ok(into_hits(parsed))
    }
}

/// Every result is kept in provider order; the first one is the citation
fn into_hits(response: SearchResponse) -> Vec<SearchHit> {
    response.results.into_iter().map(SearchHit::from).collect()
}

#[async_trait]
impl WebSearch for TavilySearch {
    async fn search(&self, query: &str, depth: SearchDepth) -> voxpedia_core::Result<Vec<SearchHit>> {
        Ok(self.search_hits(query, depth).await?)
    }

    fn name(&self) -> &str {
        "tavily"
    }
}
