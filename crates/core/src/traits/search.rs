//! Web search trait

use crate::{Result, SearchDepth, SearchHit};
use async_trait::async_trait;

/// Web search interface
///
/// Implementations:
/// - `TavilySearch` - Tavily search API
#[async_trait]
pub trait WebSearch: Send + Sync + 'static {
    /// Search the web, returning hits in provider order.
    ///
    /// An empty vector is a valid answer ("nothing found"), not an error.
    async fn search(&self, query: &str, depth: SearchDepth) -> Result<Vec<SearchHit>>;

    fn name(&self) -> &str;
}
