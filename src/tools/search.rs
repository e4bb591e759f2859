//! Web search provider using daedra
//!
//! This module provides web search via the daedra crate, which uses
//! DuckDuckGo as the search backend. No API key is required.

use crate::tools::{Snippet, ToolProvider};
use crate::types::{AppError, Result};
use async_trait::async_trait;

/// Web search provider powered by daedra
pub struct WebSearchProvider;

impl WebSearchProvider {
    pub fn new() -> Self {
        Self
    }
}

impl Default for WebSearchProvider {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl ToolProvider for WebSearchProvider {
    fn name(&self) -> &str {
        "duckduckgo"
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Snippet>> {
        if query.trim().is_empty() {
            return Err(AppError::InvalidInput("Empty search query".to_string()));
        }

        let search_args = daedra::SearchArgs {
            query: query.to_string(),
            options: Some(daedra::SearchOptions {
                num_results: limit,
                ..Default::default()
            }),
        };

        let response = daedra::tools::search::perform_search(&search_args)
            .await
            .map_err(|e| AppError::Tool(format!("Search failed: {}", e)))?;

        Ok(response
            .data
            .iter()
            .map(|r| Snippet::new(r.title.clone(), r.description.clone()).with_url(r.url.clone()))
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_provider_name() {
        assert_eq!(WebSearchProvider::new().name(), "duckduckgo");
    }

    #[tokio::test]
    async fn test_search_empty_query() {
        let result = WebSearchProvider::new().search("   ", 3).await;
        assert!(matches!(result, Err(AppError::InvalidInput(_))));
    }
}
