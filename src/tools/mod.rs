//! Tool Providers for Agent Context
//!
//! Domain agents enrich their prompts with ranked snippets from external
//! search services. Every provider sits behind the [`ToolProvider`] trait and
//! is looked up by [`ToolKind`] in the [`registry::ToolRegistry`].
//!
//! # Module Structure
//!
//! - [`serpapi`](crate::tools::serpapi) - News, job and recipe search via SerpAPI
//! - [`search`](crate::tools::search) - Web search via DuckDuckGo (daedra)
//! - [`documents`](crate::tools::documents) - Document search against a Chroma collection
//! - [`registry`](crate::tools::registry) - Provider lookup with failure degradation
//!
//! # Failure Policy
//!
//! A provider failure never aborts a request. The registry logs it and the
//! agent proceeds with an empty result set.

/// Chroma document search.
pub mod documents;
/// Tool provider registry.
pub mod registry;
/// Web search tool using DuckDuckGo.
pub mod search;
/// SerpAPI news, jobs and recipes.
pub mod serpapi;

use crate::types::Result;
use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;

pub use registry::ToolRegistry;

/// One ranked search hit.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Snippet {
    pub title: String,
    pub snippet: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
}

impl Snippet {
    pub fn new(title: impl Into<String>, snippet: impl Into<String>) -> Self {
        Self {
            title: title.into(),
            snippet: snippet.into(),
            url: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}

/// The kinds of search an agent can ask for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ToolKind {
    News,
    Jobs,
    Recipes,
    Documents,
    Web,
}

impl ToolKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ToolKind::News => "news_search",
            ToolKind::Jobs => "job_search",
            ToolKind::Recipes => "recipe_search",
            ToolKind::Documents => "document_search",
            ToolKind::Web => "web_search",
        }
    }
}

impl fmt::Display for ToolKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// External search capability returning ranked snippets.
#[async_trait]
pub trait ToolProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Snippet>>;
}
