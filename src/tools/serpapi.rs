//! SerpAPI search providers
//!
//! One HTTP client serves three engines: Google News, Google Jobs and Google
//! recipe results. Each engine is exposed as its own [`ToolProvider`] so the
//! registry can map a [`ToolKind`](crate::tools::ToolKind) to it.

use crate::memory::truncate_chars;
use crate::tools::{Snippet, ToolProvider};
use crate::types::{AppError, Result};
use async_trait::async_trait;
use serde_json::Value;
use std::time::Duration;

pub const DEFAULT_SERPAPI_URL: &str = "https://serpapi.com";

const JOB_DESCRIPTION_CHARS: usize = 200;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SerpEngine {
    News,
    Jobs,
    Recipes,
}

impl SerpEngine {
    fn results_key(&self) -> &'static str {
        match self {
            SerpEngine::News => "news_results",
            SerpEngine::Jobs => "jobs_results",
            SerpEngine::Recipes => "recipes_results",
        }
    }

    fn query_params(&self, query: &str, limit: usize) -> Vec<(&'static str, String)> {
        let mut params = vec![("q", query.to_string())];
        match self {
            SerpEngine::News => {
                params.push(("engine", "google".to_string()));
                params.push(("tbm", "nws".to_string()));
                params.push(("num", limit.to_string()));
            }
            SerpEngine::Jobs => {
                params.push(("engine", "google_jobs".to_string()));
            }
            SerpEngine::Recipes => {
                params.push(("engine", "google".to_string()));
                params.push(("num", limit.to_string()));
            }
        }
        params
    }

    fn parse_item(&self, item: &Value) -> Option<Snippet> {
        let text = |key: &str| item.get(key).and_then(Value::as_str).map(str::to_string);
        let title = text("title")?;

        let snippet = match self {
            SerpEngine::News => {
                let body = text("snippet").unwrap_or_default();
                match text("source").or_else(|| {
                    item.get("source")
                        .and_then(|s| s.get("name"))
                        .and_then(Value::as_str)
                        .map(str::to_string)
                }) {
                    Some(source) if body.is_empty() => source,
                    Some(source) => format!("{} ({})", body, source),
                    None => body,
                }
            }
            SerpEngine::Jobs => {
                let company = text("company_name").unwrap_or_default();
                let location = text("location").unwrap_or_default();
                let description = text("description").unwrap_or_default();
                format!(
                    "{} - {}: {}",
                    company,
                    location,
                    truncate_chars(&description, JOB_DESCRIPTION_CHARS)
                )
            }
            SerpEngine::Recipes => {
                let mut parts = Vec::new();
                if let Some(source) = text("source") {
                    parts.push(source);
                }
                if let Some(time) = text("total_time") {
                    parts.push(time);
                }
                if let Some(ingredients) = item.get("ingredients").and_then(Value::as_array) {
                    let list: Vec<&str> = ingredients.iter().filter_map(Value::as_str).collect();
                    if !list.is_empty() {
                        parts.push(list.join(", "));
                    }
                }
                parts.join("; ")
            }
        };

        let url = text("link").or_else(|| {
            item.get("share_link")
                .and_then(Value::as_str)
                .map(str::to_string)
        });

        let snippet = Snippet::new(title, snippet);
        Some(match url {
            Some(url) => snippet.with_url(url),
            None => snippet,
        })
    }
}

pub struct SerpApiProvider {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
    engine: SerpEngine,
}

impl SerpApiProvider {
    pub fn new(
        base_url: impl Into<String>,
        api_key: impl Into<String>,
        engine: SerpEngine,
    ) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(15))
            .build()
            .map_err(|e| AppError::Tool(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
            engine,
        })
    }

    pub fn engine(&self) -> SerpEngine {
        self.engine
    }

    fn parse_results(&self, body: &Value, limit: usize) -> Result<Vec<Snippet>> {
        if let Some(error) = body.get("error").and_then(Value::as_str) {
            return Err(AppError::Tool(format!("SerpAPI error: {}", error)));
        }

        let Some(items) = body.get(self.engine.results_key()).and_then(Value::as_array) else {
            return Ok(Vec::new());
        };

        Ok(items
            .iter()
            .filter_map(|item| self.engine.parse_item(item))
            .take(limit)
            .collect())
    }
}

#[async_trait]
impl ToolProvider for SerpApiProvider {
    fn name(&self) -> &str {
        match self.engine {
            SerpEngine::News => "serpapi_news",
            SerpEngine::Jobs => "serpapi_jobs",
            SerpEngine::Recipes => "serpapi_recipes",
        }
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Snippet>> {
        let mut params = self.engine.query_params(query, limit);
        params.push(("api_key", self.api_key.clone()));

        let response = self
            .http
            .get(format!("{}/search.json", self.base_url))
            .query(&params)
            .send()
            .await
            .map_err(|e| AppError::Tool(format!("SerpAPI request failed: {}", e)))?;

        let status = response.status();
        let body: Value = response
            .json()
            .await
            .map_err(|e| AppError::Tool(format!("Invalid SerpAPI response ({}): {}", status, e)))?;

        if !status.is_success() && body.get("error").is_none() {
            return Err(AppError::Tool(format!("SerpAPI returned {}", status)));
        }

        self.parse_results(&body, limit)
    }
}
