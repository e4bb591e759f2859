//! Document search against a Chroma collection
//!
//! Uses the Chroma HTTP API directly: the collection id is resolved by name
//! once and cached, then `query_texts` requests are issued against it.

use crate::memory::truncate_chars;
use crate::tools::{Snippet, ToolProvider};
use crate::types::{AppError, Result};
use async_trait::async_trait;
use serde_json::{Value, json};
use std::time::Duration;
use tokio::sync::OnceCell;

pub const DEFAULT_CHROMA_URL: &str = "http://localhost:8000";
pub const DEFAULT_COLLECTION: &str = "documents";

const DOCUMENT_EXCERPT_CHARS: usize = 200;

pub struct DocumentSearchProvider {
    http: reqwest::Client,
    base_url: String,
    collection: String,
    collection_id: OnceCell<String>,
}

impl DocumentSearchProvider {
    pub fn new(base_url: impl Into<String>, collection: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AppError::Tool(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            collection: collection.into(),
            collection_id: OnceCell::new(),
        })
    }

    async fn collection_id(&self) -> Result<&str> {
        let id = self
            .collection_id
            .get_or_try_init(|| async {
                let url = format!("{}/api/v1/collections/{}", self.base_url, self.collection);
                let response = self
                    .http
                    .get(url)
                    .send()
                    .await
                    .map_err(|e| AppError::Tool(format!("Chroma request failed: {}", e)))?;

                if !response.status().is_success() {
                    return Err(AppError::Tool(format!(
                        "Chroma collection '{}' unavailable ({})",
                        self.collection,
                        response.status()
                    )));
                }

                let body: Value = response
                    .json()
                    .await
                    .map_err(|e| AppError::Tool(format!("Invalid Chroma response: {}", e)))?;

                body.get("id")
                    .and_then(Value::as_str)
                    .map(str::to_string)
                    .ok_or_else(|| AppError::Tool("Chroma collection has no id".to_string()))
            })
            .await?;
        Ok(id.as_str())
    }

    /// Flatten a Chroma query response (one nested list per query text).
    pub(crate) fn parse_query_response(body: &Value, limit: usize) -> Vec<Snippet> {
        let first = |key: &str| {
            body.get(key)
                .and_then(Value::as_array)
                .and_then(|outer| outer.first())
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default()
        };

        let documents = first("documents");
        let metadatas = first("metadatas");
        let ids = first("ids");

        documents
            .iter()
            .enumerate()
            .filter_map(|(i, doc)| {
                let text = doc.as_str()?;
                let meta = metadatas.get(i);
                let meta_str = |key: &str| {
                    meta.and_then(|m| m.get(key))
                        .and_then(Value::as_str)
                        .map(str::to_string)
                };
                let title = meta_str("title")
                    .or_else(|| meta_str("source"))
                    .or_else(|| ids.get(i).and_then(Value::as_str).map(str::to_string))
                    .unwrap_or_else(|| format!("Document {}", i + 1));

                let snippet = Snippet::new(title, truncate_chars(text, DOCUMENT_EXCERPT_CHARS));
                Some(match meta_str("url") {
                    Some(url) => snippet.with_url(url),
                    None => snippet,
                })
            })
            .take(limit)
            .collect()
    }
}

#[async_trait]
impl ToolProvider for DocumentSearchProvider {
    fn name(&self) -> &str {
        "chroma"
    }

    async fn search(&self, query: &str, limit: usize) -> Result<Vec<Snippet>> {
        let id = self.collection_id().await?;

        let response = self
            .http
            .post(format!("{}/api/v1/collections/{}/query", self.base_url, id))
            .json(&json!({
                "query_texts": [query],
                "n_results": limit,
                "include": ["documents", "metadatas"],
            }))
            .send()
            .await
            .map_err(|e| AppError::Tool(format!("Chroma query failed: {}", e)))?;

        if !response.status().is_success() {
            return Err(AppError::Tool(format!(
                "Chroma query returned {}",
                response.status()
            )));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| AppError::Tool(format!("Invalid Chroma response: {}", e)))?;

        Ok(Self::parse_query_response(&body, limit))
    }
}
