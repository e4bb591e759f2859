//! Mem0 platform client
//!
//! Talks to the Mem0 REST API (`/v1/memories/`). Records are stored verbatim
//! (`infer = false`) so what the orchestrator writes is exactly what a later
//! request reads back.

use crate::memory::MemoryStore;
use crate::types::{AppError, MemoryRecord, Metadata, Result, Scalar};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use serde_json::{Value, json};
use std::time::Duration;

/// Default Mem0 platform endpoint.
pub const DEFAULT_MEM0_URL: &str = "https://api.mem0.ai";

pub struct Mem0Client {
    http: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl Mem0Client {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(10))
            .build()
            .map_err(|e| AppError::Memory(format!("Failed to build HTTP client: {}", e)))?;

        Ok(Self {
            http,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            api_key: api_key.into(),
        })
    }

    fn memories_url(&self) -> String {
        format!("{}/v1/memories/", self.base_url)
    }

    fn parse_record(owner: &str, item: &Value) -> Option<MemoryRecord> {
        let message = item.get("memory").and_then(Value::as_str)?.to_string();

        let metadata: Metadata = item
            .get("metadata")
            .and_then(Value::as_object)
            .map(|obj| {
                obj.iter()
                    .filter_map(|(k, v)| Scalar::from_json(v).map(|s| (k.clone(), s)))
                    .collect()
            })
            .unwrap_or_default();

        let created_at = item
            .get("created_at")
            .and_then(Value::as_str)
            .and_then(|s| DateTime::parse_from_rfc3339(s).ok())
            .map(|dt| dt.with_timezone(&Utc))
            .unwrap_or(DateTime::<Utc>::UNIX_EPOCH);

        Some(MemoryRecord {
            owner: item
                .get("user_id")
                .and_then(Value::as_str)
                .unwrap_or(owner)
                .to_string(),
            message,
            metadata,
            created_at,
        })
    }
}

#[async_trait]
impl MemoryStore for Mem0Client {
    async fn append(&self, owner: &str, message: &str, metadata: Metadata) -> Result<MemoryRecord> {
        let body = json!({
            "messages": [{"role": "user", "content": message}],
            "user_id": owner,
            "metadata": metadata,
            "infer": false,
        });

        let response = self
            .http
            .post(self.memories_url())
            .header("Authorization", format!("Token {}", self.api_key))
            .json(&body)
            .send()
            .await
            .map_err(|e| AppError::Memory(format!("Mem0 request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Memory(format!("Mem0 append returned {}", status)));
        }

        Ok(MemoryRecord {
            owner: owner.to_string(),
            message: message.to_string(),
            metadata,
            created_at: Utc::now(),
        })
    }

    async fn retrieve_recent(&self, owner: &str, limit: usize) -> Result<Vec<MemoryRecord>> {
        let response = self
            .http
            .get(self.memories_url())
            .header("Authorization", format!("Token {}", self.api_key))
            .query(&[("user_id", owner)])
            .send()
            .await
            .map_err(|e| AppError::Memory(format!("Mem0 request failed: {}", e)))?;

        let status = response.status();
        if !status.is_success() {
            return Err(AppError::Memory(format!("Mem0 retrieve returned {}", status)));
        }

        let body: Value = response
            .json()
            .await
            .map_err(|e| AppError::Memory(format!("Invalid Mem0 response: {}", e)))?;

        // The list endpoint returns a bare array, the paginated form wraps it in `results`.
        let items = body
            .as_array()
            .or_else(|| body.get("results").and_then(Value::as_array))
            .ok_or_else(|| AppError::Memory("Unexpected Mem0 response shape".to_string()))?;

        let mut records: Vec<MemoryRecord> = items
            .iter()
            .filter_map(|item| Self::parse_record(owner, item))
            .collect();
        records.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        records.truncate(limit);
        Ok(records)
    }

    fn name(&self) -> &str {
        "mem0"
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_record_keeps_scalar_metadata() {
        let item = json!({
            "id": "m-1",
            "memory": "Travel Interest: Tokyo",
            "user_id": "u1",
            "metadata": {"domain": "travel", "response_length": 120, "tags": ["a"]},
            "created_at": "2026-03-01T12:00:00Z"
        });
        let record = Mem0Client::parse_record("u1", &item).unwrap();
        assert_eq!(record.message, "Travel Interest: Tokyo");
        assert_eq!(record.metadata["domain"].as_str(), Some("travel"));
        assert_eq!(record.metadata["response_length"].as_i64(), Some(120));
        assert!(!record.metadata.contains_key("tags"));
    }

    #[test]
    fn test_parse_record_without_memory_is_skipped() {
        assert!(Mem0Client::parse_record("u1", &json!({"id": "x"})).is_none());
    }

    #[test]
    fn test_base_url_is_normalized() {
        let client = Mem0Client::new("https://api.mem0.ai/", "key").unwrap();
        assert_eq!(client.memories_url(), "https://api.mem0.ai/v1/memories/");
    }
}
