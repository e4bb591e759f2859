//! Mem0 client tests against a mocked platform API.

use maestro::memory::{Mem0Client, MemoryStore};
use maestro::types::{ErrorKind, Metadata, Scalar};
use serde_json::json;
use wiremock::matchers::{body_partial_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_append_posts_verbatim_record() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/v1/memories/"))
        .and(header("Authorization", "Token test-key"))
        .and(body_partial_json(json!({
            "user_id": "u1",
            "infer": false,
            "messages": [{"role": "user", "content": "Travel Interest: Tokyo"}],
            "metadata": {"domain": "travel", "response_length": 42}
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([{"id": "m-1", "event": "ADD"}])))
        .expect(1)
        .mount(&server)
        .await;

    let client = Mem0Client::new(server.uri(), "test-key").unwrap();
    let mut metadata = Metadata::new();
    metadata.insert("domain".into(), Scalar::from("travel"));
    metadata.insert("response_length".into(), Scalar::from(42i64));

    let record = client.append("u1", "Travel Interest: Tokyo", metadata).await.unwrap();
    assert_eq!(record.owner, "u1");
    assert_eq!(record.metadata["domain"].as_str(), Some("travel"));
}

#[tokio::test]
async fn test_retrieve_recent_orders_and_limits() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/memories/"))
        .and(query_param("user_id", "u1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([
            {"id": "a", "memory": "oldest", "user_id": "u1", "created_at": "2026-01-01T00:00:00Z"},
            {"id": "b", "memory": "newest", "user_id": "u1", "created_at": "2026-03-01T00:00:00Z",
             "metadata": {"domain": "finance"}},
            {"id": "c", "memory": "middle", "user_id": "u1", "created_at": "2026-02-01T00:00:00Z"}
        ])))
        .mount(&server)
        .await;

    let client = Mem0Client::new(server.uri(), "test-key").unwrap();
    let records = client.retrieve_recent("u1", 2).await.unwrap();

    let messages: Vec<_> = records.iter().map(|r| r.message.as_str()).collect();
    assert_eq!(messages, ["newest", "middle"]);
    assert_eq!(records[0].metadata["domain"].as_str(), Some("finance"));
}

#[tokio::test]
async fn test_retrieve_accepts_paginated_shape() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/v1/memories/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "count": 1,
            "results": [{"id": "a", "memory": "only", "created_at": "2026-01-01T00:00:00Z"}]
        })))
        .mount(&server)
        .await;

    let client = Mem0Client::new(server.uri(), "test-key").unwrap();
    let records = client.retrieve_recent("u1", 5).await.unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(records[0].owner, "u1");
}

#[tokio::test]
async fn test_platform_errors_are_memory_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;
    Mock::given(method("POST"))
        .respond_with(ResponseTemplate::new(401))
        .mount(&server)
        .await;

    let client = Mem0Client::new(server.uri(), "bad-key").unwrap();

    let err = client.retrieve_recent("u1", 5).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Memory);

    let err = client.append("u1", "note", Metadata::new()).await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Memory);
}
