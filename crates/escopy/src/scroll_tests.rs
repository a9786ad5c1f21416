//! Tests for the scroll cursor client.

use super::*;
use crate::client::Side;
use crate::config::ClusterConfig;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn scroll_client(server: &MockServer, index: &str) -> ScrollClient {
    let config = ClusterConfig {
        host: server.uri(),
        index: index.to_string(),
        username: None,
        password: None,
        api_key: None,
    };
    ScrollClient::new(EsClient::new(config, Side::Source).unwrap())
}

fn page_body(scroll_id: &str, ids: std::ops::Range<usize>) -> serde_json::Value {
    let hits: Vec<serde_json::Value> = ids
        .map(|i| {
            serde_json::json!({
                "_id": format!("doc{}", i),
                "_type": "event",
                "_source": { "seq": i, "message": format!("payload {}", i) }
            })
        })
        .collect();
    serde_json::json!({
        "_scroll_id": scroll_id,
        "_shards": { "total": 5, "successful": 5, "failed": 0 },
        "hits": { "total": 45, "hits": hits }
    })
}

#[test]
fn test_document_deserialization() {
    let json = r#"{"_id":"a1","_type":"event","_source":{"message":"hello"}}"#;
    let doc: Document = serde_json::from_str(json).unwrap();
    assert_eq!(doc.id, "a1");
    assert_eq!(doc.doc_type, "event");
    assert_eq!(doc.source["message"], "hello");
}

#[test]
fn test_document_missing_type_defaults() {
    let json = r#"{"_id":"a1","_source":{}}"#;
    let doc: Document = serde_json::from_str(json).unwrap();
    assert_eq!(doc.doc_type, "_doc");
}

#[test]
fn test_total_hits_bare_number() {
    let json = r#"{"_scroll_id":"s0","hits":{"total":45,"hits":[]}}"#;
    let parsed: ScrollResponse = serde_json::from_str(json).unwrap();
    assert_eq!(parsed.hits.total.unwrap().value(), 45);
}

#[test]
fn test_total_hits_object_form() {
    let json = r#"{"_scroll_id":"s0","hits":{"total":{"value":45,"relation":"eq"},"hits":[]}}"#;
    let parsed: ScrollResponse = serde_json::from_str(json).unwrap();
    assert_eq!(parsed.hits.total.unwrap().value(), 45);
}

#[tokio::test]
async fn test_open_returns_cursor_and_total() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/events/_search"))
        .and(query_param("scroll", "5m"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "_scroll_id": "cursor-0",
            "_shards": { "total": 5, "successful": 5, "failed": 0 },
            "hits": { "total": 45, "hits": [] }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = scroll_client(&server, "events");
    let (scroll_id, total) = client.open("5m", 20).await.unwrap();
    assert_eq!(scroll_id, "cursor-0");
    assert_eq!(total, 45);
}

#[tokio::test]
async fn test_open_sends_page_size() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/events/_search"))
        .and(body_partial_json(serde_json::json!({ "size": 20 })))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "_scroll_id": "cursor-0",
            "hits": { "total": 0, "hits": [] }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = scroll_client(&server, "events");
    client.open("5m", 20).await.unwrap();
}

#[tokio::test]
async fn test_open_index_not_found() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/missing/_search"))
        .respond_with(ResponseTemplate::new(404).set_body_json(serde_json::json!({
            "error": { "type": "index_not_found_exception" }
        })))
        .mount(&server)
        .await;

    let client = scroll_client(&server, "missing");
    let result = client.open("5m", 20).await;
    assert!(matches!(result, Err(Error::IndexNotFound(idx)) if idx == "missing"));
}

#[tokio::test]
async fn test_open_missing_scroll_id_is_protocol_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/events/_search"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "hits": { "total": 45, "hits": [] }
        })))
        .mount(&server)
        .await;

    let client = scroll_client(&server, "events");
    let result = client.open("5m", 20).await;
    assert!(matches!(result, Err(Error::Protocol(_))));
}

#[tokio::test]
async fn test_fetch_returns_page_and_renewed_cursor() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/_search/scroll"))
        .and(body_partial_json(
            serde_json::json!({ "scroll": "5m", "scroll_id": "cursor-0" }),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body("cursor-1", 0..3)))
        .expect(1)
        .mount(&server)
        .await;

    let client = scroll_client(&server, "events");
    let (page, next) = client.fetch("cursor-0", "5m").await.unwrap();
    assert_eq!(page.len(), 3);
    assert_eq!(next, "cursor-1");
    assert_eq!(page[0].id, "doc0");
    assert_eq!(page[2].id, "doc2");
    assert_eq!(page[0].doc_type, "event");
}

#[tokio::test]
async fn test_fetch_empty_page_signals_exhaustion() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/_search/scroll"))
        .respond_with(ResponseTemplate::new(200).set_body_json(page_body("cursor-9", 0..0)))
        .mount(&server)
        .await;

    let client = scroll_client(&server, "events");
    let (page, _next) = client.fetch("cursor-8", "5m").await.unwrap();
    assert!(page.is_empty());
}

#[tokio::test]
async fn test_fetch_partial_shard_failure() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/_search/scroll"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "_scroll_id": "cursor-1",
            "_shards": { "total": 5, "successful": 4, "failed": 1 },
            "hits": { "total": 45, "hits": [
                { "_id": "doc0", "_type": "event", "_source": {} }
            ] }
        })))
        .mount(&server)
        .await;

    let client = scroll_client(&server, "events");
    let result = client.fetch("cursor-0", "5m").await;
    assert!(matches!(
        result,
        Err(Error::PartialShardFailure {
            failed: 1,
            total: 5
        })
    ));
}

#[tokio::test]
async fn test_fetch_keeps_cursor_when_response_omits_it() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/_search/scroll"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "hits": { "total": 45, "hits": [] }
        })))
        .mount(&server)
        .await;

    let client = scroll_client(&server, "events");
    let (_page, next) = client.fetch("cursor-3", "5m").await.unwrap();
    assert_eq!(next, "cursor-3");
}

#[tokio::test]
async fn test_clear_releases_cursor() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/_search/scroll"))
        .and(body_partial_json(
            serde_json::json!({ "scroll_id": ["cursor-9"] }),
        ))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "succeeded": true,
            "num_freed": 1
        })))
        .expect(1)
        .mount(&server)
        .await;

    let client = scroll_client(&server, "events");
    client.clear("cursor-9").await.unwrap();
}

#[tokio::test]
async fn test_clear_failure_surfaces() {
    let server = MockServer::start().await;

    Mock::given(method("DELETE"))
        .and(path("/_search/scroll"))
        .respond_with(ResponseTemplate::new(500).set_body_string("boom"))
        .mount(&server)
        .await;

    let client = scroll_client(&server, "events");
    assert!(client.clear("cursor-9").await.is_err());
}
