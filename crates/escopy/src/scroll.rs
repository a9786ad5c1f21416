//! Scroll cursor acquisition and page fetching against a source index.
//!
//! The scroll API hands out a server-side cursor with a rolling TTL. The
//! opening search is consumed only for the cursor and the advisory hit
//! count; every page of documents, including the first, arrives through
//! [`ScrollClient::fetch`]. An empty page is the sole exhaustion signal.

use reqwest::{Method, StatusCode};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::client::EsClient;
use crate::error::{Error, Result};

/// A source document as returned inside one scroll page.
///
/// Identity within an index is (id, doc_type). The type-tag is a legacy
/// schema grouping label; clusters that no longer report `_type` get the
/// `_doc` placeholder.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Document {
    /// Document identifier.
    #[serde(rename = "_id")]
    pub id: String,
    /// Legacy type-tag.
    #[serde(rename = "_type", default = "default_doc_type")]
    pub doc_type: String,
    /// The document body, carried as-is.
    #[serde(rename = "_source", default)]
    pub source: serde_json::Value,
}

fn default_doc_type() -> String {
    "_doc".to_string()
}

/// Search/scroll response body. The same shape covers the opening search
/// and every subsequent scroll fetch.
#[derive(Debug, Deserialize)]
struct ScrollResponse {
    #[serde(rename = "_scroll_id")]
    scroll_id: Option<String>,
    #[serde(rename = "_shards")]
    shards: Option<ShardStats>,
    hits: HitsContainer,
}

#[derive(Debug, Deserialize)]
struct HitsContainer {
    #[serde(default)]
    total: Option<TotalHits>,
    hits: Vec<Document>,
}

/// `hits.total` is a bare number on older clusters and an object on 7.x+.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum TotalHits {
    Count(u64),
    Object { value: u64 },
}

impl TotalHits {
    fn value(&self) -> u64 {
        match self {
            TotalHits::Count(n) => *n,
            TotalHits::Object { value } => *value,
        }
    }
}

#[derive(Debug, Deserialize)]
struct ShardStats {
    total: u32,
    #[serde(default)]
    failed: u32,
}

/// Cursor client for a source index.
pub struct ScrollClient {
    client: EsClient,
}

impl ScrollClient {
    /// Wraps a source-side cluster client.
    #[must_use]
    pub fn new(client: EsClient) -> Self {
        Self { client }
    }

    /// Underlying cluster client.
    #[must_use]
    pub fn client(&self) -> &EsClient {
        &self.client
    }

    /// Opens a scroll cursor over the whole index.
    ///
    /// Returns the cursor token and the advisory total hit count. The
    /// traversal is non-scoring (`sort: _doc`) and never paginates by
    /// offset; `page_size` applies to each subsequent fetch.
    ///
    /// # Errors
    ///
    /// [`Error::IndexNotFound`] when the index does not exist,
    /// [`Error::SourceConnection`] when the cluster is unreachable,
    /// [`Error::Authentication`] on rejected credentials.
    pub async fn open(&self, ttl: &str, page_size: usize) -> Result<(String, u64)> {
        let path = format!("/{}/_search", self.client.index());
        let body = json!({
            "size": page_size,
            "sort": ["_doc"],
            "query": { "match_all": {} },
        });

        let response = self
            .client
            .request(Method::POST, &path)
            .query(&[("scroll", ttl)])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                self.client
                    .connection_error(format!("scroll open failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            if status == StatusCode::NOT_FOUND {
                return Err(Error::IndexNotFound(self.client.index().to_string()));
            }
            return Err(self.client.handle_http_error(status.as_u16(), &body));
        }

        let parsed: ScrollResponse = response
            .json()
            .await
            .map_err(|e| Error::Protocol(format!("failed to parse search response: {}", e)))?;

        let scroll_id = parsed
            .scroll_id
            .ok_or_else(|| Error::Protocol("search response missing _scroll_id".to_string()))?;
        let total = parsed.hits.total.map_or(0, |t| t.value());

        Ok((scroll_id, total))
    }

    /// Fetches the next page and the refreshed cursor.
    ///
    /// An empty page means the traversal is exhausted. A page served by a
    /// partially failed shard set aborts the run: continuing would
    /// silently skip an unknown subset of documents.
    ///
    /// # Errors
    ///
    /// [`Error::PartialShardFailure`] when any shard failed to serve the
    /// page, [`Error::SourceConnection`] on transport failures.
    pub async fn fetch(&self, scroll_id: &str, ttl: &str) -> Result<(Vec<Document>, String)> {
        let body = json!({
            "scroll": ttl,
            "scroll_id": scroll_id,
        });

        let response = self
            .client
            .request(Method::POST, "/_search/scroll")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                self.client
                    .connection_error(format!("scroll fetch failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(self.client.handle_http_error(status.as_u16(), &body));
        }

        let parsed: ScrollResponse = response
            .json()
            .await
            .map_err(|e| Error::Protocol(format!("failed to parse scroll response: {}", e)))?;

        if let Some(shards) = &parsed.shards {
            if shards.failed > 0 {
                return Err(Error::PartialShardFailure {
                    failed: shards.failed,
                    total: shards.total,
                });
            }
        }

        debug!("scroll page: {} documents", parsed.hits.hits.len());

        let next = parsed.scroll_id.unwrap_or_else(|| scroll_id.to_string());
        Ok((parsed.hits.hits, next))
    }

    /// Releases the server-side cursor.
    ///
    /// # Errors
    ///
    /// Returns a connection error when the cluster refuses the clear; the
    /// caller treats this as best-effort.
    pub async fn clear(&self, scroll_id: &str) -> Result<()> {
        let body = json!({ "scroll_id": [scroll_id] });

        let response = self
            .client
            .request(Method::DELETE, "/_search/scroll")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                self.client
                    .connection_error(format!("scroll clear failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(self.client.handle_http_error(status.as_u16(), &body));
        }

        Ok(())
    }
}

#[cfg(test)]
#[path = "scroll_tests.rs"]
mod tests;
