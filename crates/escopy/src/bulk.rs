//! Batched writes against a destination cluster via the bulk API.

use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::json;
use tracing::debug;

use crate::client::EsClient;
use crate::error::{Error, Result};

/// One bulk index action: an upsert of `source` under (id, doc_type) in
/// `index`.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WriteOperation {
    /// Target index.
    pub index: String,
    /// Legacy type-tag.
    pub doc_type: String,
    /// Document identifier.
    pub id: String,
    /// Document body, carried as-is.
    pub source: serde_json::Value,
}

/// Bulk response body; only the failure signal and the per-item status
/// matter here.
#[derive(Debug, Deserialize)]
struct BulkResponse {
    #[serde(default)]
    errors: bool,
    #[serde(default)]
    items: Vec<BulkItem>,
}

#[derive(Debug, Deserialize)]
struct BulkItem {
    index: Option<ItemStatus>,
}

#[derive(Debug, Deserialize)]
struct ItemStatus {
    #[serde(default)]
    status: u16,
    error: Option<ItemError>,
}

#[derive(Debug, Deserialize)]
struct ItemError {
    #[serde(rename = "type", default)]
    kind: String,
    #[serde(default)]
    reason: String,
}

/// Applies batches of write operations to a destination cluster.
///
/// Dry-run branching is the caller's job: when dry-run is active this type
/// is never invoked at all.
pub struct BulkWriter {
    client: EsClient,
}

impl BulkWriter {
    /// Wraps a destination-side cluster client.
    #[must_use]
    pub fn new(client: EsClient) -> Self {
        Self { client }
    }

    /// Underlying cluster client.
    #[must_use]
    pub fn client(&self) -> &EsClient {
        &self.client
    }

    /// Writes all operations as a single `_bulk` request and returns the
    /// number written.
    ///
    /// An empty batch returns 0 without touching the network.
    ///
    /// # Errors
    ///
    /// [`Error::BulkRejected`] when the destination rejects any item,
    /// [`Error::DestinationConnection`] on transport failures.
    pub async fn apply(&self, operations: &[WriteOperation]) -> Result<usize> {
        if operations.is_empty() {
            return Ok(0);
        }

        let body = ndjson_body(operations);
        debug!("bulk write: {} operations", operations.len());

        let response = self
            .client
            .request(Method::POST, "/_bulk")
            .header("Content-Type", "application/x-ndjson")
            .body(body)
            .send()
            .await
            .map_err(|e| {
                self.client
                    .connection_error(format!("bulk request failed: {}", e))
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(self.client.handle_http_error(status.as_u16(), &body));
        }

        let parsed: BulkResponse = response
            .json()
            .await
            .map_err(|e| Error::Protocol(format!("failed to parse bulk response: {}", e)))?;

        if parsed.errors {
            let failures: Vec<&ItemStatus> = parsed
                .items
                .iter()
                .filter_map(|item| item.index.as_ref())
                .filter(|result| result.status >= 300 || result.error.is_some())
                .collect();

            if failures.is_empty() {
                return Err(Error::Protocol(
                    "bulk response flagged errors but listed no failed items".to_string(),
                ));
            }

            let reason = failures
                .iter()
                .find_map(|result| result.error.as_ref())
                .map_or_else(
                    || "unknown reason".to_string(),
                    |e| format!("{}: {}", e.kind, e.reason),
                );

            return Err(Error::BulkRejected {
                failed: failures.len(),
                reason,
            });
        }

        Ok(operations.len())
    }
}

/// Builds the newline-delimited `_bulk` request body: one action line plus
/// one source line per operation, with a terminating newline.
fn ndjson_body(operations: &[WriteOperation]) -> String {
    let mut body = String::new();
    for op in operations {
        let action = json!({
            "index": {
                "_index": op.index,
                "_type": op.doc_type,
                "_id": op.id,
            }
        });
        body.push_str(&action.to_string());
        body.push('\n');
        body.push_str(&op.source.to_string());
        body.push('\n');
    }
    body
}

#[cfg(test)]
#[path = "bulk_tests.rs"]
mod tests;
