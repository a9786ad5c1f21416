//! Shared HTTP plumbing for talking to one Elasticsearch cluster.
//!
//! Both the scroll side and the bulk side are plain REST calls, so the
//! client creation, host normalization, authentication, and error mapping
//! live here and are reused by both.

use std::time::Duration;

use reqwest::{Client, Method};
use serde::Deserialize;

use crate::config::ClusterConfig;
use crate::error::{Error, Result};

/// Default request timeout for all cluster calls.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Default Elasticsearch HTTP port, used when the host carries no port.
pub const DEFAULT_PORT: u16 = 9200;

/// Which side of the migration a client talks to. Transport failures map
/// to the matching error variant.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Side {
    /// The cluster documents are read from.
    Source,
    /// The cluster documents are written to.
    Destination,
}

/// Cluster identification returned by `GET /`.
#[derive(Debug, Clone, Deserialize)]
pub struct ClusterInfo {
    /// Name of the cluster.
    pub cluster_name: String,
    /// Engine version, when reported.
    #[serde(default)]
    pub version: Option<VersionInfo>,
}

/// Engine version block inside [`ClusterInfo`].
#[derive(Debug, Clone, Deserialize)]
pub struct VersionInfo {
    /// Version number string, e.g. "6.8.23".
    pub number: String,
}

/// An HTTP client bound to one cluster.
#[derive(Debug, Clone)]
pub struct EsClient {
    http: Client,
    base_url: String,
    config: ClusterConfig,
    side: Side,
}

/// Creates a configured HTTP client with timeouts.
#[must_use]
pub fn create_http_client() -> Client {
    Client::builder()
        .timeout(DEFAULT_TIMEOUT)
        .connect_timeout(Duration::from_secs(10))
        .build()
        .unwrap_or_else(|_| Client::new())
}

/// Normalizes a configured host into a base URL.
///
/// A bare host gets the http scheme and the default port; host:port gets
/// the http scheme; full URLs pass through with any trailing slash
/// trimmed. Only http and https schemes are accepted.
pub fn normalize_host(host: &str) -> Result<String> {
    let host = host.trim().trim_end_matches('/');
    if host.is_empty() {
        return Err(Error::Config("cluster host cannot be empty".to_string()));
    }
    if host.contains("://") {
        if !host.starts_with("http://") && !host.starts_with("https://") {
            return Err(Error::Config(format!(
                "invalid scheme in host '{}': only http and https are supported",
                host
            )));
        }
        return Ok(host.to_string());
    }
    if host.contains(':') {
        Ok(format!("http://{}", host))
    } else {
        Ok(format!("http://{}:{}", host, DEFAULT_PORT))
    }
}

impl EsClient {
    /// Builds a client for the given cluster.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the host is empty or carries an
    /// unsupported scheme.
    pub fn new(config: ClusterConfig, side: Side) -> Result<Self> {
        let base_url = normalize_host(&config.host)?;
        Ok(Self {
            http: create_http_client(),
            base_url,
            config,
            side,
        })
    }

    /// Base URL of the cluster, without a trailing slash.
    #[must_use]
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Index this client operates on.
    #[must_use]
    pub fn index(&self) -> &str {
        &self.config.index
    }

    /// Starts an authenticated request against a path on this cluster.
    ///
    /// `path` must start with `/`.
    pub fn request(&self, method: Method, path: &str) -> reqwest::RequestBuilder {
        let mut req = self.http.request(method, format!("{}{}", self.base_url, path));

        if let Some(api_key) = &self.config.api_key {
            req = req.header("Authorization", format!("ApiKey {}", api_key));
        } else if let (Some(user), Some(pass)) = (&self.config.username, &self.config.password) {
            req = req.basic_auth(user, Some(pass));
        }

        req
    }

    /// Fetches cluster identification (`GET /`), used as a connectivity
    /// check.
    ///
    /// # Errors
    ///
    /// Returns a connection error if the cluster is unreachable, or a
    /// protocol error if the response cannot be parsed.
    pub async fn cluster_info(&self) -> Result<ClusterInfo> {
        let response = self
            .request(Method::GET, "/")
            .send()
            .await
            .map_err(|e| self.connection_error(format!("cluster info request failed: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "unknown error".to_string());
            return Err(self.handle_http_error(status, &body));
        }

        response
            .json()
            .await
            .map_err(|e| Error::Protocol(format!("failed to parse cluster info: {}", e)))
    }

    /// Wraps a transport-level failure in the error variant matching this
    /// client's side.
    #[must_use]
    pub fn connection_error(&self, message: String) -> Error {
        match self.side {
            Side::Source => Error::SourceConnection(message),
            Side::Destination => Error::DestinationConnection(message),
        }
    }

    /// Maps a non-success HTTP response to the error taxonomy.
    #[must_use]
    pub fn handle_http_error(&self, status: u16, body: &str) -> Error {
        match status {
            401 | 403 => Error::Authentication(format!(
                "cluster at {} rejected credentials: {}",
                self.base_url, body
            )),
            _ => self.connection_error(format!("cluster error {}: {}", status, body)),
        }
    }
}

#[cfg(test)]
#[path = "client_tests.rs"]
mod tests;
