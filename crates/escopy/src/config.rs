//! Configuration types for escopy.

use serde::{Deserialize, Serialize};

/// Main migration configuration.
///
/// Built once at startup (from a YAML file, CLI flags, or both) and passed
/// into the pipeline by value. Nothing mutates it afterwards.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MigrationConfig {
    /// Source cluster and index.
    #[serde(default)]
    pub source: ClusterConfig,
    /// Destination cluster and index.
    #[serde(default)]
    pub destination: ClusterConfig,
    /// Migration options.
    #[serde(default)]
    pub options: MigrationOptions,
}

/// One Elasticsearch cluster endpoint plus the index to operate on.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClusterConfig {
    /// Cluster address: a bare host (`localhost`), host:port, or a full
    /// URL (`https://es.example.com:9243`).
    #[serde(default = "default_host")]
    pub host: String,
    /// Index name.
    #[serde(default = "default_index")]
    pub index: String,
    /// Optional username for Basic auth.
    pub username: Option<String>,
    /// Optional password for Basic auth.
    pub password: Option<String>,
    /// Optional API key for authentication. Takes precedence over Basic
    /// auth when both are set.
    pub api_key: Option<String>,
}

impl Default for ClusterConfig {
    fn default() -> Self {
        Self {
            host: default_host(),
            index: default_index(),
            username: None,
            password: None,
            api_key: None,
        }
    }
}

/// Migration options.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MigrationOptions {
    /// Scroll cursor TTL, renewed on every fetch (e.g. "5m").
    #[serde(default = "default_scroll_ttl")]
    pub scroll_ttl: String,
    /// Page size per scroll fetch.
    #[serde(default = "default_scroll_size")]
    pub scroll_size: usize,
    /// Dry run mode (don't write to destination).
    #[serde(default)]
    pub dry_run: bool,
}

impl Default for MigrationOptions {
    fn default() -> Self {
        Self {
            scroll_ttl: default_scroll_ttl(),
            scroll_size: default_scroll_size(),
            dry_run: false,
        }
    }
}

fn default_host() -> String {
    "localhost".to_string()
}

fn default_index() -> String {
    "test_index".to_string()
}

fn default_scroll_ttl() -> String {
    "5m".to_string()
}

fn default_scroll_size() -> usize {
    20
}

impl MigrationConfig {
    /// Load configuration from a YAML file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed.
    pub fn from_file(path: &std::path::Path) -> crate::error::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = serde_yaml::from_str(&content)?;
        Ok(config)
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the configuration is invalid.
    pub fn validate(&self) -> crate::error::Result<()> {
        for (side, cluster) in [("source", &self.source), ("destination", &self.destination)] {
            if cluster.host.trim().is_empty() {
                return Err(crate::error::Error::Config(format!(
                    "{} host cannot be empty",
                    side
                )));
            }
            if cluster.index.trim().is_empty() {
                return Err(crate::error::Error::Config(format!(
                    "{} index cannot be empty",
                    side
                )));
            }
        }
        if self.options.scroll_size == 0 {
            return Err(crate::error::Error::Config(
                "scroll_size must be at least 1".to_string(),
            ));
        }
        if self.options.scroll_ttl.trim().is_empty() {
            return Err(crate::error::Error::Config(
                "scroll_ttl cannot be empty".to_string(),
            ));
        }
        Ok(())
    }
}
