//! Error types for escopy.

use thiserror::Error;

/// Result alias used throughout the crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors produced during a migration run.
///
/// Every variant is fatal to the run: nothing is retried and no partial
/// completion is tracked. Re-running the migration is the recovery
/// mechanism, since destination writes are upserts keyed by (id, type-tag).
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid configuration.
    #[error("configuration error: {0}")]
    Config(String),

    /// The source cluster could not be reached or returned an unclassified
    /// error.
    #[error("source connection error: {0}")]
    SourceConnection(String),

    /// The destination cluster could not be reached or returned an
    /// unclassified error.
    #[error("destination connection error: {0}")]
    DestinationConnection(String),

    /// The cluster rejected the configured credentials (401/403).
    #[error("authentication failed: {0}")]
    Authentication(String),

    /// The source index does not exist.
    #[error("index not found: {0}")]
    IndexNotFound(String),

    /// One or more shards failed to serve a scroll page. Continuing would
    /// silently under-migrate with no way to tell which documents were
    /// skipped, so the run aborts.
    #[error("scroll request failed on {failed} of {total} shards")]
    PartialShardFailure {
        /// Shards that failed to serve the page.
        failed: u32,
        /// Total shards queried.
        total: u32,
    },

    /// The destination rejected one or more operations within a bulk
    /// request.
    #[error("bulk write rejected {failed} operation(s): {reason}")]
    BulkRejected {
        /// Number of rejected operations.
        failed: usize,
        /// Rejection reason reported for the first failed item.
        reason: String,
    },

    /// The engine returned a response the client could not interpret.
    #[error("protocol error: {0}")]
    Protocol(String),

    /// I/O failure while reading configuration.
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// YAML configuration parse failure.
    #[error("yaml error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}
