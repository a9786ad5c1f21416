//! # escopy
//!
//! `escopy` is a CLI tool and library for copying documents from one
//! Elasticsearch index to another with the scroll API, re-indexing each
//! page into the destination via batched bulk writes.
//!
//! The run is a single sequential loop: open a scroll cursor over the
//! source index, fetch pages until the source is exhausted, translate each
//! page into bulk operations, and write them to the destination. Any
//! failure aborts the run; re-running is the recovery mechanism, since
//! writes are upserts keyed by (id, type-tag).
//!
//! ## Quick start
//!
//! ```bash
//! # Copy an index between clusters
//! escopy --src-host es-old.internal --src-index events \
//!        --dst-host es-new.internal --dst-index events
//!
//! # Dry run (read side only, confirms connectivity)
//! escopy --config migration.yaml --dry-run
//! ```
//!
//! ## Configuration example
//!
//! ```yaml
//! source:
//!   host: http://es-old.internal:9200
//!   index: events
//! destination:
//!   host: http://es-new.internal:9200
//!   index: events
//! options:
//!   scroll_ttl: 5m
//!   scroll_size: 500
//! ```

#![warn(missing_docs)]

pub mod bulk;
pub mod client;
pub mod config;
pub mod error;
pub mod pipeline;
pub mod scroll;
pub mod translate;

pub use bulk::{BulkWriter, WriteOperation};
pub use client::EsClient;
pub use config::{ClusterConfig, MigrationConfig, MigrationOptions};
pub use error::{Error, Result};
pub use pipeline::{MigrationStats, Pipeline};
pub use scroll::{Document, ScrollClient};
pub use translate::translate_page;
