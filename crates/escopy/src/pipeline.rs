//! Migration pipeline orchestration.
//!
//! Strictly sequential: one cursor, one page in flight. The scroll cursor
//! is stateful server-side, so fetches are never pipelined.

use std::time::Duration;

use indicatif::{ProgressBar, ProgressStyle};
use tracing::{debug, info, warn};

use crate::bulk::BulkWriter;
use crate::client::{EsClient, Side};
use crate::config::MigrationConfig;
use crate::error::Result;
use crate::scroll::ScrollClient;
use crate::translate::translate_page;

/// Pause after every real bulk write, a crude brake so the destination
/// cluster is not hammered with back-to-back batches.
const WRITE_DELAY: Duration = Duration::from_millis(100);

/// Migration statistics.
#[derive(Debug, Default, Clone)]
pub struct MigrationStats {
    /// Documents fetched from the source across all pages.
    pub fetched: u64,
    /// Documents written to the destination (0 in dry-run mode).
    pub written: u64,
    /// Pages processed.
    pub pages: u64,
    /// Duration in seconds.
    pub duration_secs: f64,
}

impl MigrationStats {
    /// Calculate throughput (documents fetched per second).
    #[must_use]
    pub fn throughput(&self) -> f64 {
        if self.duration_secs > 0.0 {
            self.fetched as f64 / self.duration_secs
        } else {
            0.0
        }
    }
}

/// Migration pipeline: open cursor, then fetch / translate / write until
/// the source is exhausted.
pub struct Pipeline {
    config: MigrationConfig,
    scroll: ScrollClient,
    writer: BulkWriter,
}

impl Pipeline {
    /// Create a new migration pipeline.
    ///
    /// # Errors
    ///
    /// Returns an error if either cluster address is invalid.
    pub fn new(config: MigrationConfig) -> Result<Self> {
        let scroll = ScrollClient::new(EsClient::new(config.source.clone(), Side::Source)?);
        let writer = BulkWriter::new(EsClient::new(
            config.destination.clone(),
            Side::Destination,
        )?);

        Ok(Self {
            config,
            scroll,
            writer,
        })
    }

    /// Run the migration to completion.
    ///
    /// Any failure from open, fetch, or write aborts the run immediately;
    /// nothing is retried.
    ///
    /// # Errors
    ///
    /// Propagates the first error raised by the source or destination.
    pub async fn run(&self) -> Result<MigrationStats> {
        let start = std::time::Instant::now();
        let mut stats = MigrationStats::default();
        let options = &self.config.options;

        info!("starting migration pipeline");

        if options.dry_run {
            // Read-side only from here on; confirm both clusters answer.
            let source_info = self.scroll.client().cluster_info().await?;
            info!("[ {} ] source cluster reachable", source_info.cluster_name);
            let dest_info = self.writer.client().cluster_info().await?;
            info!("[ {} ] destination cluster reachable", dest_info.cluster_name);
        }

        let (mut scroll_id, total) =
            self.scroll.open(&options.scroll_ttl, options.scroll_size).await?;
        info!(
            "[ {} ] {} documents to migrate",
            self.config.source.index, total
        );

        let progress = create_progress_bar(total);

        loop {
            let (page, next) = self.scroll.fetch(&scroll_id, &options.scroll_ttl).await?;
            scroll_id = next;

            if page.is_empty() {
                break;
            }

            stats.pages += 1;
            stats.fetched += page.len() as u64;

            let operations = translate_page(page, &self.config.destination.index);

            if options.dry_run {
                debug!("dry run: skipping {} operations", operations.len());
            } else {
                stats.written += self.writer.apply(&operations).await? as u64;
                tokio::time::sleep(WRITE_DELAY).await;
            }

            progress.inc(operations.len() as u64);
        }

        progress.finish_with_message("migration complete");

        // Best-effort: the cursor expires on its own after the TTL.
        if let Err(e) = self.scroll.clear(&scroll_id).await {
            warn!("failed to clear scroll cursor: {}", e);
        }

        stats.duration_secs = start.elapsed().as_secs_f64();

        info!(
            "migration complete: {} fetched, {} written across {} pages in {:.2}s ({:.0} docs/sec)",
            stats.fetched,
            stats.written,
            stats.pages,
            stats.duration_secs,
            stats.throughput()
        );

        Ok(stats)
    }
}

fn create_progress_bar(total: u64) -> ProgressBar {
    let pb = if total > 0 {
        ProgressBar::new(total)
    } else {
        ProgressBar::new_spinner()
    };

    pb.set_style(
        ProgressStyle::default_bar()
            .template(
                "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
            )
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );

    pb
}

#[cfg(test)]
#[path = "pipeline_tests.rs"]
mod tests;
