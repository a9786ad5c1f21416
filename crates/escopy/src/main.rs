//! escopy CLI
//!
//! Copies documents between Elasticsearch indices via scroll + bulk.

use clap::Parser;
use std::path::PathBuf;
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use escopy::{MigrationConfig, Pipeline};

#[derive(Parser)]
#[command(name = "escopy")]
#[command(version)]
#[command(about = "Copy documents between Elasticsearch indices via scroll + bulk", long_about = None)]
struct Cli {
    /// Configuration file path (YAML); flags below override file values
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Dry run mode (full scroll loop, no destination writes)
    #[arg(long)]
    dry_run: bool,

    /// Source cluster address [default: localhost]
    #[arg(long, value_name = "HOST")]
    src_host: Option<String>,

    /// Source index name [default: test_index]
    #[arg(long, value_name = "INDEX")]
    src_index: Option<String>,

    /// Destination cluster address [default: localhost]
    #[arg(long, value_name = "HOST")]
    dst_host: Option<String>,

    /// Destination index name [default: test_index]
    #[arg(long, value_name = "INDEX")]
    dst_index: Option<String>,

    /// Scroll cursor TTL, renewed on every fetch [default: 5m]
    #[arg(long, value_name = "TTL")]
    scroll: Option<String>,

    /// Page size per scroll fetch [default: 20]
    #[arg(long, value_name = "N")]
    scroll_size: Option<usize>,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl Cli {
    /// Builds the effective configuration: file values (when a file is
    /// given) overridden by any explicit flags.
    fn into_config(self) -> anyhow::Result<MigrationConfig> {
        let mut config = match &self.config {
            Some(path) => MigrationConfig::from_file(path)?,
            None => MigrationConfig::default(),
        };

        if let Some(host) = self.src_host {
            config.source.host = host;
        }
        if let Some(index) = self.src_index {
            config.source.index = index;
        }
        if let Some(host) = self.dst_host {
            config.destination.host = host;
        }
        if let Some(index) = self.dst_index {
            config.destination.index = index;
        }
        if let Some(ttl) = self.scroll {
            config.options.scroll_ttl = ttl;
        }
        if let Some(size) = self.scroll_size {
            config.options.scroll_size = size;
        }
        if self.dry_run {
            config.options.dry_run = true;
        }

        Ok(config)
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        Level::DEBUG
    } else {
        Level::INFO
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    if let Err(e) = run(cli).await {
        error!("migration failed: {:#}", e);
        std::process::exit(1);
    }

    Ok(())
}

async fn run(cli: Cli) -> anyhow::Result<()> {
    let config = cli.into_config()?;
    config.validate()?;

    if config.options.dry_run {
        info!("dry run: no documents will be written");
    }

    let pipeline = Pipeline::new(config)?;
    let stats = pipeline.run().await?;

    println!("\nMigration complete");
    println!("   Fetched:    {}", stats.fetched);
    println!("   Written:    {}", stats.written);
    println!("   Pages:      {}", stats.pages);
    println!("   Duration:   {:.2}s", stats.duration_secs);
    println!("   Throughput: {:.0} docs/sec", stats.throughput());

    Ok(())
}
