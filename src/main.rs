//! Scholar-Snapshot main entry point
//!
//! This is the command-line interface for the Scholar-Snapshot service.

use clap::Parser;
use scholar_snapshot::config::{load_config_with_hash, Config};
use scholar_snapshot::scholar::{aggregator_from_config, ScholarSource};
use scholar_snapshot::storage::{open_store, SnapshotStore};
use std::path::PathBuf;
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

/// Scholar-Snapshot: caches a Google Scholar profile for a portfolio site
///
/// By default the service listens for HTTP requests. The one-shot modes
/// run a single scrape or print the stored snapshot and exit.
#[derive(Parser, Debug)]
#[command(name = "scholar-snapshot")]
#[command(version)]
#[command(about = "Google Scholar profile scraper and snapshot server", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,

    /// Validate config and show what would be scraped without fetching anything
    #[arg(long, conflicts_with_all = ["scrape_once", "show_snapshot"])]
    dry_run: bool,

    /// Run one aggregation, save the snapshot and exit
    #[arg(long, conflicts_with_all = ["dry_run", "show_snapshot"])]
    scrape_once: bool,

    /// Print the stored snapshot as JSON and exit
    #[arg(long, conflicts_with_all = ["dry_run", "scrape_once"])]
    show_snapshot: bool,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            cfg
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e.into());
        }
    };

    if cli.dry_run {
        handle_dry_run(&config)?;
    } else if cli.scrape_once {
        handle_scrape_once(&config).await?;
    } else if cli.show_snapshot {
        handle_show_snapshot(&config).await?;
    } else {
        scholar_snapshot::server::serve(config).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("scholar_snapshot=info,warn"),
            1 => EnvFilter::new("scholar_snapshot=debug,tower_http=debug,info"),
            2 => EnvFilter::new("scholar_snapshot=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

/// Handles the --dry-run mode: validates config and shows the URLs involved
fn handle_dry_run(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let source = ScholarSource::new(config)?;
    let aggregation = &config.aggregation;

    println!("=== Scholar-Snapshot Dry Run ===\n");

    println!("Profile:");
    println!("  Base URL: {}", config.scholar.base_url);
    println!("  User ID: {}", config.scholar.user_id);
    println!("  Language: {}", config.scholar.language);

    println!("\nAggregation:");
    println!("  Page size: {}", aggregation.page_size);
    println!("  Max results: {}", aggregation.max_results);
    println!(
        "  Delay between pages: {}-{}ms",
        aggregation.min_delay_ms, aggregation.max_delay_ms
    );
    println!("  First page: {}", source.page_url(0, aggregation.page_size)?);

    println!("\nServer:");
    println!(
        "  Listen: {}:{}",
        config.server.bind_address, config.server.port
    );
    println!(
        "  Allowed origin prefixes: {}",
        config.server.allowed_origin_prefixes.join(", ")
    );

    println!("\nOutput:");
    println!("  Snapshot: {}", config.output.snapshot_path);

    let pages = aggregation.max_results.div_ceil(aggregation.page_size);
    println!("\n✓ Configuration is valid");
    println!("✓ A full run would fetch at most {} pages", pages);

    Ok(())
}

/// Handles the --scrape-once mode
async fn handle_scrape_once(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let store: Arc<dyn SnapshotStore> = Arc::new(open_store(&config.output));
    let aggregator = aggregator_from_config(config, store)?;

    match aggregator.run().await {
        Ok(summary) => {
            println!(
                "✓ Saved {} articles for {} to {}",
                summary.publications.len(),
                summary.name,
                config.output.snapshot_path
            );
            Ok(())
        }
        Err(e) => {
            tracing::error!("Scrape failed: {}", e);
            Err(e.into())
        }
    }
}

/// Handles the --show-snapshot mode
async fn handle_show_snapshot(config: &Config) -> Result<(), Box<dyn std::error::Error>> {
    let store = open_store(&config.output);

    match store.load().await? {
        Some(summary) => println!("{}", serde_json::to_string_pretty(&summary)?),
        None => println!("{{}}"),
    }

    Ok(())
}
