//! Partner-Scout main entry point
//!
//! This is the command-line interface for the Partner-Scout affiliate program finder.

use anyhow::Context;
use clap::Parser;
use partner_scout::config::{load_config_with_hash, seed_urls, Config};
use partner_scout::crawler::Coordinator;
use partner_scout::output::{load_latest_report, load_report, write_markdown_report};
use partner_scout::storage::SqliteStorage;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// Partner-Scout: an affiliate program finder
///
/// Partner-Scout crawls outward from seed URLs looking for links to a site's
/// affiliate or partner program, then records the contact emails and contact
/// form found on that page.
#[derive(Parser, Debug)]
#[command(name = "partner-scout")]
#[command(version)]
#[command(about = "An affiliate program finder", long_about = None)]
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

    /// Validate config and show what would be crawled without actually crawling
    #[arg(long, conflicts_with = "export_summary")]
    dry_run: bool,

    /// Generate the markdown report for the latest run and exit
    #[arg(long, conflicts_with = "dry_run")]
    export_summary: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = match load_config_with_hash(&cli.config) {
        Ok((cfg, hash)) => {
            tracing::info!("Configuration loaded successfully (hash: {})", hash);
            (cfg, hash)
        }
        Err(e) => {
            tracing::error!("Failed to load configuration: {}", e);
            return Err(e).context(format!("invalid configuration {}", cli.config.display()));
        }
    };

    if cli.dry_run {
        handle_dry_run(&config)?;
    } else if cli.export_summary {
        handle_export_summary(&config)?;
    } else {
        handle_crawl(config, &config_hash).await?;
    }

    Ok(())
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("partner_scout=info,warn"),
            1 => EnvFilter::new("partner_scout=debug,info"),
            2 => EnvFilter::new("partner_scout=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows what would be crawled
fn handle_dry_run(config: &Config) -> anyhow::Result<()> {
    println!("=== Partner-Scout Dry Run ===\n");

    println!("Crawler Configuration:");
    println!("  Max depth: {}", config.crawler.max_depth);
    println!("  Max pages total: {}", config.crawler.max_pages_total);
    println!("  Max concurrency: {}", config.crawler.max_concurrency);
    println!(
        "  Retries: {} (base delay {}ms)",
        config.crawler.max_retries, config.crawler.retry_delay_ms
    );
    println!("  Fan-out: {:?}", config.crawler.fan_out);

    println!("\nUser Agent:");
    println!("  Name: {}", config.user_agent.crawler_name);
    println!("  Version: {}", config.user_agent.crawler_version);
    println!("  Contact URL: {}", config.user_agent.contact_url);
    println!("  Contact Email: {}", config.user_agent.contact_email);

    println!("\nOutput:");
    println!("  Database: {}", config.output.database_path);
    println!("  Summary: {}", config.output.summary_path);

    println!("\nKeywords ({}):", config.heuristics.keywords.len());
    for keyword in &config.heuristics.keywords {
        println!("  - {}", keyword);
    }

    println!(
        "\nIgnored Domains ({}):",
        config.heuristics.ignored_domains.len()
    );
    for domain in &config.heuristics.ignored_domains {
        println!("  - {}", domain);
    }

    let seeds = seed_urls(&config.seeds)?;
    println!("\nSeeds ({}):", seeds.len());
    for seed in &seeds {
        println!("  * {}", seed);
    }

    println!("\n✓ Configuration is valid");
    println!("✓ Would start crawling with {} seed URLs", seeds.len());

    Ok(())
}

/// Handles the --export-summary mode: writes the report for the latest run
fn handle_export_summary(config: &Config) -> anyhow::Result<()> {
    println!("=== Exporting Partner Report ===\n");
    println!("Database: {}", config.output.database_path);
    println!("Output: {}", config.output.summary_path);
    println!();

    let storage = SqliteStorage::new(Path::new(&config.output.database_path))
        .with_context(|| format!("opening database {}", config.output.database_path))?;

    tracing::info!("Loading crawl data from database...");
    let report = load_latest_report(&storage)?;

    write_markdown_report(&report, Path::new(&config.output.summary_path))
        .with_context(|| format!("writing report to {}", config.output.summary_path))?;

    println!("✓ Report exported to: {}", config.output.summary_path);

    Ok(())
}

/// Handles the main crawl operation, then writes the report for the run
async fn handle_crawl(config: Config, config_hash: &str) -> anyhow::Result<()> {
    tracing::info!(
        "Seeds: {}, Keywords: {}, Ignored domains: {}",
        config.seeds.len(),
        config.heuristics.keywords.len(),
        config.heuristics.ignored_domains.len()
    );

    let summary_path = config.output.summary_path.clone();

    let mut coordinator = Coordinator::new(config, config_hash)?;
    let stats = match coordinator.run().await {
        Ok(stats) => stats,
        Err(e) => {
            tracing::error!("Crawl failed: {}", e);
            return Err(e.into());
        }
    };

    tracing::info!(
        "Crawl completed successfully: {} partner pages recorded, {} fetch failures",
        stats.records_stored,
        stats.fetch_failures
    );

    let run_id = coordinator.run_id();
    let storage = coordinator.into_storage();
    let report = load_report(&storage, run_id)?;
    write_markdown_report(&report, Path::new(&summary_path))
        .with_context(|| format!("writing report to {}", summary_path))?;

    tracing::info!("Report written to: {}", summary_path);

    Ok(())
}
