//! saezuri main entry point
//!
//! Command-line interface for the paced social timeline harvester.

use clap::Parser;
use saezuri::adapter::GuestApiAdapter;
use saezuri::collector::{CollectParams, Collector};
use saezuri::config::{load_config_with_hash, Config};
use saezuri::output::{render_ranked, JsonSink, ResultSink};
use saezuri::pacing::Pacer;
use saezuri::SourceAdapter;
use std::path::{Path, PathBuf};
use tracing_subscriber::EnvFilter;

/// saezuri: a paced social timeline harvester
///
/// Collects posts from seed accounts (and optionally their followers),
/// ranks them by engagement or filters them by keyword, and writes the
/// ranked result set as JSON. Requests are paced to mimic a human browsing
/// cadence.
#[derive(Parser, Debug)]
#[command(name = "saezuri")]
#[command(version = "1.0.0")]
#[command(about = "A paced social timeline harvester", long_about = None)]
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

    /// Rank every fetched post; skips the trending gate and follower walk
    #[arg(long, conflicts_with = "keyword")]
    top_only: bool,

    /// Collect only posts containing this keyword (case-insensitive)
    #[arg(long, value_name = "WORD")]
    keyword: Option<String>,

    /// Disable adaptive request pacing for this run
    #[arg(long)]
    no_pacing: bool,

    /// Validate config and show what would be collected without fetching
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let (config, config_hash) = load_config_with_hash(&cli.config)?;
    tracing::info!("Configuration loaded successfully (hash: {})", config_hash);

    if cli.dry_run {
        handle_dry_run(&config, &cli);
        return Ok(());
    }

    handle_collect(config, &cli).await
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("saezuri=info,warn"),
            1 => EnvFilter::new("saezuri=debug,info"),
            2 => EnvFilter::new("saezuri=trace,debug"),
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

/// Handles the --dry-run mode: validates config and shows the planned run
fn handle_dry_run(config: &Config, cli: &Cli) {
    println!("=== saezuri Dry Run ===\n");

    println!("Mode:");
    if let Some(keyword) = &cli.keyword {
        println!("  Keyword search for '{}'", keyword);
    } else if cli.top_only {
        println!("  Pure ranking (no trending gate)");
    } else {
        println!("  Trending collection");
    }

    println!("\nPacing:");
    println!("  Enabled: {}", pacing_enabled(config, cli));

    println!("\nCollection:");
    println!("  Seeds ({}):", config.collect.seeds.len());
    for seed in &config.collect.seeds {
        println!("    - {}", seed);
    }
    println!(
        "  Followers per seed: {}",
        config.collect.follower_count_per_seed
    );
    println!(
        "  Posts per account: {}",
        config.collect.post_limit_per_account
    );
    println!("  Min engagement: {}", config.collect.min_engagement);
    println!("  Top N: {}", config.collect.top_n);
    println!(
        "  Include followers: {}",
        config.collect.include_followers
    );

    println!("\nSource:");
    println!("  Base URL: {}", config.source.base_url);
    println!(
        "  Bearer token: {}",
        if config.source.bearer_token.is_some() {
            "configured"
        } else {
            "none (guest session)"
        }
    );

    println!("\nOutput:");
    println!("  Results: {}", config.output.results_path);

    println!("\n✓ Configuration is valid");
}

fn pacing_enabled(config: &Config, cli: &Cli) -> bool {
    config.pacing.enabled && !cli.no_pacing
}

/// Handles the main collection run
async fn handle_collect(config: Config, cli: &Cli) -> anyhow::Result<()> {
    let mut adapter = GuestApiAdapter::new(&config.source)?;
    adapter.activate().await?;

    let pacer = Pacer::new(pacing_enabled(&config, cli));
    if !pacer.enabled() {
        tracing::warn!("pacing is disabled; request cadence will not be softened");
    }

    let mut collector = Collector::new(adapter, pacer);
    let collect = &config.collect;

    let ranked = if let Some(keyword) = &cli.keyword {
        if collect.include_followers && collect.seeds.len() == 1 {
            collector
                .search_with_followers(
                    &collect.seeds[0],
                    keyword,
                    collect.follower_count_per_seed,
                    collect.post_limit_per_account,
                    collect.top_n,
                )
                .await?
        } else {
            if collect.include_followers && collect.seeds.len() > 1 {
                tracing::info!(
                    "follower expansion for keyword search applies to a single seed; \
                     searching the {} seeds directly",
                    collect.seeds.len()
                );
            }
            collector
                .search_accounts_for_keyword(
                    &collect.seeds,
                    keyword,
                    collect.post_limit_per_account,
                    collect.top_n,
                )
                .await?
        }
    } else if cli.top_only {
        collector
            .top_buzz_from_accounts(
                &collect.seeds,
                collect.post_limit_per_account,
                collect.top_n,
            )
            .await?
    } else {
        let params = CollectParams {
            follower_count_per_seed: collect.follower_count_per_seed,
            post_limit_per_account: collect.post_limit_per_account,
            min_engagement: collect.min_engagement,
            top_n: collect.top_n,
            include_followers: collect.include_followers,
        };
        collector.collect_trending(&collect.seeds, &params).await?
    };

    if ranked.is_empty() {
        tracing::info!("nothing collected; no results written");
        return Ok(());
    }

    println!("{}", render_ranked(&ranked));

    let destination = Path::new(&config.output.results_path);
    JsonSink::new().persist(&ranked, destination)?;
    println!("✓ {} records written to {}", ranked.len(), destination.display());

    Ok(())
}
