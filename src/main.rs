use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use tracing::{error, info};

use bugs_catalog_etl::application::{load_artist_ids, run_all, run_clean, run_scrape};
use bugs_catalog_etl::infrastructure::{init_logging_with_config, AppConfig, HttpFetcher};

/// Scrape the Bugs Music catalog for a list of artists and build a cleaned
/// album/track/lyrics dataset
#[derive(Parser)]
#[command(name = "bugs-catalog-etl", version)]
struct Cli {
    /// Configuration file (TOML or JSON); defaults to config/default.* if present
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Override the pause after every request, in seconds
    #[arg(long, global = true)]
    delay: Option<f64>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Fetch albums, tracks and lyrics and write the three raw tables
    Scrape,
    /// Clean and merge previously scraped tables
    Clean,
    /// Scrape, then clean
    Run,
}

fn load_config(cli: &Cli) -> Result<AppConfig> {
    let mut config = AppConfig::load(cli.config.as_deref())?;
    if let Some(delay) = cli.delay {
        config.scraper.request_delay_secs = delay;
        config.validate()?;
    }
    Ok(config)
}

async fn execute(cli: Cli, config: AppConfig) -> Result<()> {
    match cli.command {
        Command::Scrape => {
            let artist_ids = load_artist_ids(&config)?;
            let fetcher = Arc::new(HttpFetcher::with_config(&config.scraper)?);
            let (tables, report) = run_scrape(&config, fetcher, &artist_ids).await?;
            info!(
                "Scrape complete: {} albums, {} tracks, {} lyrics ({} failures)",
                tables.albums.len(),
                tables.tracks.len(),
                tables.lyrics.len(),
                report.total_failures()
            );
        }
        Command::Clean => {
            let output = run_clean(&config)?;
            info!(
                "Clean complete: {} rows written to {}",
                output.rows.len(),
                config.paths.final_path().display()
            );
        }
        Command::Run => {
            let artist_ids = load_artist_ids(&config)?;
            let fetcher = Arc::new(HttpFetcher::with_config(&config.scraper)?);
            let (output, report) = run_all(&config, fetcher, &artist_ids).await?;
            info!(
                "Run complete: {} rows written to {} ({} scrape failures)",
                output.rows.len(),
                config.paths.final_path().display(),
                report.total_failures()
            );
        }
    }
    Ok(())
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let config = load_config(&cli).context("Failed to load configuration")?;
    init_logging_with_config(&config.logging)?;

    let result = execute(cli, config).await;
    if let Err(e) = &result {
        error!("{:#}", e);
    }
    result
}
