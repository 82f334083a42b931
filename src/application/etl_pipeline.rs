//! Stage wiring used by the command line: scrape, clean, or both

use std::sync::Arc;

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::cleaning_use_cases::{CatalogCleaner, CleanOutput, ScrapedTables};
use super::run_report::RunReport;
use super::scraping_use_cases::CatalogScraper;
use crate::infrastructure::csv_store;
use crate::infrastructure::{AppConfig, DocumentFetcher};

/// Read the configured artist list. Failure here aborts the run.
pub fn load_artist_ids(config: &AppConfig) -> Result<Vec<String>> {
    csv_store::read_artist_ids(&config.paths.artist_list).with_context(|| {
        format!("Failed to load artist list {}", config.paths.artist_list.display())
    })
}

fn write_report(config: &AppConfig, report: &RunReport) -> Result<()> {
    let path = config.paths.report_path();
    csv_store::write_json(&path, report).context("Failed to write run report")?;
    info!("Run report written to {}", path.display());
    Ok(())
}

/// Scrape every artist and write the albums, tracks and lyrics tables
pub async fn run_scrape<F: DocumentFetcher>(
    config: &AppConfig,
    fetcher: Arc<F>,
    artist_ids: &[String],
) -> Result<(ScrapedTables, RunReport)> {
    let scraper = CatalogScraper::new(fetcher, config)?;
    let output = scraper.run(artist_ids).await;

    let tables = ScrapedTables {
        albums: output.albums,
        tracks: output.tracks,
        lyrics: output.lyrics,
    };
    tables.save(&config.paths)?;

    if output.report.total_failures() > 0 {
        warn!("{} items failed during scraping; see run report", output.report.total_failures());
    }
    write_report(config, &output.report)?;
    Ok((tables, output.report))
}

/// Clean the tables written by a previous scrape
pub fn run_clean(config: &AppConfig) -> Result<CleanOutput> {
    let cleaner = CatalogCleaner::new(&config.cleaning);
    let output = cleaner.clean_files(&config.paths)?;

    let report = RunReport {
        cleaning: Some(output.summary.clone()),
        ..RunReport::default()
    };
    write_report(config, &report)?;
    Ok(output)
}

/// Scrape, then clean the in-memory tables. The raw tables are still written.
pub async fn run_all<F: DocumentFetcher>(
    config: &AppConfig,
    fetcher: Arc<F>,
    artist_ids: &[String],
) -> Result<(CleanOutput, RunReport)> {
    let (tables, mut report) = run_scrape(config, fetcher, artist_ids).await?;

    let output = CatalogCleaner::new(&config.cleaning).clean(tables);
    csv_store::write_table(&config.paths.final_path(), &output.rows)
        .context("Failed to write cleaned dataset")?;

    report.cleaning = Some(output.summary.clone());
    write_report(config, &report)?;
    Ok((output, report))
}
