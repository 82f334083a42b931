//! Application layer
//!
//! Use cases that drive the scrape and cleaning stages over the
//! infrastructure adapters, plus the per-item run report.

pub mod cleaning;
pub mod cleaning_use_cases;
pub mod collector;
pub mod etl_pipeline;
pub mod run_report;
pub mod scraping_use_cases;

// Re-export commonly used items
pub use cleaning_use_cases::{CatalogCleaner, CleanOutput, ScrapedTables};
pub use collector::TableCollector;
pub use etl_pipeline::{load_artist_ids, run_all, run_clean, run_scrape};
pub use run_report::{CleaningSummary, ItemOutcome, RunReport, ScrapeError, Stage, StageReport};
pub use scraping_use_cases::{CatalogScraper, ScrapeOutput};
