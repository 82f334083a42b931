//! Infrastructure layer: configuration, logging, HTTP fetching, HTML
//! extraction and CSV storage.

pub mod config;
pub mod csv_store;
pub mod http_client;
pub mod logging;
pub mod parsing;
pub mod parsing_error;

// Re-export commonly used items
pub use config::{AppConfig, CleaningConfig, ConfigError, PathsConfig, ProgressConfig, ScraperConfig};
pub use csv_store::StoreError;
pub use http_client::{CatalogUrls, DocumentFetcher, FetchError, HttpFetcher, StaticFetcher};
pub use logging::init_logging_with_config;
pub use parsing::{CatalogParsers, ContextualParser, ParseContext, ParsingConfig, ParsingError, ParsingResult};
