//! Bugs Music catalog ETL
//!
//! Scrapes album, track and lyrics pages for a list of artists from the Bugs
//! Music web catalog, then reconciles, merges, sanitizes and filters the
//! scraped tables into one analysis-ready dataset.

// Module declarations
pub mod application;
pub mod domain;
pub mod infrastructure;
#[cfg(any(test, feature = "test-utils"))]
pub mod test_utils;
