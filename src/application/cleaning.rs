//! Cleaning and merge building blocks
//!
//! Pure, in-memory transformations over the scraped tables. The
//! orchestration lives in [`crate::application::cleaning_use_cases`].

pub mod merger;
pub mod reconciler;
pub mod record_filter;
pub mod sanitizer;

pub use merger::{dedup_albums, join_album_details, merge_catalog, MergedCatalog};
pub use reconciler::{reconcile, remove_login_wall_tracks, ReconciledTables};
pub use record_filter::{prefilter_album_summaries, FilterReport, FilterStep, RecordFilter};
pub use sanitizer::sanitize_rows;
