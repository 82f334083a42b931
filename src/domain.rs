//! Domain layer: catalog records and the tables that hold them
//!
//! Plain data only. Nothing here touches the network or the filesystem.

pub mod catalog;
pub mod dataset;
pub mod entity_table;
pub mod track_key;

pub use catalog::{AlbumDetail, AlbumRecord, AlbumSummary, Lyrics, TableColumns, Track};
pub use dataset::CatalogRow;
pub use entity_table::EntityTable;
pub use track_key::{KeyRepresentation, TrackKey};
