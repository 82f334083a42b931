//! Cleaning use case: scraped tables in, analysis-ready dataset out

use std::collections::HashSet;

use anyhow::{Context, Result};
use tracing::info;

use super::cleaning::{merge_catalog, reconcile, remove_login_wall_tracks, sanitize_rows, RecordFilter};
use super::run_report::CleaningSummary;
use crate::domain::{AlbumRecord, CatalogRow, EntityTable, Lyrics, Track};
use crate::infrastructure::csv_store;
use crate::infrastructure::{CleaningConfig, PathsConfig};

/// The three scraped tables
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ScrapedTables {
    pub albums: EntityTable<AlbumRecord>,
    pub tracks: EntityTable<Track>,
    pub lyrics: EntityTable<Lyrics>,
}

impl ScrapedTables {
    pub fn load(paths: &PathsConfig) -> Result<Self> {
        let albums = csv_store::read_table(&paths.albums_path())
            .context("Failed to load albums table")?;
        let tracks = csv_store::read_table(&paths.tracks_path())
            .context("Failed to load tracks table")?;
        let lyrics = csv_store::read_table(&paths.lyrics_path())
            .context("Failed to load lyrics table")?;
        Ok(Self {
            albums: EntityTable::from_rows(albums),
            tracks: EntityTable::from_rows(tracks),
            lyrics: EntityTable::from_rows(lyrics),
        })
    }

    pub fn save(&self, paths: &PathsConfig) -> Result<()> {
        csv_store::write_table(&paths.albums_path(), self.albums.rows())?;
        csv_store::write_table(&paths.tracks_path(), self.tracks.rows())?;
        csv_store::write_table(&paths.lyrics_path(), self.lyrics.rows())?;
        Ok(())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CleanOutput {
    pub rows: Vec<CatalogRow>,
    pub summary: CleaningSummary,
}

/// Sentinel removal, key reconciliation, merge, sanitize, filter
#[derive(Debug, Clone)]
pub struct CatalogCleaner {
    config: CleaningConfig,
    filter: RecordFilter,
}

impl CatalogCleaner {
    pub fn new(config: &CleaningConfig) -> Self {
        Self {
            config: config.clone(),
            filter: RecordFilter::from_config(config),
        }
    }

    pub fn clean(&self, tables: ScrapedTables) -> CleanOutput {
        let ScrapedTables { albums, mut tracks, lyrics } = tables;
        info!(
            "Cleaning {} albums, {} tracks, {} lyrics",
            albums.len(),
            tracks.len(),
            lyrics.len()
        );

        let login_wall_tracks_removed =
            remove_login_wall_tracks(&mut tracks, &self.config.login_wall_sentinel);

        let reconciled = reconcile(tracks, lyrics);
        let key_representation = Some(reconciled.representation);
        let tracks_dropped_by_reconciliation = reconciled.dropped_tracks;
        let lyrics_dropped_by_reconciliation = reconciled.dropped_lyrics;

        let merged = merge_catalog(albums, reconciled);
        let merged_rows = merged.rows.len();

        let mut rows = merged.rows;
        sanitize_rows(&mut rows);

        let report = self.filter.apply(rows);
        let rows = report.kept;

        let summary = CleaningSummary {
            login_wall_tracks_removed,
            key_representation,
            tracks_dropped_by_reconciliation,
            lyrics_dropped_by_reconciliation,
            duplicate_lyrics_ignored: merged.duplicate_lyrics,
            merged_rows,
            filters: report.counts,
            final_rows: rows.len(),
            unique_albums: distinct(&rows, |r| Some(r.album_id.clone())),
            unique_tracks: distinct(&rows, |r| r.track_id.as_ref().map(ToString::to_string)),
            unique_artists: distinct(&rows, |r| r.artist_name_clean.clone()),
        };

        info!("Total rows: {}", summary.final_rows);
        info!("Unique albums: {}", summary.unique_albums);
        info!("Unique tracks: {}", summary.unique_tracks);
        info!("Unique artists: {}", summary.unique_artists);

        CleanOutput { rows, summary }
    }

    /// Load the scraped tables from disk, clean them and write the dataset
    pub fn clean_files(&self, paths: &PathsConfig) -> Result<CleanOutput> {
        let tables = ScrapedTables::load(paths)?;
        let output = self.clean(tables);
        csv_store::write_table(&paths.final_path(), &output.rows)
            .context("Failed to write cleaned dataset")?;
        Ok(output)
    }
}

fn distinct(rows: &[CatalogRow], key: impl Fn(&CatalogRow) -> Option<String>) -> usize {
    rows.iter().filter_map(key).collect::<HashSet<_>>().len()
}
