//! Row shape of the final merged and cleaned dataset.

use chrono::NaiveDate;
use serde::Serialize;

use super::catalog::TableColumns;
use super::track_key::TrackKey;

/// One (album, track) row after merging, sanitizing and filtering.
///
/// Album-side columns come first, then track, then lyrics, then the derived
/// `artist_name_clean`, which is the column order of the written CSV.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CatalogRow {
    pub album_id: String,
    pub album_title: Option<String>,
    pub artist_name: Option<String>,
    /// Raw markup until sanitized
    #[serde(skip)]
    pub release_date_raw: Option<String>,
    #[serde(rename = "release_date")]
    pub release_date: Option<NaiveDate>,
    #[serde(rename = "type")]
    pub album_type: Option<String>,
    pub artist_id: Option<String>,
    pub genre: Option<String>,
    pub style: Option<String>,
    pub distributor: Option<String>,
    pub agency: Option<String>,
    pub total_duration: Option<String>,
    pub thumbnail: Option<String>,
    pub track_id: Option<TrackKey>,
    pub track_title: Option<String>,
    pub duration: Option<String>,
    pub lyrics: Option<String>,
    pub artist_name_clean: Option<String>,
}

impl TableColumns for CatalogRow {
    const COLUMNS: &'static [&'static str] = &[
        "album_id",
        "album_title",
        "artist_name",
        "release_date",
        "type",
        "artist_id",
        "genre",
        "style",
        "distributor",
        "agency",
        "total_duration",
        "thumbnail",
        "track_id",
        "track_title",
        "duration",
        "lyrics",
        "artist_name_clean",
    ];
}
