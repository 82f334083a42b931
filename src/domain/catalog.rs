use serde::{Deserialize, Serialize};

/// Column names of a table row, in serialized order. Lets an empty table
/// still be written with its header.
pub trait TableColumns {
    const COLUMNS: &'static [&'static str];
}

/// One album block discovered on an artist's album listing page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumSummary {
    pub album_id: String,
    pub album_title: Option<String>,
    /// Raw credit line; may still carry the featured-artist block after a blank line
    pub artist_name: Option<String>,
    /// Raw `<time>` markup, cleaned by the sanitizer
    pub release_date: Option<String>,
    /// Raw `<span class="albumType">` markup
    #[serde(rename = "type")]
    pub album_type: Option<String>,
    /// Artist whose listing page produced this row
    pub artist_id: String,
}

/// Info-table cells and cover art from an album page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumDetail {
    pub album_id: String,
    pub genre: Option<String>,
    pub style: Option<String>,
    pub distributor: Option<String>,
    pub agency: Option<String>,
    pub total_duration: Option<String>,
    pub thumbnail: Option<String>,
}

/// Album summary left-joined with its detail; the `albums.csv` row shape
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct AlbumRecord {
    pub album_id: String,
    pub album_title: Option<String>,
    pub artist_name: Option<String>,
    pub release_date: Option<String>,
    #[serde(rename = "type")]
    pub album_type: Option<String>,
    pub artist_id: Option<String>,
    pub genre: Option<String>,
    pub style: Option<String>,
    pub distributor: Option<String>,
    pub agency: Option<String>,
    pub total_duration: Option<String>,
    pub thumbnail: Option<String>,
}

impl AlbumRecord {
    /// Combine a summary with an optional detail row; a missing detail leaves nulls
    pub fn from_parts(summary: AlbumSummary, detail: Option<&AlbumDetail>) -> Self {
        Self {
            album_id: summary.album_id,
            album_title: summary.album_title,
            artist_name: summary.artist_name,
            release_date: summary.release_date,
            album_type: summary.album_type,
            artist_id: Some(summary.artist_id),
            genre: detail.and_then(|d| d.genre.clone()),
            style: detail.and_then(|d| d.style.clone()),
            distributor: detail.and_then(|d| d.distributor.clone()),
            agency: detail.and_then(|d| d.agency.clone()),
            total_duration: detail.and_then(|d| d.total_duration.clone()),
            thumbnail: detail.and_then(|d| d.thumbnail.clone()),
        }
    }
}

/// One track entry from an album page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Track {
    pub album_id: String,
    /// Scraped from the player call; may hold a login-wall marker instead of an id
    pub track_id: String,
    pub track_title: Option<String>,
}

/// Duration and lyrics text from a track page
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Lyrics {
    pub track_id: String,
    pub duration: Option<String>,
    pub lyrics: Option<String>,
}

impl TableColumns for AlbumRecord {
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
    ];
}

impl TableColumns for Track {
    const COLUMNS: &'static [&'static str] = &["album_id", "track_id", "track_title"];
}

impl TableColumns for Lyrics {
    const COLUMNS: &'static [&'static str] = &["track_id", "duration", "lyrics"];
}
