//! Parsing configuration for HTML extraction
//!
//! Centralized record schemas for every page type. The defaults describe the
//! catalog site's markup; any schema can be replaced from the config file.

use serde::{Deserialize, Serialize};

use super::schema::{FieldSpec, RecordSchema, TextTransform, ValueSource};

/// Prefix of the inline player call carrying a track id
pub const PLAYER_CALL_PREFIX: &str = "bugs.wiselog.area('list_tr_09_ab');bugs.music.listen('";

/// Field names shared between the schemas and the extractors
pub mod fields {
    pub const ALBUM_ID: &str = "album_id";
    pub const ALBUM_TITLE: &str = "album_title";
    pub const ARTIST_NAME: &str = "artist_name";
    pub const RELEASE_DATE: &str = "release_date";
    pub const ALBUM_TYPE: &str = "type";

    pub const THUMBNAIL: &str = "thumbnail";
    pub const GENRE: &str = "genre";
    pub const STYLE: &str = "style";
    pub const DISTRIBUTOR: &str = "distributor";
    pub const AGENCY: &str = "agency";
    pub const TOTAL_DURATION: &str = "total_duration";

    pub const TRACK_ID: &str = "track_id";
    pub const TRACK_TITLE: &str = "track_title";

    pub const DURATION: &str = "duration";
    pub const LYRICS: &str = "lyrics";
}

/// Main parsing configuration
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ParsingConfig {
    /// `/artist/{id}/albums`: one record per album block
    pub album_list: RecordSchema,

    /// `/album/{id}`: cover art and info-table cells
    pub album_detail: RecordSchema,

    /// `/album/{id}`: one record per track title block
    pub track_list: RecordSchema,

    /// `/track/{id}`: duration and lyrics
    pub lyrics: RecordSchema,
}

impl Default for ParsingConfig {
    fn default() -> Self {
        Self {
            album_list: default_album_list_schema(),
            album_detail: default_album_detail_schema(),
            track_list: default_track_list_schema(),
            lyrics: default_lyrics_schema(),
        }
    }
}

fn default_album_list_schema() -> RecordSchema {
    RecordSchema {
        name: "album_list".to_string(),
        scope: Some("figure.albumInfo".to_string()),
        fields: vec![
            FieldSpec::new(fields::ALBUM_ID, None, ValueSource::Attr("albumid".into())).required(),
            FieldSpec::new(fields::ALBUM_TITLE, Some("div.albumTitle"), ValueSource::Text)
                .with_transform(TextTransform::TrimNewlines),
            FieldSpec::new(fields::ARTIST_NAME, Some("p.artist"), ValueSource::Text)
                .with_transform(TextTransform::TrimNewlines),
            FieldSpec::new(fields::RELEASE_DATE, Some("time"), ValueSource::Markup),
            FieldSpec::new(fields::ALBUM_TYPE, Some("span.albumType"), ValueSource::Markup),
        ],
    }
}

/// Info-table positions. These offsets were read off live pages and are not a
/// documented contract of the site.
fn default_album_detail_schema() -> RecordSchema {
    const CELLS: &str = "table.info tbody td";
    let cell = |name: &str, index: usize| {
        FieldSpec::new(name, Some(CELLS), ValueSource::NthMatch(index))
            .with_transform(TextTransform::Trim)
            .required()
    };

    RecordSchema {
        name: "album_detail".to_string(),
        scope: None,
        fields: vec![
            FieldSpec::new(fields::THUMBNAIL, Some("li.big a img"), ValueSource::Attr("src".into()))
                .required(),
            cell(fields::GENRE, 2),
            cell(fields::STYLE, 3),
            cell(fields::DISTRIBUTOR, 5),
            cell(fields::AGENCY, 6),
            cell(fields::TOTAL_DURATION, 7),
        ],
    }
}

fn default_track_list_schema() -> RecordSchema {
    RecordSchema {
        name: "track_list".to_string(),
        scope: Some("p.title".to_string()),
        fields: vec![
            FieldSpec::new(fields::TRACK_ID, Some("a"), ValueSource::Attr("onclick".into()))
                .with_transform(TextTransform::CallArgument {
                    prefix: PLAYER_CALL_PREFIX.to_string(),
                    delimiter: '\'',
                })
                .required(),
            FieldSpec::new(fields::TRACK_TITLE, None, ValueSource::Text)
                .with_transform(TextTransform::DropNewlines),
        ],
    }
}

fn default_lyrics_schema() -> RecordSchema {
    RecordSchema {
        name: "lyrics".to_string(),
        scope: None,
        fields: vec![
            FieldSpec::new(fields::DURATION, Some("time"), ValueSource::Text).required(),
            FieldSpec::new(fields::LYRICS, Some("div.lyricsContainer xmp"), ValueSource::Text)
                .with_transform(TextTransform::LineBreaksToSpace)
                .required(),
        ],
    }
}
