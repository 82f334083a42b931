//! Album list parser
//!
//! Reads every album block from an artist's album listing page. Missing
//! descendants become nulls; a block without an album id is a structural
//! error and fails the whole page.

use scraper::Html;
use tracing::debug;

use super::config::{fields, ParsingConfig};
use super::schema::{CompiledSchema, RecordSchema};
use super::{ContextualParser, ParseContext, ParsingResult};
use crate::domain::AlbumSummary;

/// Parser for `/artist/{id}/albums` pages
#[derive(Debug)]
pub struct AlbumListParser {
    schema: CompiledSchema,
}

impl AlbumListParser {
    pub fn new() -> ParsingResult<Self> {
        Self::with_schema(&ParsingConfig::default().album_list)
    }

    pub fn with_schema(schema: &RecordSchema) -> ParsingResult<Self> {
        Ok(Self {
            schema: CompiledSchema::compile(schema)?,
        })
    }
}

impl ContextualParser for AlbumListParser {
    type Output = Vec<AlbumSummary>;

    fn parse_with_context(&self, html: &Html, context: &ParseContext) -> ParsingResult<Self::Output> {
        let records = self.schema.extract_all(html)?;
        let mut albums = Vec::with_capacity(records.len());

        for mut values in records {
            albums.push(AlbumSummary {
                album_id: values.take_required(fields::ALBUM_ID)?,
                album_title: values.take(fields::ALBUM_TITLE),
                artist_name: values.take(fields::ARTIST_NAME),
                release_date: values.take(fields::RELEASE_DATE),
                album_type: values.take(fields::ALBUM_TYPE),
                artist_id: context.identifier.clone(),
            });
        }

        debug!("Extracted {} albums for artist {}", albums.len(), context.identifier);
        Ok(albums)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::infrastructure::parsing::ParsingError;
    use crate::test_utils::fixtures;

    #[test]
    fn test_parses_album_blocks() {
        let parser = AlbumListParser::new().unwrap();
        let albums = parser
            .parse_str(&fixtures::album_list_page(), &ParseContext::new("80049126"))
            .unwrap();

        assert_eq!(albums.len(), 2);
        let first = &albums[0];
        assert_eq!(first.album_id, "4000001");
        assert_eq!(first.album_title.as_deref(), Some("First Bloom"));
        assert_eq!(first.artist_id, "80049126");
        assert!(first.release_date.as_deref().unwrap().starts_with("<time"));
        assert!(first.album_type.as_deref().unwrap().contains("정규"));
    }

    #[test]
    fn test_missing_descendants_become_null() {
        let parser = AlbumListParser::new().unwrap();
        let html = r#"<figure class="albumInfo" albumid="77"><div class="albumTitle">Bare</div></figure>"#;
        let albums = parser.parse_str(html, &ParseContext::new("1")).unwrap();

        assert_eq!(albums.len(), 1);
        assert_eq!(albums[0].album_id, "77");
        assert_eq!(albums[0].artist_name, None);
        assert_eq!(albums[0].release_date, None);
        assert_eq!(albums[0].album_type, None);
    }

    #[test]
    fn test_block_without_album_id_fails_page() {
        let parser = AlbumListParser::new().unwrap();
        let html = r#"<figure class="albumInfo"><div class="albumTitle">No id</div></figure>"#;
        let err = parser.parse_str(html, &ParseContext::new("1")).unwrap_err();
        assert!(matches!(err, ParsingError::RequiredFieldMissing { .. }));
    }

    #[test]
    fn test_page_without_albums_is_empty() {
        let parser = AlbumListParser::new().unwrap();
        let albums = parser.parse_str("<html><body></body></html>", &ParseContext::new("1")).unwrap();
        assert!(albums.is_empty());
    }
}
