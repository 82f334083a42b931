//! HTML parsing infrastructure
//!
//! Every page type is described by a declarative [`schema::RecordSchema`]
//! (see [`config::ParsingConfig`]) and read by a small extractor that turns
//! the schema's field values into domain records. Extractors are pure: they
//! take a parsed document and never perform I/O.

pub mod album_detail_parser;
pub mod album_list_parser;
pub mod config;
pub mod context;
pub mod error;
pub mod lyrics_parser;
pub mod schema;
pub mod track_list_parser;

// Re-export public types
pub use album_detail_parser::AlbumDetailParser;
pub use album_list_parser::AlbumListParser;
pub use config::ParsingConfig;
pub use context::ParseContext;
pub use error::{ParsingError, ParsingResult};
pub use lyrics_parser::LyricsParser;
pub use track_list_parser::TrackListParser;

use scraper::Html;
use tracing::debug;

/// Parser that reads one page type given the identifier it was fetched for
pub trait ContextualParser {
    type Output;

    /// Parse an already-built document
    fn parse_with_context(&self, html: &Html, context: &ParseContext) -> ParsingResult<Self::Output>;

    /// Build the document from a response body, then parse it
    fn parse_str(&self, body: &str, context: &ParseContext) -> ParsingResult<Self::Output> {
        let html = Html::parse_document(body);
        self.parse_with_context(&html, context).inspect_err(|e| {
            debug!(
                "Extraction failed for {} at {}: {}",
                context.identifier,
                context.url.as_deref().unwrap_or("<no url>"),
                e
            );
        })
    }
}

/// All four extractors, compiled from one [`ParsingConfig`]
#[derive(Debug)]
pub struct CatalogParsers {
    pub album_list: AlbumListParser,
    pub album_detail: AlbumDetailParser,
    pub track_list: TrackListParser,
    pub lyrics: LyricsParser,
}

impl CatalogParsers {
    pub fn from_config(config: &ParsingConfig) -> ParsingResult<Self> {
        Ok(Self {
            album_list: AlbumListParser::with_schema(&config.album_list)?,
            album_detail: AlbumDetailParser::with_schema(&config.album_detail)?,
            track_list: TrackListParser::with_schema(&config.track_list)?,
            lyrics: LyricsParser::with_schema(&config.lyrics)?,
        })
    }
}
