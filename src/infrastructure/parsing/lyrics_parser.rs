//! Lyrics parser

use scraper::Html;
use tracing::debug;

use super::config::{fields, ParsingConfig};
use super::schema::{CompiledSchema, RecordSchema};
use super::{ContextualParser, ParseContext, ParsingResult};
use crate::domain::Lyrics;

/// Parser for `/track/{id}` pages
#[derive(Debug)]
pub struct LyricsParser {
    schema: CompiledSchema,
}

impl LyricsParser {
    pub fn new() -> ParsingResult<Self> {
        Self::with_schema(&ParsingConfig::default().lyrics)
    }

    pub fn with_schema(schema: &RecordSchema) -> ParsingResult<Self> {
        Ok(Self {
            schema: CompiledSchema::compile(schema)?,
        })
    }
}

impl ContextualParser for LyricsParser {
    type Output = Lyrics;

    fn parse_with_context(&self, html: &Html, context: &ParseContext) -> ParsingResult<Self::Output> {
        let mut values = self.schema.extract_one(html)?;
        let lyrics = Lyrics {
            track_id: context.identifier.clone(),
            duration: Some(values.take_required(fields::DURATION)?),
            lyrics: Some(values.take_required(fields::LYRICS)?),
        };
        debug!("Extracted lyrics for track {}", context.identifier);
        Ok(lyrics)
    }
}
