//! Album detail parser
//!
//! Cover art plus fixed positions of the album info table.

use scraper::Html;
use tracing::debug;

use super::config::{fields, ParsingConfig};
use super::schema::{CompiledSchema, RecordSchema};
use super::{ContextualParser, ParseContext, ParsingResult};
use crate::domain::AlbumDetail;

/// Parser for the detail part of `/album/{id}` pages
#[derive(Debug)]
pub struct AlbumDetailParser {
    schema: CompiledSchema,
}

impl AlbumDetailParser {
    pub fn new() -> ParsingResult<Self> {
        Self::with_schema(&ParsingConfig::default().album_detail)
    }

    pub fn with_schema(schema: &RecordSchema) -> ParsingResult<Self> {
        Ok(Self {
            schema: CompiledSchema::compile(schema)?,
        })
    }
}

impl ContextualParser for AlbumDetailParser {
    type Output = AlbumDetail;

    fn parse_with_context(&self, html: &Html, context: &ParseContext) -> ParsingResult<Self::Output> {
        let mut values = self.schema.extract_one(html)?;

        let detail = AlbumDetail {
            album_id: context.identifier.clone(),
            thumbnail: Some(values.take_required(fields::THUMBNAIL)?),
            genre: values.take(fields::GENRE),
            style: values.take(fields::STYLE),
            distributor: values.take(fields::DISTRIBUTOR),
            agency: values.take(fields::AGENCY),
            total_duration: values.take(fields::TOTAL_DURATION),
        };

        debug!("Extracted detail for album {}", context.identifier);
        Ok(detail)
    }
}
