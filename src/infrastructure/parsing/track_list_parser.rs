//! Track list parser
//!
//! Track ids are scraped out of the inline player call on each title link.
//! A call of an unexpected shape still produces an id-like string; the cleaning
//! stage is responsible for recognising and dropping those.

use scraper::Html;
use tracing::debug;

use super::config::{fields, ParsingConfig};
use super::schema::{CompiledSchema, RecordSchema};
use super::{ContextualParser, ParseContext, ParsingResult};
use crate::domain::Track;

/// Parser for the track table of `/album/{id}` pages
#[derive(Debug)]
pub struct TrackListParser {
    schema: CompiledSchema,
}

impl TrackListParser {
    pub fn new() -> ParsingResult<Self> {
        Self::with_schema(&ParsingConfig::default().track_list)
    }

    pub fn with_schema(schema: &RecordSchema) -> ParsingResult<Self> {
        Ok(Self {
            schema: CompiledSchema::compile(schema)?,
        })
    }
}

impl ContextualParser for TrackListParser {
    type Output = Vec<Track>;

    fn parse_with_context(&self, html: &Html, context: &ParseContext) -> ParsingResult<Self::Output> {
        let tracks = self
            .schema
            .extract_all(html)?
            .into_iter()
            .map(|mut values| {
                Ok(Track {
                    album_id: context.identifier.clone(),
                    track_id: values.take_required(fields::TRACK_ID)?,
                    track_title: values.take(fields::TRACK_TITLE),
                })
            })
            .collect::<ParsingResult<Vec<_>>>()?;

        debug!("Extracted {} tracks for album {}", tracks.len(), context.identifier);
        Ok(tracks)
    }
}
