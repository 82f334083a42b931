//! Extraction error types for HTML parsing operations
//!
//! Structural problems found while turning a page into records. A parsing
//! error always concerns a single page; callers log it against the page's
//! identifier and move on.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ParsingError {
    #[error("Required field '{field}' not found in {schema}")]
    RequiredFieldMissing { schema: String, field: String },

    #[error("Invalid CSS selector: {selector} - {reason}")]
    InvalidSelector { selector: String, reason: String },

    #[error("Field '{field}' in {schema} wants match #{index} but only {available} present")]
    CellIndexOutOfRange {
        schema: String,
        field: String,
        index: usize,
        available: usize,
    },

    #[error("Schema {schema} references unknown field '{field}'")]
    UnknownField { schema: String, field: String },
}

impl ParsingError {
    pub fn required_field_missing(schema: &str, field: &str) -> Self {
        Self::RequiredFieldMissing {
            schema: schema.to_string(),
            field: field.to_string(),
        }
    }

    pub fn invalid_selector(selector: &str, reason: impl ToString) -> Self {
        Self::InvalidSelector {
            selector: selector.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type ParsingResult<T> = Result<T, ParsingError>;
