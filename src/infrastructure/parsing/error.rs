//! Error module re-export
//!
//! Parsing errors live in `infrastructure::parsing_error`; this keeps the
//! `parsing::error` path stable for callers.

pub use crate::infrastructure::parsing_error::{ParsingError, ParsingResult};
