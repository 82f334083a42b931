//! Parsing context for HTML extraction
//!
//! Carries the identifier a page was fetched for, so extracted rows can be
//! keyed and failures reported against it.

/// Context information for parsing operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParseContext {
    /// Artist, album or track id used to build the page URL
    pub identifier: String,

    /// URL the page was fetched from, when known
    pub url: Option<String>,
}

impl ParseContext {
    pub fn new(identifier: impl Into<String>) -> Self {
        Self {
            identifier: identifier.into(),
            url: None,
        }
    }

    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }
}
