//! Join key for the track ↔ lyrics join after reconciliation.

use serde::{Serialize, Serializer};
use std::fmt;

/// Representation chosen for both `track_id` columns of a join
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum KeyRepresentation {
    Numeric,
    Text,
}

/// A reconciled `track_id`
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum TrackKey {
    Numeric(i64),
    Text(String),
}

impl TrackKey {
    /// Parse a raw id as an integer, tolerating surrounding whitespace and a
    /// trailing `.0` left behind by float-typed exports
    pub fn parse_numeric(raw: &str) -> Option<i64> {
        let trimmed = raw.trim();
        let digits = trimmed.strip_suffix(".0").unwrap_or(trimmed);
        digits.parse::<i64>().ok()
    }

    pub fn normalized_text(raw: &str) -> Self {
        Self::Text(raw.trim().to_string())
    }
}

impl fmt::Display for TrackKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Numeric(n) => write!(f, "{n}"),
            Self::Text(s) => f.write_str(s),
        }
    }
}

impl Serialize for TrackKey {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Self::Numeric(n) => serializer.serialize_i64(*n),
            Self::Text(s) => serializer.serialize_str(s),
        }
    }
}
