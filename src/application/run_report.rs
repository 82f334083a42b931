//! Per-item outcome accounting for one pipeline run
//!
//! Every identifier a stage processes ends up as exactly one [`ItemReport`].
//! Partial failure is therefore a data structure that can be inspected,
//! serialized and asserted on.

use serde::Serialize;
use thiserror::Error;

use crate::domain::KeyRepresentation;
use crate::infrastructure::{FetchError, ParsingError};

/// Why a single identifier produced no records
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ScrapeError {
    #[error(transparent)]
    Fetch(#[from] FetchError),

    #[error(transparent)]
    Extraction(#[from] ParsingError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureKind {
    Fetch,
    Extraction,
}

impl ScrapeError {
    pub fn kind(&self) -> FailureKind {
        match self {
            Self::Fetch(_) => FailureKind::Fetch,
            Self::Extraction(_) => FailureKind::Extraction,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Stage {
    Albums,
    AlbumDetails,
    Tracks,
    Lyrics,
}

impl Stage {
    pub fn label(self) -> &'static str {
        match self {
            Self::Albums => "albums",
            Self::AlbumDetails => "album details",
            Self::Tracks => "tracks",
            Self::Lyrics => "lyrics",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum ItemOutcome {
    Success { records: usize },
    Skipped { reason: String },
    Failed { kind: FailureKind, error: String },
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemReport {
    pub identifier: String,
    #[serde(flatten)]
    pub outcome: ItemOutcome,
}

/// Outcomes of one stage, in processing order
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct StageReport {
    pub stage: Stage,
    pub items: Vec<ItemReport>,
}

impl StageReport {
    pub fn new(stage: Stage) -> Self {
        Self { stage, items: Vec::new() }
    }

    pub fn record(&mut self, identifier: &str, outcome: ItemOutcome) {
        self.items.push(ItemReport {
            identifier: identifier.to_string(),
            outcome,
        });
    }

    pub fn succeeded(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Success { .. }))
    }

    pub fn skipped(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Skipped { .. }))
    }

    pub fn failed(&self) -> usize {
        self.count(|o| matches!(o, ItemOutcome::Failed { .. }))
    }

    pub fn outcome_of(&self, identifier: &str) -> Option<&ItemOutcome> {
        self.items
            .iter()
            .find(|item| item.identifier == identifier)
            .map(|item| &item.outcome)
    }

    fn count(&self, pred: impl Fn(&ItemOutcome) -> bool) -> usize {
        self.items.iter().filter(|item| pred(&item.outcome)).count()
    }
}

/// Rows removed by one filter step
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FilterCount {
    pub step: String,
    pub removed: usize,
}

/// Counters from the cleaning and merge stage
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct CleaningSummary {
    pub login_wall_tracks_removed: usize,
    pub key_representation: Option<KeyRepresentation>,
    pub tracks_dropped_by_reconciliation: usize,
    pub lyrics_dropped_by_reconciliation: usize,
    pub duplicate_lyrics_ignored: usize,
    pub merged_rows: usize,
    pub filters: Vec<FilterCount>,
    pub final_rows: usize,
    pub unique_albums: usize,
    pub unique_tracks: usize,
    pub unique_artists: usize,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct RunReport {
    pub stages: Vec<StageReport>,
    /// Albums pruned before details were fetched
    pub prefiltered_albums: usize,
    pub cleaning: Option<CleaningSummary>,
}

impl RunReport {
    pub fn stage(&self, stage: Stage) -> Option<&StageReport> {
        self.stages.iter().find(|s| s.stage == stage)
    }

    pub fn total_failures(&self) -> usize {
        self.stages.iter().map(StageReport::failed).sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stage_counts() {
        let mut report = StageReport::new(Stage::Lyrics);
        report.record("1", ItemOutcome::Success { records: 1 });
        report.record("2", ItemOutcome::Skipped { reason: "placeholder id".into() });
        report.record(
            "3",
            ItemOutcome::Failed { kind: FailureKind::Fetch, error: "HTTP error 404".into() },
        );
        report.record("4", ItemOutcome::Success { records: 1 });

        assert_eq!(report.succeeded(), 2);
        assert_eq!(report.skipped(), 1);
        assert_eq!(report.failed(), 1);
        assert!(matches!(report.outcome_of("3"), Some(ItemOutcome::Failed { .. })));
    }

    #[test]
    fn test_report_serializes_flat_outcomes() {
        let mut report = StageReport::new(Stage::Tracks);
        report.record("9", ItemOutcome::Success { records: 3 });
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["stage"], "tracks");
        assert_eq!(json["items"][0]["identifier"], "9");
        assert_eq!(json["items"][0]["outcome"], "success");
        assert_eq!(json["items"][0]["records"], 3);
    }
}
