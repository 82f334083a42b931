//! Row filters for the final dataset, plus the scrape-stage album pre-filter
//!
//! Each [`FilterStep`] is a pure predicate on one row, so the set of rows
//! removed does not depend on the order the steps run in. The per-step
//! counts do.

use std::fmt;

use serde::Serialize;
use tracing::info;

use crate::application::run_report::FilterCount;
use crate::domain::{AlbumSummary, CatalogRow, EntityTable};
use crate::infrastructure::CleaningConfig;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterStep {
    /// Compilation albums credited to the various-artists marker
    VariousArtists,
    /// Rows with no usable lyrics
    MissingLyrics,
    AlbumTitleMarker,
    TrackTitleMarker,
}

impl FilterStep {
    pub const ALL: [FilterStep; 4] = [
        Self::VariousArtists,
        Self::MissingLyrics,
        Self::AlbumTitleMarker,
        Self::TrackTitleMarker,
    ];
}

impl fmt::Display for FilterStep {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::VariousArtists => "various_artists",
            Self::MissingLyrics => "missing_lyrics",
            Self::AlbumTitleMarker => "album_title_marker",
            Self::TrackTitleMarker => "track_title_marker",
        };
        f.write_str(name)
    }
}

/// Outcome of running a sequence of filter steps
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterReport {
    pub kept: Vec<CatalogRow>,
    pub counts: Vec<FilterCount>,
}

impl FilterReport {
    pub fn removed(&self) -> usize {
        self.counts.iter().map(|c| c.removed).sum()
    }
}

/// Markers normalized once for repeated matching
#[derive(Debug, Clone)]
pub struct RecordFilter {
    various_artists: String,
    null_literals: Vec<String>,
    album_title_markers: Vec<String>,
    track_title_markers: Vec<String>,
}

fn lowercased(items: &[String]) -> Vec<String> {
    items.iter().map(|s| s.to_lowercase()).collect()
}

fn contains_any(haystack: Option<&str>, markers: &[String]) -> bool {
    haystack.is_some_and(|text| {
        let text = text.to_lowercase();
        markers.iter().any(|m| text.contains(m.as_str()))
    })
}

impl RecordFilter {
    pub fn from_config(config: &CleaningConfig) -> Self {
        Self {
            various_artists: config.various_artists.trim().to_string(),
            null_literals: lowercased(&config.null_literals),
            album_title_markers: lowercased(&config.album_title_markers),
            track_title_markers: lowercased(&config.track_title_markers),
        }
    }

    /// True when `step` removes `row`
    pub fn matches(&self, step: FilterStep, row: &CatalogRow) -> bool {
        match step {
            FilterStep::VariousArtists => {
                let raw = row.artist_name.as_deref().map(str::trim);
                let clean = row.artist_name_clean.as_deref();
                raw == Some(self.various_artists.as_str())
                    || clean == Some(self.various_artists.as_str())
            }
            FilterStep::MissingLyrics => match row.lyrics.as_deref().map(str::trim) {
                None | Some("") => true,
                Some(text) => {
                    let text = text.to_lowercase();
                    self.null_literals.iter().any(|literal| *literal == text)
                }
            },
            FilterStep::AlbumTitleMarker => {
                contains_any(row.album_title.as_deref(), &self.album_title_markers)
            }
            FilterStep::TrackTitleMarker => {
                contains_any(row.track_title.as_deref(), &self.track_title_markers)
            }
        }
    }

    pub fn apply(&self, rows: Vec<CatalogRow>) -> FilterReport {
        self.apply_steps(rows, &FilterStep::ALL)
    }

    /// Run `steps` in order, logging how many rows each one removes
    pub fn apply_steps(&self, rows: Vec<CatalogRow>, steps: &[FilterStep]) -> FilterReport {
        let mut kept = rows;
        let mut counts = Vec::with_capacity(steps.len());

        for &step in steps {
            let before = kept.len();
            kept.retain(|row| !self.matches(step, row));
            let removed = before - kept.len();
            info!("Filter {}: removed {} rows ({} remain)", step, removed, kept.len());
            counts.push(FilterCount { step: step.to_string(), removed });
        }

        FilterReport { kept, counts }
    }
}

/// Prune album summaries before any detail page is fetched. Matching is
/// case-sensitive, unlike the final filters. Returns how many were removed.
pub fn prefilter_album_summaries(
    albums: &mut EntityTable<AlbumSummary>,
    config: &CleaningConfig,
) -> usize {
    let removed = albums.retain(|album| {
        let title_hit = album.album_title.as_deref().is_some_and(|title| {
            config
                .prefetch_album_title_markers
                .iter()
                .any(|marker| title.contains(marker.as_str()))
        });
        let artist_hit = album
            .artist_name
            .as_deref()
            .is_some_and(|name| name.contains(config.various_artists.as_str()));
        !(title_hit || artist_hit)
    });
    info!("Pre-filter removed {} albums ({} remain)", removed, albums.len());
    removed
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::TrackKey;
    use proptest::prelude::*;
    use rstest::rstest;

    fn row(album_title: &str, artist: &str, track_title: &str, lyrics: Option<&str>) -> CatalogRow {
        CatalogRow {
            album_id: "1".into(),
            album_title: Some(album_title.into()),
            artist_name: Some(artist.into()),
            release_date_raw: None,
            release_date: None,
            album_type: None,
            artist_id: Some("80049126".into()),
            genre: None,
            style: None,
            distributor: None,
            agency: None,
            total_duration: None,
            thumbnail: None,
            track_id: Some(TrackKey::Numeric(10)),
            track_title: Some(track_title.into()),
            duration: None,
            lyrics: lyrics.map(str::to_string),
            artist_name_clean: Some(artist.trim().into()),
        }
    }

    fn filter() -> RecordFilter {
        RecordFilter::from_config(&CleaningConfig::default())
    }

    #[rstest]
    #[case(row("Bloom", "Various Artists", "Song", Some("la")), FilterStep::VariousArtists)]
    #[case(row("Bloom", "Blossom", "Song", None), FilterStep::MissingLyrics)]
    #[case(row("Bloom", "Blossom", "Song", Some("  ")), FilterStep::MissingLyrics)]
    #[case(row("Bloom", "Blossom", "Song", Some("NaN")), FilterStep::MissingLyrics)]
    #[case(row("Bloom (REMIX)", "Blossom", "Song", Some("la")), FilterStep::AlbumTitleMarker)]
    #[case(row("Bloom -Japan Edition-", "Blossom", "Song", Some("la")), FilterStep::AlbumTitleMarker)]
    #[case(row("Bloom Repackage", "Blossom", "Song", Some("la")), FilterStep::AlbumTitleMarker)]
    #[case(row("Bloom", "Blossom", "Song (Chinese ver.)", Some("la")), FilterStep::TrackTitleMarker)]
    #[case(row("Bloom", "Blossom", "Song Inst Mix", Some("la")), FilterStep::TrackTitleMarker)]
    #[case(row("Bloom", "Blossom", "Song (Remix)", Some("la")), FilterStep::TrackTitleMarker)]
    fn test_step_matches(#[case] row: CatalogRow, #[case] step: FilterStep) {
        assert!(filter().matches(step, &row));
    }

    #[rstest]
    #[case(row("Bloom", "Blossom", "Song", Some("la")))]
    #[case(row("Bloom Version 2", "Blossom", "Song", Some("la")))]
    #[case(row("Bloom", "Blossom", "Song (Inst.)", Some("la")))]
    #[case(row("Bloom", "Blossom", "Instinct", Some("la")))]
    #[case(row("Bloom", "Blossom", "Clever", Some("Nonetheless")))]
    fn test_clean_rows_survive(#[case] row: CatalogRow) {
        let f = filter();
        assert!(FilterStep::ALL.iter().all(|&step| !f.matches(step, &row)));
    }

    #[test]
    fn test_ver_marker_is_literal() {
        let f = filter();
        assert!(!f.matches(FilterStep::TrackTitleMarker, &row("Bloom", "Blossom", "Fever", Some("la"))));
        assert!(f.matches(FilterStep::TrackTitleMarker, &row("Bloom", "Blossom", "Song Eng ver.", Some("la"))));
    }

    #[test]
    fn test_counts_reported_per_step() {
        let rows = vec![
            row("Bloom", "Various Artists", "Song", None),
            row("Bloom", "Blossom", "Song", None),
            row("Bloom Remix", "Blossom", "Song", Some("la")),
            row("Bloom", "Blossom", "Song", Some("la")),
        ];
        let report = filter().apply(rows);
        assert_eq!(report.kept.len(), 1);
        let removed: Vec<usize> = report.counts.iter().map(|c| c.removed).collect();
        assert_eq!(removed, vec![1, 1, 1, 0]);
        assert_eq!(report.counts[0].step, "various_artists");
    }

    #[test]
    fn test_prefilter_is_case_sensitive() {
        let config = CleaningConfig::default();
        let album = |title: &str, artist: &str| AlbumSummary {
            album_id: title.into(),
            album_title: Some(title.into()),
            artist_name: Some(artist.into()),
            release_date: None,
            album_type: None,
            artist_id: "1".into(),
        };
        let mut albums: EntityTable<AlbumSummary> = vec![
            album("Drama OST", "Blossom"),
            album("Drama ost", "Blossom"),
            album("일본 데뷔", "Blossom"),
            album("Hits", "Various Artists"),
            album("권리없는 앨범", "Blossom"),
            album("Bloom", "Blossom"),
        ]
        .into_iter()
        .collect();

        assert_eq!(prefilter_album_summaries(&mut albums, &config), 4);
        let titles: Vec<&str> = albums.iter().filter_map(|a| a.album_title.as_deref()).collect();
        assert_eq!(titles, vec!["Drama ost", "Bloom"]);
    }

    fn arb_row() -> impl Strategy<Value = CatalogRow> {
        let title = prop::sample::select(vec!["Bloom", "Bloom Remix", "Japan Tour", "Hits"]);
        let artist = prop::sample::select(vec!["Blossom", "Various Artists"]);
        let track = prop::sample::select(vec!["Song", "Song (Inst.)", "Song Chinese ver."]);
        let lyrics = prop::sample::select(vec![None, Some("la"), Some("nan"), Some(" ")]);
        (title, artist, track, lyrics).prop_map(|(a, b, c, d)| row(a, b, c, d))
    }

    proptest! {
        #[test]
        fn removed_set_is_order_independent(
            rows in prop::collection::vec(arb_row(), 0..30),
            order in Just(FilterStep::ALL.to_vec()).prop_shuffle(),
        ) {
            let f = filter();
            let forward = f.apply_steps(rows.clone(), &FilterStep::ALL);
            let shuffled = f.apply_steps(rows, &order);
            prop_assert_eq!(forward.removed(), shuffled.removed());
            prop_assert_eq!(forward.kept, shuffled.kept);
        }
    }
}
