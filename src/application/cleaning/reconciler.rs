//! Login-wall removal and track key reconciliation
//!
//! Tracks and lyrics are exported as separate tables whose `track_id` columns
//! may not agree on a type (one side numeric, the other carrying stray text).
//! Before they are joined both sides are coerced to one [`KeyRepresentation`].

use tracing::{info, warn};

use crate::domain::{EntityTable, KeyRepresentation, Lyrics, Track, TrackKey};

/// Track and lyrics rows keyed by a shared representation
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReconciledTables {
    pub representation: KeyRepresentation,
    pub tracks: Vec<(TrackKey, Track)>,
    pub lyrics: Vec<(TrackKey, Lyrics)>,
    pub dropped_tracks: usize,
    pub dropped_lyrics: usize,
}

/// Drop tracks whose id carries the login-wall sentinel. Returns how many
/// were removed.
pub fn remove_login_wall_tracks(tracks: &mut EntityTable<Track>, sentinel: &str) -> usize {
    let removed = tracks.retain(|track| {
        let locked = track.track_id.contains(sentinel);
        if locked {
            warn!(
                "Dropping login-wall track '{}' in album {}",
                track.track_title.as_deref().unwrap_or_default(),
                track.album_id
            );
        }
        !locked
    });
    if removed > 0 {
        info!("Removed {} login-wall tracks", removed);
    }
    removed
}

/// A column is numeric when most of its non-blank ids parse as integers.
/// A stray scrape artifact among numeric ids does not flip the column.
fn is_numeric_column<'a>(ids: impl IntoIterator<Item = &'a str>) -> bool {
    let (mut present, mut numeric) = (0usize, 0usize);
    for id in ids.into_iter().filter(|id| !id.trim().is_empty()) {
        present += 1;
        if TrackKey::parse_numeric(id).is_some() {
            numeric += 1;
        }
    }
    numeric * 2 > present
}

/// Numeric if either column is numeric, otherwise trimmed text
pub fn choose_representation(tracks: &[Track], lyrics: &[Lyrics]) -> KeyRepresentation {
    let tracks_numeric = is_numeric_column(tracks.iter().map(|t| t.track_id.as_str()));
    let lyrics_numeric = is_numeric_column(lyrics.iter().map(|l| l.track_id.as_str()));
    if tracks_numeric || lyrics_numeric {
        KeyRepresentation::Numeric
    } else {
        KeyRepresentation::Text
    }
}

fn coerce(raw: &str, representation: KeyRepresentation) -> Option<TrackKey> {
    if raw.trim().is_empty() {
        return None;
    }
    match representation {
        KeyRepresentation::Numeric => TrackKey::parse_numeric(raw).map(TrackKey::Numeric),
        KeyRepresentation::Text => Some(TrackKey::normalized_text(raw)),
    }
}

fn key_rows<T>(
    rows: Vec<T>,
    representation: KeyRepresentation,
    id_of: impl Fn(&T) -> &str,
) -> (Vec<(TrackKey, T)>, usize) {
    let total = rows.len();
    let keyed: Vec<(TrackKey, T)> = rows
        .into_iter()
        .filter_map(|row| coerce(id_of(&row), representation).map(|key| (key, row)))
        .collect();
    let dropped = total - keyed.len();
    (keyed, dropped)
}

/// Coerce both tables to one key representation. Rows whose id cannot be
/// represented are dropped and counted.
pub fn reconcile(tracks: EntityTable<Track>, lyrics: EntityTable<Lyrics>) -> ReconciledTables {
    let representation = choose_representation(tracks.rows(), lyrics.rows());

    let (tracks, dropped_tracks) =
        key_rows(tracks.into_rows(), representation, |t| t.track_id.as_str());
    let (lyrics, dropped_lyrics) =
        key_rows(lyrics.into_rows(), representation, |l| l.track_id.as_str());

    info!(
        "Reconciled track ids as {:?} ({} tracks, {} lyrics; dropped {} tracks, {} lyrics)",
        representation,
        tracks.len(),
        lyrics.len(),
        dropped_tracks,
        dropped_lyrics
    );

    ReconciledTables { representation, tracks, lyrics, dropped_tracks, dropped_lyrics }
}
