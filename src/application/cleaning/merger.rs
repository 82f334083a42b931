//! Left joins that assemble the catalog dataset
//!
//! Every join keeps all rows of its left side and never invents rows: an
//! album with no tracks still appears once, with empty track fields.

use std::collections::{HashMap, HashSet};

use tracing::{debug, info};

use super::reconciler::ReconciledTables;
use crate::domain::{AlbumDetail, AlbumRecord, AlbumSummary, CatalogRow, EntityTable, Lyrics, Track, TrackKey};

/// Summary ⟕ detail on `album_id`, then dedup on `(album_id, album_title)`
/// keeping the first occurrence
pub fn join_album_details(
    summaries: EntityTable<AlbumSummary>,
    details: &EntityTable<AlbumDetail>,
) -> EntityTable<AlbumRecord> {
    let mut by_id: HashMap<&str, &AlbumDetail> = HashMap::new();
    for detail in details {
        by_id.entry(detail.album_id.as_str()).or_insert(detail);
    }

    let records: EntityTable<AlbumRecord> = summaries
        .into_iter()
        .map(|summary| {
            let detail = by_id.get(summary.album_id.as_str()).copied();
            AlbumRecord::from_parts(summary, detail)
        })
        .collect();
    dedup_albums(records)
}

/// Drop repeated `(album_id, album_title)` pairs, first one wins
pub fn dedup_albums(albums: EntityTable<AlbumRecord>) -> EntityTable<AlbumRecord> {
    let before = albums.len();
    let mut seen: HashSet<(String, Option<String>)> = HashSet::new();
    let deduped: EntityTable<AlbumRecord> = albums
        .into_iter()
        .filter(|a| seen.insert((a.album_id.clone(), a.album_title.clone())))
        .collect();
    if deduped.len() < before {
        debug!("Dropped {} duplicate album rows", before - deduped.len());
    }
    deduped
}

/// Result of the album ⟕ track ⟕ lyrics join
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MergedCatalog {
    pub rows: Vec<CatalogRow>,
    /// Lyrics rows ignored because an earlier row had the same key
    pub duplicate_lyrics: usize,
}

/// Albums ⟕ tracks on `album_id`, then ⟕ lyrics on the reconciled key.
/// When several lyrics rows share a key the first one is used.
pub fn merge_catalog(albums: EntityTable<AlbumRecord>, reconciled: ReconciledTables) -> MergedCatalog {
    let albums = dedup_albums(albums);

    let mut tracks_by_album: HashMap<String, Vec<(TrackKey, Track)>> = HashMap::new();
    for (key, track) in reconciled.tracks {
        tracks_by_album.entry(track.album_id.clone()).or_default().push((key, track));
    }

    let mut duplicate_lyrics = 0;
    let mut lyrics_by_key: HashMap<TrackKey, Lyrics> = HashMap::new();
    for (key, lyrics) in reconciled.lyrics {
        if lyrics_by_key.contains_key(&key) {
            duplicate_lyrics += 1;
        } else {
            lyrics_by_key.insert(key, lyrics);
        }
    }

    let mut rows = Vec::new();
    for album in albums {
        match tracks_by_album.get(&album.album_id) {
            Some(tracks) => {
                for (key, track) in tracks {
                    let lyrics = lyrics_by_key.get(key);
                    rows.push(catalog_row(&album, Some((key, track)), lyrics));
                }
            }
            None => rows.push(catalog_row(&album, None, None)),
        }
    }

    info!("Merged catalog: {} rows ({} duplicate lyrics ignored)", rows.len(), duplicate_lyrics);
    MergedCatalog { rows, duplicate_lyrics }
}

fn catalog_row(
    album: &AlbumRecord,
    track: Option<(&TrackKey, &Track)>,
    lyrics: Option<&Lyrics>,
) -> CatalogRow {
    CatalogRow {
        album_id: album.album_id.clone(),
        album_title: album.album_title.clone(),
        artist_name: album.artist_name.clone(),
        release_date_raw: album.release_date.clone(),
        release_date: None,
        album_type: album.album_type.clone(),
        artist_id: album.artist_id.clone(),
        genre: album.genre.clone(),
        style: album.style.clone(),
        distributor: album.distributor.clone(),
        agency: album.agency.clone(),
        total_duration: album.total_duration.clone(),
        thumbnail: album.thumbnail.clone(),
        track_id: track.map(|(key, _)| key.clone()),
        track_title: track.and_then(|(_, t)| t.track_title.clone()),
        duration: lyrics.and_then(|l| l.duration.clone()),
        lyrics: lyrics.and_then(|l| l.lyrics.clone()),
        artist_name_clean: None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::cleaning::reconciler::reconcile;

    fn summary(id: &str, title: &str) -> AlbumSummary {
        AlbumSummary {
            album_id: id.into(),
            album_title: Some(title.into()),
            artist_name: Some("Blossom".into()),
            release_date: None,
            album_type: None,
            artist_id: "80049126".into(),
        }
    }

    fn detail(id: &str, genre: &str) -> AlbumDetail {
        AlbumDetail {
            album_id: id.into(),
            genre: Some(genre.into()),
            style: None,
            distributor: None,
            agency: None,
            total_duration: None,
            thumbnail: None,
        }
    }

    fn track(album: &str, id: &str) -> Track {
        Track { album_id: album.into(), track_id: id.into(), track_title: Some(format!("song {id}")) }
    }

    fn lyric(id: &str, text: &str) -> Lyrics {
        Lyrics { track_id: id.into(), duration: Some("3:00".into()), lyrics: Some(text.into()) }
    }

    #[test]
    fn test_album_join_keeps_albums_without_detail() {
        let summaries = vec![summary("1", "A"), summary("2", "B"), summary("1", "A")].into_iter().collect();
        let details = vec![detail("1", "댄스"), detail("1", "발라드")].into_iter().collect();

        let records = join_album_details(summaries, &details);
        assert_eq!(records.len(), 2);
        assert_eq!(records.rows()[0].genre.as_deref(), Some("댄스"));
        assert_eq!(records.rows()[1].genre, None);
        assert_eq!(records.rows()[1].artist_id.as_deref(), Some("80049126"));
    }

    #[test]
    fn test_merge_is_left_preserving() {
        let albums = join_album_details(
            vec![summary("1", "A"), summary("2", "Empty")].into_iter().collect(),
            &EntityTable::new(),
        );
        let reconciled = reconcile(
            vec![track("1", "10"), track("1", "11")].into_iter().collect(),
            vec![lyric("10", "first"), lyric("10", "again")].into_iter().collect(),
        );

        let merged = merge_catalog(albums, reconciled);
        assert_eq!(merged.rows.len(), 3);
        assert_eq!(merged.duplicate_lyrics, 1);

        let first = &merged.rows[0];
        assert_eq!(first.track_id, Some(TrackKey::Numeric(10)));
        assert_eq!(first.lyrics.as_deref(), Some("first"));

        let second = &merged.rows[1];
        assert_eq!(second.track_id, Some(TrackKey::Numeric(11)));
        assert_eq!(second.lyrics, None);

        let empty = &merged.rows[2];
        assert_eq!(empty.album_id, "2");
        assert_eq!(empty.track_id, None);
        assert_eq!(empty.track_title, None);
    }

    #[test]
    fn test_tracks_of_unknown_albums_are_not_added() {
        let albums = join_album_details(vec![summary("1", "A")].into_iter().collect(), &EntityTable::new());
        let reconciled = reconcile(
            vec![track("1", "10"), track("999", "20")].into_iter().collect(),
            EntityTable::new(),
        );
        let merged = merge_catalog(albums, reconciled);
        assert_eq!(merged.rows.len(), 1);
        assert!(merged.rows.iter().all(|r| r.album_id == "1"));
    }
}
