//! End-to-end runs against a fake catalog served from memory

use std::fs;
use std::sync::Arc;

use bugs_catalog_etl::application::cleaning::{merge_catalog, reconcile};
use bugs_catalog_etl::application::{
    load_artist_ids, run_all, run_clean, run_scrape, ItemOutcome, ScrapedTables, Stage,
};
use bugs_catalog_etl::domain::TrackKey;
use bugs_catalog_etl::infrastructure::csv_store;
use bugs_catalog_etl::test_utils::{test_config, FakeSite};

fn two_album_site() -> FakeSite {
    FakeSite::new()
        .artist(
            "80049126",
            &[("4000001", "First Bloom", "Blossom"), ("4000002", "Remix Edition", "Blossom")],
        )
        .album("4000001", &[("6000001", "Petal"), ("6000002", "Stem")])
        .album("4000002", &[("6000003", "Petal (Club Mix)")])
        .track("6000001", "3:21", Some("first line\r\nsecond line"))
        // 6000002 has no lyrics container
        .track("6000002", "2:59", None)
        .track("6000003", "4:02", Some("la la"))
}

#[tokio::test]
async fn only_clean_album_survives_title_filter() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let fetcher = Arc::new(two_album_site().build());

    let (output, report) = run_all(&config, fetcher, &["80049126".to_string()])
        .await
        .unwrap();

    assert!(!output.rows.is_empty());
    assert!(output.rows.iter().all(|row| row.album_id == "4000001"));
    assert_eq!(output.rows.len(), 1);
    assert_eq!(output.rows[0].track_id, Some(TrackKey::Numeric(6_000_001)));
    assert_eq!(output.rows[0].lyrics.as_deref(), Some("first line second line"));

    assert!(config.paths.final_path().exists());
    assert!(config.paths.report_path().exists());
    assert!(report.cleaning.is_some());
}

#[tokio::test]
async fn missing_lyrics_container_is_a_recorded_item_not_a_crash() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let fetcher = Arc::new(two_album_site().build());

    let (tables, report) = run_scrape(&config, fetcher, &["80049126".to_string()])
        .await
        .unwrap();

    assert_eq!(tables.tracks.len(), 3);
    assert_eq!(tables.lyrics.len(), 2);
    let lyrics_stage = report.stage(Stage::Lyrics).unwrap();
    assert!(matches!(lyrics_stage.outcome_of("6000002"), Some(ItemOutcome::Failed { .. })));

    // Before filtering, the track is still present with null lyrics
    let reloaded = ScrapedTables::load(&config.paths).unwrap();
    let merged = merge_catalog(reloaded.albums, reconcile(reloaded.tracks, reloaded.lyrics));
    let stem = merged
        .rows
        .iter()
        .find(|row| row.track_id == Some(TrackKey::Numeric(6_000_002)))
        .unwrap();
    assert_eq!(stem.lyrics, None);

    let output = run_clean(&config).unwrap();
    assert!(output.rows.iter().all(|row| row.track_id != Some(TrackKey::Numeric(6_000_002))));
}

#[tokio::test]
async fn login_wall_tracks_never_reach_the_dataset() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let locked = r#"<html><body>
<ul><li class="big"><a><img src="https://image.bugsm.co.kr/album/images/500/4000009.jpg"></a></li></ul>
<table class="info"><tbody>
<tr><td>a</td></tr><tr><td>b</td></tr><tr><td>댄스</td></tr><tr><td>K-Pop</td></tr>
<tr><td>e</td></tr><tr><td>Dreamus</td></tr><tr><td>Blossom Ent.</td></tr><tr><td>3:00</td></tr>
</tbody></table>
<table><tbody>
<tr><th><p class="title"><a onclick="bugs.wiselog.area('list_tr_09_ab');bugs.music.listen('6000009',true);">Open</a></p></th></tr>
<tr><th><p class="title"><a onclick="bugs.wiselog.area('list_tr_09_ab');bugs.music.showLoginLayer();">Locked</a></p></th></tr>
</tbody></table>
</body></html>"#;
    let site = FakeSite::new()
        .artist("1", &[("4000009", "Petals", "Blossom")])
        .album_body("4000009", locked)
        .track("6000009", "3:00", Some("words"));

    let (output, report) = run_all(&config, Arc::new(site.build()), &["1".to_string()])
        .await
        .unwrap();

    let summary = report.cleaning.unwrap();
    assert_eq!(summary.login_wall_tracks_removed, 1);
    assert_eq!(output.rows.len(), 1);
    let written = fs::read_to_string(config.paths.final_path()).unwrap();
    assert!(!written.contains("howLoginLayer"));

    let raw_tracks = fs::read_to_string(config.paths.tracks_path()).unwrap();
    assert!(raw_tracks.contains("howLoginLayer"));
}

#[tokio::test]
async fn album_without_tracks_is_kept_until_filtering() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    let site = FakeSite::new()
        .artist("1", &[("4000010", "Quiet", "Blossom")])
        .album("4000010", &[]);

    let (tables, _) = run_scrape(&config, Arc::new(site.build()), &["1".to_string()])
        .await
        .unwrap();
    assert_eq!(tables.albums.len(), 1);
    assert!(tables.tracks.is_empty());

    // Empty tables keep their header row and read back empty
    let raw_tracks = fs::read_to_string(config.paths.tracks_path()).unwrap();
    assert_eq!(raw_tracks, "album_id,track_id,track_title\n");
    let reloaded = ScrapedTables::load(&config.paths).unwrap();
    assert!(reloaded.tracks.is_empty());
    assert!(reloaded.lyrics.is_empty());
    assert_eq!(reloaded.albums.len(), 1);

    let output = run_clean(&config).unwrap();
    assert_eq!(output.summary.merged_rows, 1);
    assert!(output.rows.is_empty());

    let written = fs::read_to_string(config.paths.final_path()).unwrap();
    assert!(written.starts_with("album_id,album_title,artist_name,release_date,type,"));
    assert_eq!(written.lines().count(), 1);
}

#[test]
fn artist_list_without_ids_is_fatal() {
    let dir = tempfile::tempdir().unwrap();
    let config = test_config(dir.path());
    fs::write(&config.paths.artist_list, "artist_id\n \n").unwrap();

    let err = load_artist_ids(&config).unwrap_err();
    assert!(format!("{err:#}").contains("no artist ids"));
    assert!(csv_store::read_artist_ids(&config.paths.artist_list).is_err());
}
