//! Scraping use case
//!
//! Walks the catalog in four dependent stages: artist album lists, album
//! details, album track lists, then per-track lyrics. Requests are issued one
//! at a time; every identifier's result is recorded in the run report and a
//! failure never stops the stage.

use std::collections::HashSet;
use std::sync::Arc;

use anyhow::{anyhow, Result};
use tracing::info;

use super::cleaning::{join_album_details, prefilter_album_summaries};
use super::collector::TableCollector;
use super::run_report::{RunReport, ScrapeError, Stage, StageReport};
use crate::domain::{AlbumDetail, AlbumRecord, AlbumSummary, EntityTable, Lyrics, Track};
use crate::infrastructure::{
    AppConfig, CatalogParsers, CatalogUrls, CleaningConfig, ContextualParser, DocumentFetcher,
    ParseContext, ProgressConfig,
};

/// Tables produced by one scrape, plus the per-item report
#[derive(Debug, Clone)]
pub struct ScrapeOutput {
    pub albums: EntityTable<AlbumRecord>,
    pub tracks: EntityTable<Track>,
    pub lyrics: EntityTable<Lyrics>,
    pub report: RunReport,
}

pub struct CatalogScraper<F: DocumentFetcher> {
    fetcher: Arc<F>,
    urls: CatalogUrls,
    parsers: CatalogParsers,
    progress: ProgressConfig,
    cleaning: CleaningConfig,
}

/// Keep the first occurrence of each id
fn unique_ids<'a>(ids: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    let mut seen = HashSet::new();
    ids.into_iter()
        .filter(|id| seen.insert(*id))
        .map(str::to_string)
        .collect()
}

impl<F: DocumentFetcher> CatalogScraper<F> {
    pub fn new(fetcher: Arc<F>, config: &AppConfig) -> Result<Self> {
        let urls = CatalogUrls::new(&config.scraper.base_url)?;
        let parsers = CatalogParsers::from_config(&config.parsing)
            .map_err(|e| anyhow!("Invalid extraction schema: {}", e))?;
        Ok(Self {
            fetcher,
            urls,
            parsers,
            progress: config.progress.clone(),
            cleaning: config.cleaning.clone(),
        })
    }

    async fn fetch_and_parse<P: ContextualParser>(
        &self,
        parser: &P,
        url: String,
        identifier: &str,
    ) -> Result<P::Output, ScrapeError> {
        let body = self.fetcher.fetch(&url).await?;
        let context = ParseContext::new(identifier).with_url(url);
        Ok(parser.parse_str(&body, &context)?)
    }

    /// Fetch and parse one page per identifier, collecting rows and outcomes
    #[allow(clippy::too_many_arguments)]
    async fn collect_stage<P, T>(
        &self,
        stage: Stage,
        ids: &[String],
        log_interval: usize,
        parser: &P,
        url_for: impl Fn(&CatalogUrls, &str) -> String,
        into_rows: impl Fn(P::Output) -> Vec<T>,
        skip_reason: impl Fn(&str) -> Option<&'static str>,
    ) -> (EntityTable<T>, StageReport)
    where
        P: ContextualParser,
    {
        info!("Starting {} stage for {} ids", stage.label(), ids.len());
        let mut collector = TableCollector::new(stage, ids.len(), log_interval);

        for id in ids.iter().map(String::as_str) {
            if let Some(reason) = skip_reason(id) {
                collector.skip(id, reason);
                continue;
            }
            let url = url_for(&self.urls, id);
            let result = self.fetch_and_parse(parser, url, id).await.map(&into_rows);
            collector.append(id, result);
        }

        collector.finalize()
    }

    pub async fn collect_albums(&self, artist_ids: &[String]) -> (EntityTable<AlbumSummary>, StageReport) {
        self.collect_stage(
            Stage::Albums,
            artist_ids,
            self.progress.artist_interval,
            &self.parsers.album_list,
            CatalogUrls::artist_albums,
            |albums| albums,
            |_| None,
        )
        .await
    }

    pub async fn collect_album_details(&self, album_ids: &[String]) -> (EntityTable<AlbumDetail>, StageReport) {
        self.collect_stage(
            Stage::AlbumDetails,
            album_ids,
            self.progress.album_interval,
            &self.parsers.album_detail,
            CatalogUrls::album,
            |detail| vec![detail],
            |_| None,
        )
        .await
    }

    pub async fn collect_tracks(&self, album_ids: &[String]) -> (EntityTable<Track>, StageReport) {
        self.collect_stage(
            Stage::Tracks,
            album_ids,
            self.progress.track_interval,
            &self.parsers.track_list,
            CatalogUrls::album,
            |tracks| tracks,
            |_| None,
        )
        .await
    }

    /// Login-wall placeholder ids are recorded as skipped, not fetched
    pub async fn collect_lyrics(&self, track_ids: &[String]) -> (EntityTable<Lyrics>, StageReport) {
        let sentinel = self.cleaning.login_wall_sentinel.as_str();
        self.collect_stage(
            Stage::Lyrics,
            track_ids,
            self.progress.lyrics_interval,
            &self.parsers.lyrics,
            CatalogUrls::track,
            |lyrics| vec![lyrics],
            |id| id.contains(sentinel).then_some("login-wall placeholder id"),
        )
        .await
    }

    /// Run all four stages for `artist_ids`
    pub async fn run(&self, artist_ids: &[String]) -> ScrapeOutput {
        let mut report = RunReport::default();

        let (mut summaries, stage) = self.collect_albums(artist_ids).await;
        report.stages.push(stage);
        report.prefiltered_albums = prefilter_album_summaries(&mut summaries, &self.cleaning);

        let album_ids = unique_ids(summaries.iter().map(|a| a.album_id.as_str()));
        let (details, stage) = self.collect_album_details(&album_ids).await;
        report.stages.push(stage);

        let albums = join_album_details(summaries, &details);
        info!("Album table: {} rows", albums.len());

        let album_ids = unique_ids(albums.iter().map(|a| a.album_id.as_str()));
        let (tracks, stage) = self.collect_tracks(&album_ids).await;
        report.stages.push(stage);

        let track_ids = unique_ids(tracks.iter().map(|t| t.track_id.as_str()));
        let (lyrics, stage) = self.collect_lyrics(&track_ids).await;
        report.stages.push(stage);

        info!(
            "Scrape finished: {} albums, {} tracks, {} lyrics, {} failed items",
            albums.len(),
            tracks.len(),
            lyrics.len(),
            report.total_failures()
        );

        ScrapeOutput { albums, tracks, lyrics, report }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::run_report::{FailureKind, ItemOutcome};
    use crate::infrastructure::StaticFetcher;
    use crate::test_utils::{test_config, FakeSite};

    fn scraper(site: FakeSite) -> (Arc<StaticFetcher>, CatalogScraper<StaticFetcher>) {
        let dir = std::env::temp_dir();
        let fetcher = Arc::new(site.build());
        let scraper = CatalogScraper::new(Arc::clone(&fetcher), &test_config(&dir)).unwrap();
        (fetcher, scraper)
    }

    #[tokio::test]
    async fn test_failed_artist_does_not_stop_stage() {
        let site = FakeSite::new().artist("1", &[("100", "Bloom", "Blossom")]);
        let (_, scraper) = scraper(site);

        let ids = vec!["404".to_string(), "1".to_string()];
        let (albums, report) = scraper.collect_albums(&ids).await;

        assert_eq!(albums.len(), 1);
        assert_eq!(albums.rows()[0].artist_id, "1");
        assert!(matches!(
            report.outcome_of("404"),
            Some(ItemOutcome::Failed { kind: FailureKind::Fetch, .. })
        ));
        assert_eq!(report.succeeded(), 1);
    }

    #[tokio::test]
    async fn test_prefiltered_albums_are_never_fetched() {
        let site = FakeSite::new()
            .artist("1", &[("100", "Bloom", "Blossom"), ("101", "Drama OST", "Blossom")])
            .album("100", &[("1000", "Petal")])
            .track("1000", "3:21", Some("la"));
        let (fetcher, scraper) = scraper(site);

        let output = scraper.run(&["1".to_string()]).await;

        assert_eq!(output.report.prefiltered_albums, 1);
        assert_eq!(output.albums.len(), 1);
        assert!(fetcher.requests().iter().all(|url| !url.ends_with("/album/101")));
        assert_eq!(output.tracks.len(), 1);
        assert_eq!(output.lyrics.len(), 1);
        assert_eq!(output.report.total_failures(), 0);
    }

    #[tokio::test]
    async fn test_login_wall_tracks_skip_lyrics_fetch() {
        let locked = format!(
            "<html><body><table><tbody><tr><th><p class=\"title\"><a onclick=\"{}\">Locked</a></p></th></tr></tbody></table></body></html>",
            "bugs.wiselog.area('list_tr_09_ab');bugs.music.showLoginLayer();"
        );
        let site = FakeSite::new().album_body("100", &locked);
        let (fetcher, scraper) = scraper(site);

        let (tracks, _) = scraper.collect_tracks(&["100".to_string()]).await;
        assert_eq!(tracks.len(), 1);

        let ids: Vec<String> = tracks.iter().map(|t| t.track_id.clone()).collect();
        let (lyrics, report) = scraper.collect_lyrics(&ids).await;
        assert!(lyrics.is_empty());
        assert_eq!(report.skipped(), 1);
        assert!(fetcher.requests().iter().all(|url| !url.contains("/track/")));
    }
}
