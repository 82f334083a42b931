//! Test utilities
//!
//! Canned catalog pages and a zero-delay configuration rooted in a scratch
//! directory, so pipeline tests never touch the network or the real data
//! directory.

use std::path::Path;

use crate::infrastructure::{AppConfig, CatalogUrls, StaticFetcher};

pub const BASE_URL: &str = "https://music.bugs.co.kr";

/// Configuration with no request delay and every path under `dir`
pub fn test_config(dir: &Path) -> AppConfig {
    let mut config = AppConfig::default();
    config.scraper.base_url = BASE_URL.to_string();
    config.scraper.request_delay_secs = 0.0;
    config.paths.output_dir = dir.join("out");
    config.paths.artist_list = dir.join("artists.csv");
    config.logging.console_output = false;
    config
}

/// Builds a [`StaticFetcher`] that serves a small fake catalog
#[derive(Debug)]
pub struct FakeSite {
    urls: CatalogUrls,
    fetcher: StaticFetcher,
}

impl Default for FakeSite {
    fn default() -> Self {
        Self::new()
    }
}

impl FakeSite {
    pub fn new() -> Self {
        Self {
            urls: CatalogUrls::new(BASE_URL).expect("test base url"),
            fetcher: StaticFetcher::new(),
        }
    }

    /// Artist page listing `(album_id, title, artist_name)` entries
    pub fn artist(mut self, artist_id: &str, albums: &[(&str, &str, &str)]) -> Self {
        self.fetcher
            .insert(self.urls.artist_albums(artist_id), fixtures::album_list(albums));
        self
    }

    /// Album page with `(track_id, title)` entries
    pub fn album(mut self, album_id: &str, tracks: &[(&str, &str)]) -> Self {
        self.fetcher
            .insert(self.urls.album(album_id), fixtures::album_page_with(album_id, tracks));
        self
    }

    pub fn album_body(mut self, album_id: &str, body: &str) -> Self {
        self.fetcher.insert(self.urls.album(album_id), body);
        self
    }

    pub fn track(mut self, track_id: &str, duration: &str, lyrics: Option<&str>) -> Self {
        self.fetcher
            .insert(self.urls.track(track_id), fixtures::track_page(duration, lyrics));
        self
    }

    pub fn build(self) -> StaticFetcher {
        self.fetcher
    }
}

/// HTML shaped like the catalog's artist, album and track pages
pub mod fixtures {
    use std::fmt::Write;

    use crate::infrastructure::parsing::config::PLAYER_CALL_PREFIX;

    pub fn album_list(albums: &[(&str, &str, &str)]) -> String {
        let mut items = String::new();
        for (id, title, artist) in albums {
            let _ = write!(
                items,
                r#"
    <li>
      <figure class="albumInfo" albumid="{id}">
        <div class="thumbnail"><a href="/album/{id}"><img src="/{id}.jpg"></a></div>
        <figcaption>
          <div class="albumTitle">{title}</div>
          <p class="artist">{artist}</p>
          <time datetime="2020-01-15">2020.01.15</time>
          <span class="albumType">정규</span>
        </figcaption>
      </figure>
    </li>"#
            );
        }
        format!("<html><body><ul class=\"list albumList\">{items}\n</ul></body></html>")
    }

    pub fn album_list_page() -> String {
        album_list(&[
            ("4000001", "First Bloom", "Blossom"),
            ("4000002", "Second Bloom", "Blossom"),
        ])
    }

    pub fn album_page_with(album_id: &str, tracks: &[(&str, &str)]) -> String {
        let mut rows = String::new();
        for (track_id, title) in tracks {
            let onclick = format!("{PLAYER_CALL_PREFIX}{track_id}',true);");
            rows.push_str(&track_row(&onclick, title));
        }
        format!(
            r#"<html><body>
<div class="basicInfo">
  <ul><li class="big"><a href="/album/{album_id}"><img src="https://image.bugsm.co.kr/album/images/500/{album_id}.jpg"></a></li></ul>
  <table class="info"><tbody>
    <tr><th>아티스트</th><td>Blossom</td></tr>
    <tr><th>앨범 종류</th><td>정규</td></tr>
    <tr><th>장르</th><td>댄스</td></tr>
    <tr><th>스타일</th><td> K-Pop </td></tr>
    <tr><th>발매일</th><td>2020.01.15</td></tr>
    <tr><th>유통사</th><td>Dreamus</td></tr>
    <tr><th>기획사</th><td>Blossom Ent.</td></tr>
    <tr><th>재생 시간</th><td>10:21</td></tr>
  </tbody></table>
</div>
<table class="list trackList"><tbody>{rows}
</tbody></table>
</body></html>"#
        )
    }

    pub fn album_page(album_id: &str) -> String {
        album_page_with(album_id, &[("6000001", "Petal"), ("6000002", "Stem")])
    }

    pub fn track_block_with_onclick(onclick: &str, title: &str) -> String {
        format!("<html><body><table><tbody>{}</tbody></table></body></html>", track_row(onclick, title))
    }

    pub fn track_page(duration: &str, lyrics: Option<&str>) -> String {
        let lyrics_block = lyrics
            .map(|text| format!(r#"<div class="lyricsContainer"><xmp>{text}</xmp></div>"#))
            .unwrap_or_default();
        format!(
            r#"<html><body>
<table class="info"><tbody><tr><th>재생 시간</th><td><time>{duration}</time></td></tr></tbody></table>
{lyrics_block}
</body></html>"#
        )
    }

    fn track_row(onclick: &str, title: &str) -> String {
        format!(
            r#"
  <tr><th scope="row"><p class="title"><a href="javascript:;" onclick="{onclick}">{title}</a></p></th></tr>"#
        )
    }
}
