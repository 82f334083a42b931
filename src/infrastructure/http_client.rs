//! HTTP client for page fetching with a fixed politeness delay
//!
//! The crawler treats the network as a single capability, [`DocumentFetcher`]:
//! give it a URL, get the page body back or a [`FetchError`]. The production
//! implementation wraps `reqwest`; [`StaticFetcher`] serves canned pages.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::{Client, ClientBuilder};
use thiserror::Error;
use tokio::time::sleep;
use tracing::{debug, info, warn};
use url::Url;

use crate::infrastructure::config::ScraperConfig;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum FetchError {
    #[error("HTTP error {status_code}: {url}")]
    Status { status_code: u16, url: String },

    #[error("HTTP request failed for {url}: {message}")]
    Transport { url: String, message: String },

    #[error("Empty response from {url}")]
    EmptyBody { url: String },

    #[error("Invalid URL {url}: {message}")]
    InvalidUrl { url: String, message: String },
}

/// Fetches one page body per call
#[async_trait]
pub trait DocumentFetcher: Send + Sync {
    async fn fetch(&self, url: &str) -> Result<String, FetchError>;
}

/// Catalog page addresses relative to the site root
#[derive(Debug, Clone)]
pub struct CatalogUrls {
    base: Url,
}

impl CatalogUrls {
    pub fn new(base_url: &str) -> Result<Self, FetchError> {
        let base = Url::parse(base_url).map_err(|e| FetchError::InvalidUrl {
            url: base_url.to_string(),
            message: e.to_string(),
        })?;
        Ok(Self { base })
    }

    pub fn artist_albums(&self, artist_id: &str) -> String {
        self.join(&format!("/artist/{artist_id}/albums"))
    }

    pub fn album(&self, album_id: &str) -> String {
        self.join(&format!("/album/{album_id}"))
    }

    pub fn track(&self, track_id: &str) -> String {
        self.join(&format!("/track/{track_id}"))
    }

    fn join(&self, path: &str) -> String {
        // Ids come from scraped markup; fall back to plain concatenation if
        // one of them does not form a valid path.
        self.base.join(path).map_or_else(
            |_| format!("{}{}", self.base.as_str().trim_end_matches('/'), path),
            |u| u.to_string(),
        )
    }
}

/// `reqwest`-backed fetcher that sleeps for the configured delay after every
/// request, successful or not
#[derive(Clone)]
pub struct HttpFetcher {
    client: Client,
    request_delay: Duration,
}

impl HttpFetcher {
    pub fn with_config(config: &ScraperConfig) -> anyhow::Result<Self> {
        let client = ClientBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .user_agent(&config.user_agent)
            .cookie_store(true)
            .gzip(true)
            .redirect(if config.follow_redirects {
                reqwest::redirect::Policy::limited(10)
            } else {
                reqwest::redirect::Policy::none()
            })
            .build()
            .map_err(|e| anyhow::anyhow!("Failed to create HTTP client: {}", e))?;

        info!(
            "HTTP fetcher ready (delay {:.2}s, timeout {}s)",
            config.request_delay_secs, config.timeout_seconds
        );

        Ok(Self {
            client,
            request_delay: config.request_delay(),
        })
    }

    async fn fetch_once(&self, url: &str) -> Result<String, FetchError> {
        debug!("🌐 HTTP GET: {}", url);
        let response = self
            .client
            .get(url)
            .send()
            .await
            .map_err(|e| FetchError::Transport {
                url: url.to_string(),
                message: e.to_string(),
            })?;

        let status = response.status();
        if !status.is_success() {
            warn!("Failed to get {}, status code: {}", url, status.as_u16());
            return Err(FetchError::Status {
                status_code: status.as_u16(),
                url: url.to_string(),
            });
        }

        let body = response.text().await.map_err(|e| FetchError::Transport {
            url: url.to_string(),
            message: format!("Failed to read response body: {e}"),
        })?;

        if body.is_empty() {
            return Err(FetchError::EmptyBody { url: url.to_string() });
        }
        Ok(body)
    }
}

#[async_trait]
impl DocumentFetcher for HttpFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        let result = self.fetch_once(url).await;
        if !self.request_delay.is_zero() {
            sleep(self.request_delay).await;
        }
        result
    }
}

/// Serves pages from memory; unknown URLs answer 404. Records every request.
#[derive(Debug, Default)]
pub struct StaticFetcher {
    pages: HashMap<String, String>,
    requests: Mutex<Vec<String>>,
}

impl StaticFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_page(mut self, url: impl Into<String>, body: impl Into<String>) -> Self {
        self.pages.insert(url.into(), body.into());
        self
    }

    pub fn insert(&mut self, url: impl Into<String>, body: impl Into<String>) {
        self.pages.insert(url.into(), body.into());
    }

    /// URLs requested so far, in order
    pub fn requests(&self) -> Vec<String> {
        self.requests
            .lock()
            .map(|r| r.clone())
            .unwrap_or_default()
    }
}

#[async_trait]
impl DocumentFetcher for StaticFetcher {
    async fn fetch(&self, url: &str) -> Result<String, FetchError> {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push(url.to_string());
        }
        self.pages.get(url).cloned().ok_or_else(|| FetchError::Status {
            status_code: 404,
            url: url.to_string(),
        })
    }
}
