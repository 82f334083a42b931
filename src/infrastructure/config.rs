//! Configuration infrastructure
//!
//! Settings are layered with the `config` crate:
//! 1. compiled defaults (`AppConfig::default()`)
//! 2. an optional TOML/JSON file (`config/default.toml` unless overridden)
//! 3. environment variables prefixed `BUGS_ETL`, nested with `__`
//!    (e.g. `BUGS_ETL_SCRAPER__REQUEST_DELAY_SECS=1.0`)

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::info;

use crate::infrastructure::parsing::ParsingConfig;

pub const ENV_PREFIX: &str = "BUGS_ETL";
pub const DEFAULT_CONFIG_FILE: &str = "config/default";

#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("Failed to load config: {source}")]
    Load {
        #[from]
        source: config::ConfigError,
    },

    #[error("Configuration validation failed: {message}")]
    Validation { message: String },
}

/// Default values
pub mod defaults {
    pub const BASE_URL: &str = "https://music.bugs.co.kr";
    pub const REQUEST_DELAY_SECS: f64 = 0.5;
    pub const REQUEST_TIMEOUT_SECONDS: u64 = 30;
    pub const USER_AGENT: &str = "bugs-catalog-etl/0.2 (research dataset builder)";

    pub const ARTIST_LIST: &str = "data/artists/artist_list.csv";
    pub const OUTPUT_DIR: &str = "data";
    pub const ALBUMS_FILE: &str = "albums.csv";
    pub const TRACKS_FILE: &str = "tracks.csv";
    pub const LYRICS_FILE: &str = "lyrics.csv";
    pub const FINAL_FILE: &str = "kpop_girl_group_data_clean.csv";
    pub const REPORT_FILE: &str = "run_report.json";

    pub const ARTIST_LOG_INTERVAL: usize = 1;
    pub const ALBUM_LOG_INTERVAL: usize = 10;
    pub const TRACK_LOG_INTERVAL: usize = 10;
    pub const LYRICS_LOG_INTERVAL: usize = 20;

    pub const LOG_LEVEL: &str = "info";
    pub const LOG_DIR: &str = "logs";
    pub const LOG_FILE_NAME: &str = "bugs-catalog-etl.log";
}

/// Complete application configuration
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
    pub scraper: ScraperConfig,
    pub paths: PathsConfig,
    pub progress: ProgressConfig,
    pub parsing: ParsingConfig,
    pub cleaning: CleaningConfig,
    pub logging: LoggingConfig,
}

/// HTTP behaviour of the scraper
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScraperConfig {
    pub base_url: String,

    /// Pause after every request, in seconds
    pub request_delay_secs: f64,

    pub timeout_seconds: u64,
    pub user_agent: String,
    pub follow_redirects: bool,
}

impl ScraperConfig {
    pub fn request_delay(&self) -> Duration {
        Duration::try_from_secs_f64(self.request_delay_secs).unwrap_or_default()
    }
}

impl Default for ScraperConfig {
    fn default() -> Self {
        Self {
            base_url: defaults::BASE_URL.to_string(),
            request_delay_secs: defaults::REQUEST_DELAY_SECS,
            timeout_seconds: defaults::REQUEST_TIMEOUT_SECONDS,
            user_agent: defaults::USER_AGENT.to_string(),
            follow_redirects: true,
        }
    }
}

/// Input and output locations
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PathsConfig {
    /// CSV with an `artist_id` column
    pub artist_list: PathBuf,
    pub output_dir: PathBuf,
    pub albums_file: String,
    pub tracks_file: String,
    pub lyrics_file: String,
    pub final_file: String,
    pub report_file: String,
}

impl PathsConfig {
    pub fn albums_path(&self) -> PathBuf {
        self.output_dir.join(&self.albums_file)
    }

    pub fn tracks_path(&self) -> PathBuf {
        self.output_dir.join(&self.tracks_file)
    }

    pub fn lyrics_path(&self) -> PathBuf {
        self.output_dir.join(&self.lyrics_file)
    }

    pub fn final_path(&self) -> PathBuf {
        self.output_dir.join(&self.final_file)
    }

    pub fn report_path(&self) -> PathBuf {
        self.output_dir.join(&self.report_file)
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        Self {
            artist_list: PathBuf::from(defaults::ARTIST_LIST),
            output_dir: PathBuf::from(defaults::OUTPUT_DIR),
            albums_file: defaults::ALBUMS_FILE.to_string(),
            tracks_file: defaults::TRACKS_FILE.to_string(),
            lyrics_file: defaults::LYRICS_FILE.to_string(),
            final_file: defaults::FINAL_FILE.to_string(),
            report_file: defaults::REPORT_FILE.to_string(),
        }
    }
}

/// How often each stage logs progress, in items
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ProgressConfig {
    pub artist_interval: usize,
    pub album_interval: usize,
    pub track_interval: usize,
    pub lyrics_interval: usize,
}

impl Default for ProgressConfig {
    fn default() -> Self {
        Self {
            artist_interval: defaults::ARTIST_LOG_INTERVAL,
            album_interval: defaults::ALBUM_LOG_INTERVAL,
            track_interval: defaults::TRACK_LOG_INTERVAL,
            lyrics_interval: defaults::LYRICS_LOG_INTERVAL,
        }
    }
}

/// Markers used by the scrape-stage pre-filter and the cleaning filters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CleaningConfig {
    /// Track ids containing this are login-wall artifacts
    pub login_wall_sentinel: String,
    pub various_artists: String,
    /// Literal lyrics values meaning "no value" (compared case-insensitively)
    pub null_literals: Vec<String>,
    /// Case-insensitive substrings dropping a row by album title
    pub album_title_markers: Vec<String>,
    /// Case-insensitive substrings dropping a row by track title
    pub track_title_markers: Vec<String>,
    /// Case-sensitive substrings pruning albums before details are fetched
    pub prefetch_album_title_markers: Vec<String>,
}

impl Default for CleaningConfig {
    fn default() -> Self {
        let owned = |items: &[&str]| items.iter().map(|s| (*s).to_string()).collect();
        Self {
            login_wall_sentinel: "howLoginLayer".to_string(),
            various_artists: "Various Artists".to_string(),
            null_literals: owned(&["nan", "none", "null"]),
            album_title_markers: owned(&[
                "remix", "japan", "일본", "inst", "repackage", "chinese", " ver.",
            ]),
            track_title_markers: owned(&["권리없는", "remix", "japan", "chinese", " inst ", " ver."]),
            prefetch_album_title_markers: owned(&["권리없는", " OST", "일본"]),
        }
    }
}

/// Logging configuration settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Log level: "error", "warn", "info", "debug", "trace"
    pub level: String,

    /// Enable JSON formatted logs
    pub json_format: bool,

    /// Enable console output
    pub console_output: bool,

    /// Enable file output
    pub file_output: bool,

    pub log_dir: PathBuf,
    pub file_name: String,

    /// Module-specific log level filters (e.g., "reqwest": "info")
    pub module_filters: std::collections::BTreeMap<String, String>,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        let module_filters = [
            ("reqwest", "info"),
            ("hyper", "warn"),
            ("hyper_util", "warn"),
            ("html5ever", "warn"),
            ("selectors", "warn"),
        ]
        .into_iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();

        Self {
            level: defaults::LOG_LEVEL.to_string(),
            json_format: false,
            console_output: true,
            file_output: false,
            log_dir: PathBuf::from(defaults::LOG_DIR),
            file_name: defaults::LOG_FILE_NAME.to_string(),
            module_filters,
        }
    }
}

impl AppConfig {
    /// Load defaults, then `path` (required) or the default file (optional),
    /// then the environment
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        let defaults = config::Config::try_from(&Self::default())?;
        let file = match path {
            Some(p) => config::File::from(p).required(true),
            None => config::File::with_name(DEFAULT_CONFIG_FILE).required(false),
        };

        let settings = config::Config::builder()
            .add_source(defaults)
            .add_source(file)
            .add_source(
                config::Environment::with_prefix(ENV_PREFIX)
                    .prefix_separator("_")
                    .separator("__"),
            )
            .build()?;

        let config: Self = settings.try_deserialize()?;
        config.validate()?;
        info!("Configuration loaded (base_url={})", config.scraper.base_url);
        Ok(config)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        let delay = self.scraper.request_delay_secs;
        if !delay.is_finite() || delay < 0.0 {
            return Err(ConfigError::Validation {
                message: format!("request_delay_secs must be a non-negative number, got {delay}"),
            });
        }

        if self.scraper.timeout_seconds == 0 {
            return Err(ConfigError::Validation {
                message: "timeout_seconds must be greater than 0".to_string(),
            });
        }

        let p = &self.progress;
        if [p.artist_interval, p.album_interval, p.track_interval, p.lyrics_interval].contains(&0) {
            return Err(ConfigError::Validation {
                message: "progress intervals must be greater than 0".to_string(),
            });
        }

        if self.cleaning.login_wall_sentinel.is_empty() {
            return Err(ConfigError::Validation {
                message: "login_wall_sentinel must not be empty".to_string(),
            });
        }

        Ok(())
    }
}
