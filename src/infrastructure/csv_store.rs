//! CSV table storage
//!
//! Every dataset is a header row plus comma-separated UTF-8 records, even
//! when there are no records. Empty fields read back as `None`.

use std::fs;
use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{debug, info};

use crate::domain::TableColumns;

#[derive(Error, Debug)]
pub enum StoreError {
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV error on {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },

    #[error("{path} contains no artist ids")]
    EmptyArtistList { path: PathBuf },
}

impl StoreError {
    fn csv(path: &Path, source: csv::Error) -> Self {
        Self::Csv { path: path.to_path_buf(), source }
    }
}

#[derive(Debug, Deserialize)]
struct ArtistRow {
    artist_id: String,
}

/// Read the ordered artist id list from a CSV with an `artist_id` column.
/// Blank ids are skipped; a list with no ids at all is an error.
pub fn read_artist_ids(path: &Path) -> Result<Vec<String>, StoreError> {
    let rows: Vec<ArtistRow> = read_table(path)?;
    let ids: Vec<String> = rows
        .into_iter()
        .map(|row| row.artist_id.trim().to_string())
        .filter(|id| !id.is_empty())
        .collect();

    if ids.is_empty() {
        return Err(StoreError::EmptyArtistList { path: path.to_path_buf() });
    }
    info!("Loaded {} artist ids from {}", ids.len(), path.display());
    Ok(ids)
}

/// Read every record of a CSV file into `T`
pub fn read_table<T: DeserializeOwned>(path: &Path) -> Result<Vec<T>, StoreError> {
    let mut reader = csv::Reader::from_path(path).map_err(|e| StoreError::csv(path, e))?;
    let rows = reader
        .deserialize()
        .collect::<Result<Vec<T>, _>>()
        .map_err(|e| StoreError::csv(path, e))?;
    debug!("Read {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Write `rows` to `path`, creating parent directories as needed
pub fn write_table<T: Serialize + TableColumns>(path: &Path, rows: &[T]) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| StoreError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }

    let mut writer = csv::Writer::from_path(path).map_err(|e| StoreError::csv(path, e))?;
    if rows.is_empty() {
        writer.write_record(T::COLUMNS).map_err(|e| StoreError::csv(path, e))?;
    }
    for row in rows {
        writer.serialize(row).map_err(|e| StoreError::csv(path, e))?;
    }
    writer.flush().map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    info!("Wrote {} rows to {}", rows.len(), path.display());
    Ok(())
}

/// Write a serializable value as pretty JSON
pub fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<(), StoreError> {
    if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
        fs::create_dir_all(parent).map_err(|source| StoreError::Io {
            path: parent.to_path_buf(),
            source,
        })?;
    }
    let json = serde_json::to_string_pretty(value).map_err(|e| StoreError::Io {
        path: path.to_path_buf(),
        source: e.into(),
    })?;
    fs::write(path, json).map_err(|source| StoreError::Io {
        path: path.to_path_buf(),
        source,
    })
}
