//! Per-field cleanup of merged rows
//!
//! All functions are total: any input, including `None` and malformed
//! markup, produces a value or `None` and never an error.

use chrono::{NaiveDate, NaiveDateTime};
use lazy_static::lazy_static;
use regex::Regex;

use crate::domain::CatalogRow;

lazy_static! {
    static ref TIME_TAG: Regex = Regex::new(r"(?s)<time.*?>(.*?)</time>").expect("static regex");
    static ref SPAN_TAG: Regex = Regex::new(r"(?s)<span.*?>(.*?)</span>").expect("static regex");
    static ref LINE_BREAK: Regex = Regex::new(r"\r\n|[\r\n]").expect("static regex");
    // Artist blocks put the display name first, then a blank line
    static ref ARTIST_SEPARATOR: Regex = Regex::new(r"\r?\n[ \t]*\r?\n").expect("static regex");
}

const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y.%m.%d", "%Y/%m/%d", "%Y%m%d"];

fn non_empty(value: String) -> Option<String> {
    if value.is_empty() { None } else { Some(value) }
}

/// Unwrap a `<time>` element and parse the inner text as a date
pub fn clean_release_date(raw: Option<&str>) -> Option<NaiveDate> {
    let inner = TIME_TAG.replace_all(raw?, "$1");
    let text = inner.trim();

    DATE_FORMATS
        .iter()
        .find_map(|format| NaiveDate::parse_from_str(text, format).ok())
        .or_else(|| {
            NaiveDateTime::parse_from_str(text, "%Y-%m-%d %H:%M:%S")
                .ok()
                .map(|dt| dt.date())
        })
}

/// Unwrap a `<span>` element
pub fn clean_album_type(raw: Option<&str>) -> Option<String> {
    non_empty(SPAN_TAG.replace_all(raw?, "$1").trim().to_string())
}

/// Display name: the text before the first blank line, trimmed
pub fn clean_artist_name(raw: Option<&str>) -> Option<String> {
    let raw = raw?;
    let head = ARTIST_SEPARATOR.split(raw).next().unwrap_or(raw);
    non_empty(head.trim().to_string())
}

/// Line breaks become single spaces, then trim
pub fn clean_free_text(raw: Option<&str>) -> Option<String> {
    Some(LINE_BREAK.replace_all(raw?, " ").trim().to_string())
}

pub fn sanitize_row(row: &mut CatalogRow) {
    row.release_date = clean_release_date(row.release_date_raw.as_deref());
    row.album_type = clean_album_type(row.album_type.as_deref());
    row.artist_name_clean = clean_artist_name(row.artist_name.as_deref());
    row.genre = clean_free_text(row.genre.as_deref());
    row.style = clean_free_text(row.style.as_deref());
    row.track_title = clean_free_text(row.track_title.as_deref());
    row.lyrics = clean_free_text(row.lyrics.as_deref());
}

pub fn sanitize_rows(rows: &mut [CatalogRow]) {
    rows.iter_mut().for_each(sanitize_row);
}
