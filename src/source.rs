//! CSV loaders for the ridership and station files.
//!
//! Paths ending in `.gz` are decompressed on the fly.

use crate::error::{DataLoadError, Error, Result};
use chrono::NaiveDate;
use csv::StringRecord;
use flate2::read::GzDecoder;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;
use tracing::{debug, info};

pub const DATE_COLUMN: &str = "Date";
pub const MODE_SUFFIX: &str = ": Total Estimated Ridership";
pub const STATION_COLUMN: &str = "Station/complex";
pub const GEOREFERENCE_COLUMN: &str = "Georeference";
pub const RIDERSHIP_COLUMN: &str = "Ridership";

const DATE_FORMATS: &[&str] = &["%Y-%m-%d", "%m/%d/%Y"];

/// One day of ridership, keyed by mode name (e.g. `"Subways"`).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DailyRecord {
    pub date: NaiveDate,
    pub ridership_by_mode: BTreeMap<String, i64>,
}

impl DailyRecord {
    /// Ridership for `mode`, or `None` when the source cell was blank.
    pub fn ridership(&self, mode: &str) -> Option<i64> {
        self.ridership_by_mode.get(mode).copied()
    }
}

/// A row of the stations or top-10 CSV, before geography is parsed.
#[derive(Debug, Clone, Deserialize)]
pub struct RawStation {
    #[serde(rename = "Station/complex")]
    pub name: String,
    #[serde(rename = "Georeference", default)]
    pub georeference: String,
    #[serde(rename = "Ridership", default)]
    pub ridership: Option<String>,
}

/// Loads the daily ridership CSV, sorted by date.
///
/// # Errors
///
/// Returns [`Error::DataLoad`] when the file is missing or unreadable, lacks the
/// `Date` column or any `<Mode>: Total Estimated Ridership` column, or holds an
/// unparseable date, a non-numeric count, or a repeated date.
#[tracing::instrument(skip(path), fields(path = %path.as_ref().display()))]
pub fn load(path: impl AsRef<Path>) -> Result<Vec<DailyRecord>> {
    let path = path.as_ref();
    let mut rdr = open_csv(path)?;
    let headers = rdr.headers().map_err(|e| Error::load(path, e))?.clone();

    let date_idx = column_index(&headers, DATE_COLUMN).map_err(|e| Error::load(path, e))?;
    let modes: Vec<(usize, String)> = headers
        .iter()
        .enumerate()
        .filter_map(|(i, h)| h.trim().strip_suffix(MODE_SUFFIX).map(|m| (i, m.to_string())))
        .collect();
    if modes.is_empty() {
        return Err(Error::load(path, DataLoadError::NoModeColumns));
    }
    debug!(modes = ?modes.iter().map(|(_, m)| m).collect::<Vec<_>>(), "Ridership columns found");

    let mut records = Vec::new();
    let mut seen = HashSet::new();
    for (idx, result) in rdr.records().enumerate() {
        let record = result.map_err(|e| Error::load(path, e))?;
        let row = line_of(&record, idx);
        let daily = parse_daily(&record, row, date_idx, &modes).map_err(|e| Error::load(path, e))?;
        if !seen.insert(daily.date) {
            return Err(Error::load(
                path,
                DataLoadError::DuplicateDate {
                    row,
                    date: daily.date,
                },
            ));
        }
        records.push(daily);
    }

    records.sort_by_key(|r| r.date);

    info!(rows = records.len(), "Ridership loaded");
    Ok(records)
}

/// Loads the full station list. Geography is left unparsed.
#[tracing::instrument(skip(path), fields(path = %path.as_ref().display()))]
pub fn load_stations(path: impl AsRef<Path>) -> Result<Vec<RawStation>> {
    load_station_rows(path.as_ref(), &[STATION_COLUMN, GEOREFERENCE_COLUMN])
}

/// Loads the top-10 station list, which also carries a `Ridership` column.
#[tracing::instrument(skip(path), fields(path = %path.as_ref().display()))]
pub fn load_top10(path: impl AsRef<Path>) -> Result<Vec<RawStation>> {
    load_station_rows(
        path.as_ref(),
        &[STATION_COLUMN, GEOREFERENCE_COLUMN, RIDERSHIP_COLUMN],
    )
}

fn load_station_rows(path: &Path, required: &[&str]) -> Result<Vec<RawStation>> {
    let mut rdr = open_csv(path)?;
    let headers = rdr.headers().map_err(|e| Error::load(path, e))?.clone();
    for column in required {
        column_index(&headers, column).map_err(|e| Error::load(path, e))?;
    }

    let mut rows = Vec::new();
    for result in rdr.deserialize() {
        let row: RawStation = result.map_err(|e| Error::load(path, e))?;
        rows.push(row);
    }

    info!(rows = rows.len(), "Station rows loaded");
    Ok(rows)
}

fn open_csv(path: &Path) -> Result<csv::Reader<Box<dyn Read>>> {
    if !path.exists() {
        return Err(Error::load(path, DataLoadError::Missing));
    }
    let file = File::open(path).map_err(|e| Error::load(path, e))?;
    let reader: Box<dyn Read> = if path.extension().and_then(|e| e.to_str()) == Some("gz") {
        debug!("Reading gzip-compressed CSV");
        Box::new(GzDecoder::new(BufReader::new(file)))
    } else {
        Box::new(BufReader::new(file))
    };

    Ok(csv::ReaderBuilder::new()
        .trim(csv::Trim::Headers)
        .from_reader(reader))
}

fn column_index(headers: &StringRecord, name: &str) -> std::result::Result<usize, DataLoadError> {
    headers
        .iter()
        .position(|h| h == name)
        .ok_or_else(|| DataLoadError::MissingColumn(name.to_string()))
}

fn line_of(record: &StringRecord, idx: usize) -> usize {
    record
        .position()
        .map(|p| p.line() as usize)
        .unwrap_or(idx + 2)
}

fn parse_daily(
    record: &StringRecord,
    row: usize,
    date_idx: usize,
    modes: &[(usize, String)],
) -> std::result::Result<DailyRecord, DataLoadError> {
    let raw_date = record.get(date_idx).unwrap_or("");
    let date = parse_date(raw_date).ok_or_else(|| DataLoadError::BadDate {
        row,
        value: raw_date.to_string(),
    })?;

    let mut ridership_by_mode = BTreeMap::new();
    for (idx, mode) in modes {
        let raw = record.get(*idx).unwrap_or("");
        let count = parse_count(raw).map_err(|_| DataLoadError::BadNumber {
            row,
            column: format!("{mode}{MODE_SUFFIX}"),
            value: raw.to_string(),
        })?;
        if let Some(count) = count {
            ridership_by_mode.insert(mode.clone(), count);
        }
    }

    Ok(DailyRecord {
        date,
        ridership_by_mode,
    })
}

/// Parses `YYYY-MM-DD` or `MM/DD/YYYY`, ignoring any trailing time component.
pub fn parse_date(value: &str) -> Option<NaiveDate> {
    let day = value.split_whitespace().next()?;
    let day = day.split('T').next()?;
    DATE_FORMATS
        .iter()
        .find_map(|fmt| NaiveDate::parse_from_str(day, fmt).ok())
}

/// Parses a count cell. Blank cells are `Ok(None)`; thousands separators are
/// allowed and fractional values are truncated. Values outside the `i64` range
/// are rejected.
pub(crate) fn parse_count(value: &str) -> std::result::Result<Option<i64>, ()> {
    let cleaned: String = value.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return Ok(None);
    }
    if let Ok(n) = cleaned.parse::<i64>() {
        return Ok(Some(n));
    }
    // i64::MAX is not representable as f64; 2^63 is the first value past it.
    const I64_RANGE: std::ops::Range<f64> =
        -9_223_372_036_854_775_808.0..9_223_372_036_854_775_808.0;
    match cleaned.parse::<f64>() {
        Ok(f) if I64_RANGE.contains(&f.trunc()) => Ok(Some(f.trunc() as i64)),
        _ => Err(()),
    }
}
