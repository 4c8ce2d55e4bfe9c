//! Error types for loading and aggregating ridership data.

use crate::aggregate::YearMonth;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for library operations.
pub type Result<T> = std::result::Result<T, Error>;

/// Errors surfaced by the loaders and aggregations.
#[derive(Error, Debug)]
pub enum Error {
    /// An input file could not be turned into typed rows. Fatal at startup.
    #[error("failed to load {}: {source}", path.display())]
    DataLoad {
        path: PathBuf,
        #[source]
        source: DataLoadError,
    },

    /// An aggregation was asked to summarize zero rows.
    #[error("no `{mode}` ridership rows to aggregate")]
    EmptyDataset { mode: String },

    /// A monthly total does not fit in a 64-bit count.
    #[error("`{mode}` ridership for {month} overflows a 64-bit total")]
    Overflow { mode: String, month: YearMonth },

    /// Configuration file could not be read or parsed.
    #[error("invalid config {}: {source}", path.display())]
    Config {
        path: PathBuf,
        #[source]
        source: ConfigError,
    },
}

/// Why a config file was rejected.
#[derive(Error, Debug)]
pub enum ConfigError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Why a file failed to load.
#[derive(Error, Debug)]
pub enum DataLoadError {
    #[error("file not found")]
    Missing,

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("missing required column `{0}`")]
    MissingColumn(String),

    #[error("no `<Mode>: Total Estimated Ridership` columns")]
    NoModeColumns,

    #[error("row {row}: unparseable date `{value}`")]
    BadDate { row: usize, value: String },

    #[error("row {row}: non-numeric value `{value}` in column `{column}`")]
    BadNumber {
        row: usize,
        column: String,
        value: String,
    },

    #[error("row {row}: duplicate date {date}")]
    DuplicateDate { row: usize, date: chrono::NaiveDate },
}

impl Error {
    pub(crate) fn load(path: impl Into<PathBuf>, source: impl Into<DataLoadError>) -> Self {
        Error::DataLoad {
            path: path.into(),
            source: source.into(),
        }
    }

    pub(crate) fn config(path: impl Into<PathBuf>, source: impl Into<ConfigError>) -> Self {
        Error::Config {
            path: path.into(),
            source: source.into(),
        }
    }

    pub(crate) fn empty(mode: &str) -> Self {
        Error::EmptyDataset {
            mode: mode.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_data_load_message_names_path_and_cause() {
        let err = Error::load("rides.csv", DataLoadError::MissingColumn("Date".into()));
        assert_eq!(
            err.to_string(),
            "failed to load rides.csv: missing required column `Date`"
        );
    }

    #[test]
    fn test_config_error_keeps_source_chain() {
        let io = std::io::Error::new(std::io::ErrorKind::NotFound, "gone");
        let err = Error::config("dash.json", io);

        let source = std::error::Error::source(&err).unwrap();
        let inner = std::error::Error::source(source).unwrap();
        assert!(inner.downcast_ref::<std::io::Error>().is_some());
        assert_eq!(err.to_string(), "invalid config dash.json: I/O error: gone");
    }

    #[test]
    fn test_overflow_message_names_month() {
        let err = Error::Overflow {
            mode: "Subways".into(),
            month: YearMonth { year: 2024, month: 1 },
        };
        assert_eq!(
            err.to_string(),
            "`Subways` ridership for 1/2024 overflows a 64-bit total"
        );
    }

    #[test]
    fn test_empty_dataset_message() {
        assert_eq!(
            Error::empty("Subways").to_string(),
            "no `Subways` ridership rows to aggregate"
        );
    }
}
