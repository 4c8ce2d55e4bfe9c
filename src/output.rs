//! Output formatting and persistence for view models.
//!
//! Supports pretty-printing, JSON serialization, and CSV export.

use anyhow::Result;
use serde::Serialize;
use std::fmt::Debug;
use std::path::Path;
use tracing::{debug, info};

use crate::aggregate::MonthlyAggregate;
use csv::WriterBuilder;

/// Logs a value using Rust's debug pretty-print format.
pub fn print_pretty<T: Debug>(value: &T) {
    debug!("{:#?}", value);
}

/// Serializes a view model as pretty-printed JSON.
pub fn to_json<T: Serialize>(value: &T) -> Result<String> {
    Ok(serde_json::to_string_pretty(value)?)
}

/// Writes the monthly table to a CSV file, replacing any existing file.
pub fn write_monthly_csv(path: impl AsRef<Path>, months: &[MonthlyAggregate]) -> Result<()> {
    let path = path.as_ref();
    debug!(path = %path.display(), rows = months.len(), "Writing monthly CSV");

    let mut writer = WriterBuilder::new().has_headers(true).from_path(path)?;
    for month in months {
        writer.serialize(month)?;
    }
    writer.flush()?;

    info!(path = %path.display(), rows = months.len(), "Monthly table exported");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::monthly_totals;
    use crate::aggregate::tests::day;
    use std::env;
    use std::fs;

    fn temp_path(name: &str) -> std::path::PathBuf {
        env::temp_dir().join(name)
    }

    #[test]
    fn test_print_pretty_does_not_panic() {
        print_pretty(&vec![1, 2, 3]);
    }

    #[test]
    fn test_to_json_names_fields() {
        let series = monthly_totals(&[day(2024, 7, 4, 12)], "Subways").unwrap();
        let json = to_json(&series).unwrap();
        assert!(json.contains("\"month_start\": \"2024-07-01\""));
        assert!(json.contains("\"season\": \"Summer\""));
    }

    #[test]
    fn test_write_monthly_csv_header_and_rows() {
        let path = temp_path("ridership_dash_test_monthly.csv");
        let _ = fs::remove_file(&path);

        let series =
            monthly_totals(&[day(2024, 1, 1, 5), day(2024, 2, 1, 6)], "Subways").unwrap();
        write_monthly_csv(&path, &series).unwrap();
        write_monthly_csv(&path, &series).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0], "month_start,total_ridership,season");
        assert_eq!(lines[1], "2024-01-01,5,Winter");

        fs::remove_file(&path).unwrap();
    }
}
