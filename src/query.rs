//! Per-year views over the monthly series and daily rows.

use crate::aggregate::{MonthlyAggregate, MonthlySeries, Season};
use crate::source::DailyRecord;
use chrono::Datelike;
use std::collections::BTreeMap;

/// Months of `year`, borrowed from `series`. Empty when the year has no data.
pub fn for_year(series: &MonthlySeries, year: i32) -> &[MonthlyAggregate] {
    let months = series.as_slice();
    let start = months.partition_point(|m| m.year() < year);
    let end = months.partition_point(|m| m.year() <= year);
    &months[start..end]
}

/// Daily rows of `year`. `records` must be sorted by date.
pub fn daily_for_year(records: &[DailyRecord], year: i32) -> &[DailyRecord] {
    let start = records.partition_point(|r| r.date.year() < year);
    let end = records.partition_point(|r| r.date.year() <= year);
    &records[start..end]
}

/// Mean monthly ridership per season. Seasons with no months are absent.
pub fn season_averages(months: &[MonthlyAggregate]) -> BTreeMap<Season, f64> {
    let mut sums: BTreeMap<Season, (i128, usize)> = BTreeMap::new();
    for m in months {
        let entry = sums.entry(m.season).or_default();
        entry.0 += m.total_ridership as i128;
        entry.1 += 1;
    }

    sums.into_iter()
        .map(|(season, (total, n))| (season, total as f64 / n as f64))
        .collect()
}
