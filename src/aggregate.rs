//! Monthly resampling, season labels and summary statistics over daily rows.

use crate::error::{Error, Result};
use crate::source::DailyRecord;
use chrono::{Datelike, NaiveDate};
use serde::Serialize;
use std::collections::BTreeMap;
use std::fmt;
use std::num::NonZeroUsize;
use std::ops::Deref;
use tracing::debug;

/// Trailing window used for the smoothed daily series.
pub const DEFAULT_ROLLING_WINDOW: NonZeroUsize = NonZeroUsize::new(7).unwrap();

/// Coarse classification of a calendar month.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Season {
    Winter,
    Summer,
    Other,
}

impl Season {
    /// 12, 1, 2 are Winter; 6, 7, 8 are Summer; every other month is Other.
    pub fn from_month(month: u32) -> Self {
        match month {
            12 | 1 | 2 => Season::Winter,
            6..=8 => Season::Summer,
            _ => Season::Other,
        }
    }
}

impl fmt::Display for Season {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Season::Winter => "Winter",
            Season::Summer => "Summer",
            Season::Other => "Other",
        };
        f.write_str(name)
    }
}

/// Total ridership for one calendar month.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct MonthlyAggregate {
    pub month_start: NaiveDate,
    pub total_ridership: i64,
    pub season: Season,
}

impl MonthlyAggregate {
    pub fn year(&self) -> i32 {
        self.month_start.year()
    }
}

/// Monthly aggregates in ascending `month_start` order.
#[derive(Debug, Clone, PartialEq, Default, Serialize)]
#[serde(transparent)]
pub struct MonthlySeries(Vec<MonthlyAggregate>);

impl MonthlySeries {
    pub fn as_slice(&self) -> &[MonthlyAggregate] {
        &self.0
    }
}

impl Deref for MonthlySeries {
    type Target = [MonthlyAggregate];

    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// Busiest day, busiest month and mean daily ridership.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryMetrics {
    pub busiest_day: BusiestDay,
    pub busiest_month: YearMonth,
    pub avg_daily_ridership: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BusiestDay {
    pub date: NaiveDate,
    pub count: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub struct YearMonth {
    pub year: i32,
    pub month: u32,
}

impl fmt::Display for YearMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.month, self.year)
    }
}

/// One entry of a rolling-average series; `value` is `None` until the window
/// is filled.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct RollingPoint {
    pub date: NaiveDate,
    pub value: Option<f64>,
}

/// Sums `mode` ridership per calendar month, ordered by month.
///
/// Every month that appears in `records` gets an entry, even if all of its
/// cells for `mode` were blank.
///
/// # Errors
///
/// Returns [`Error::EmptyDataset`] if `records` is empty or carries no value
/// for `mode`, and [`Error::Overflow`] if a month's total does not fit in an
/// `i64`.
pub fn monthly_totals(records: &[DailyRecord], mode: &str) -> Result<MonthlySeries> {
    if !has_values(records, mode) {
        return Err(Error::empty(mode));
    }

    let mut months: BTreeMap<YearMonth, i128> = BTreeMap::new();
    for r in records {
        *months.entry(year_month(r.date)).or_default() += r.ridership(mode).unwrap_or(0) as i128;
    }

    let mut series = Vec::with_capacity(months.len());
    for (ym, total) in months {
        let total_ridership = i64::try_from(total).map_err(|_| Error::Overflow {
            mode: mode.to_string(),
            month: ym,
        })?;
        if let Some(month_start) = NaiveDate::from_ymd_opt(ym.year, ym.month, 1) {
            series.push(MonthlyAggregate {
                month_start,
                total_ridership,
                season: Season::from_month(ym.month),
            });
        }
    }

    debug!(mode, months = series.len(), "Monthly totals computed");
    Ok(MonthlySeries(series))
}

/// Computes [`SummaryMetrics`] over every record that has a `mode` value.
///
/// Ties on the busiest day or month resolve to the earliest one.
///
/// # Errors
///
/// Returns [`Error::EmptyDataset`] when there is nothing to summarize.
pub fn summary_metrics(records: &[DailyRecord], mode: &str) -> Result<SummaryMetrics> {
    let mut busiest_day: Option<BusiestDay> = None;
    let mut months: BTreeMap<YearMonth, i128> = BTreeMap::new();
    let mut sum: i128 = 0;
    let mut n: i128 = 0;

    let mut sorted: Vec<&DailyRecord> = records.iter().collect();
    sorted.sort_by_key(|r| r.date);

    for r in sorted {
        let Some(count) = r.ridership(mode) else {
            continue;
        };
        sum += count as i128;
        n += 1;
        *months.entry(year_month(r.date)).or_default() += count as i128;

        match busiest_day {
            Some(best) if best.count >= count => {}
            _ => busiest_day = Some(BusiestDay { date: r.date, count }),
        }
    }

    let Some(busiest_day) = busiest_day else {
        return Err(Error::empty(mode));
    };

    // BTreeMap iterates in ascending order, so keeping the first strict maximum
    // picks the earliest month on ties.
    let mut busiest_month = None;
    for (ym, total) in months {
        match busiest_month {
            Some((_, best)) if best >= total => {}
            _ => busiest_month = Some((ym, total)),
        }
    }
    let Some((busiest_month, _)) = busiest_month else {
        return Err(Error::empty(mode));
    };

    Ok(SummaryMetrics {
        busiest_day,
        busiest_month,
        avg_daily_ridership: (sum / n) as i64,
    })
}

/// Trailing simple moving average of `mode` ridership.
///
/// The output has one entry per record. The first `window - 1` entries are
/// `None`, as is any window that contains a blank cell.
pub fn rolling_average(
    records: &[DailyRecord],
    mode: &str,
    window: NonZeroUsize,
) -> Vec<RollingPoint> {
    let window = window.get();
    let values: Vec<Option<i64>> = records.iter().map(|r| r.ridership(mode)).collect();

    records
        .iter()
        .enumerate()
        .map(|(i, r)| {
            let value = if i + 1 < window {
                None
            } else {
                values[i + 1 - window..=i]
                    .iter()
                    .try_fold(0f64, |acc, v| v.map(|v| acc + v as f64))
                    .map(|total| total / window as f64)
            };
            RollingPoint {
                date: r.date,
                value,
            }
        })
        .collect()
}

/// Distinct years present in `series`, ascending.
pub fn available_years(series: &MonthlySeries) -> Vec<i32> {
    let mut years: Vec<i32> = series.iter().map(MonthlyAggregate::year).collect();
    years.dedup();
    years
}

fn has_values(records: &[DailyRecord], mode: &str) -> bool {
    records.iter().any(|r| r.ridership(mode).is_some())
}

fn year_month(date: NaiveDate) -> YearMonth {
    YearMonth {
        year: date.year(),
        month: date.month(),
    }
}
