//! Renderable data for the two dashboards.
//!
//! Each view is a pure function of the loaded state and the current
//! selection. The presentation layer calls it on every interaction and draws
//! whatever comes back; nothing here knows about charts or widgets.

use crate::aggregate::{self, MonthlyAggregate, RollingPoint, Season, SummaryMetrics};
use crate::dataset::{Dataset, SummaryScope};
use crate::error::{Error, Result};
use crate::query;
use crate::source::RawStation;
use crate::stations::{self, StationLayer};
use serde::Serialize;
use std::num::NonZeroUsize;

/// Year-selector dashboard: monthly trend line, season bars and the summary
/// for the selected year.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TrendView {
    pub years: Vec<i32>,
    pub selected_year: Option<i32>,
    pub trend_title: String,
    pub months: Vec<MonthlyAggregate>,
    pub season_title: String,
    pub season_bars: Vec<SeasonBar>,
    pub summary: Option<SummaryMetrics>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SeasonBar {
    pub season: Season,
    pub avg_monthly_ridership: f64,
}

/// Overview dashboard: summary cards, smoothed daily series and station map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewView {
    pub cards: Vec<SummaryCard>,
    pub summary: SummaryMetrics,
    pub rolling_title: String,
    pub rolling: Vec<RollingPoint>,
    pub top10_options: Vec<String>,
    pub map: StationLayer,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryCard {
    pub title: String,
    pub lines: Vec<String>,
}

/// Station inputs for the overview dashboard.
#[derive(Debug, Clone, Default)]
pub struct StationInputs {
    pub all: Vec<RawStation>,
    pub top10: Vec<RawStation>,
}

/// Builds the year-selector view. With no selection the earliest year is
/// shown. A year without data produces empty series rather than an error.
pub fn trend_view(dataset: &Dataset, selection: Option<i32>) -> Result<TrendView> {
    let years = dataset.years();
    let selected_year = selection.or_else(|| years.first().copied());
    let label = selected_year.map_or_else(|| "no data".to_string(), |y| y.to_string());

    let months = selected_year
        .map(|y| query::for_year(dataset.monthly(), y))
        .unwrap_or_default();
    let season_bars = query::season_averages(months)
        .into_iter()
        .map(|(season, avg)| SeasonBar {
            season,
            avg_monthly_ridership: avg,
        })
        .collect();
    let summary = match selected_year {
        Some(y) => dataset.summary(SummaryScope::Year(y))?,
        None => None,
    };

    Ok(TrendView {
        years,
        selected_year,
        trend_title: format!("{} Ridership Trend ({label})", dataset.mode()),
        months: months.to_vec(),
        season_title: format!("Average Ridership by Season ({label})"),
        season_bars,
        summary,
    })
}

/// Builds the overview view. Summary figures cover the whole dataset,
/// independent of any selection.
pub fn overview_view(
    dataset: &Dataset,
    stations: &StationInputs,
    window: NonZeroUsize,
) -> Result<OverviewView> {
    let summary = dataset
        .summary(SummaryScope::All)?
        .ok_or_else(|| Error::empty(dataset.mode()))?;
    let rolling = aggregate::rolling_average(dataset.daily(), dataset.mode(), window);
    let map = StationLayer::build(&stations.all, &stations.top10);

    Ok(OverviewView {
        cards: summary_cards(&summary),
        summary,
        rolling_title: format!("{window}-Day Average {} Ridership", dataset.mode()),
        rolling,
        top10_options: stations::top10_ranking(&map.stations),
        map,
    })
}

fn summary_cards(summary: &SummaryMetrics) -> Vec<SummaryCard> {
    vec![
        SummaryCard {
            title: "Busiest Month".to_string(),
            lines: vec![summary.busiest_month.to_string()],
        },
        SummaryCard {
            title: "Busiest Day".to_string(),
            lines: vec![
                summary.busiest_day.date.to_string(),
                format!("{} riders", format_count(summary.busiest_day.count)),
            ],
        },
        SummaryCard {
            title: "Avg Daily Ridership".to_string(),
            lines: vec![format_count(summary.avg_daily_ridership)],
        },
    ]
}

/// Formats an integer with `,` thousands separators.
pub fn format_count(n: i64) -> String {
    let digits = n.unsigned_abs().to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3 + 1);
    if n < 0 {
        out.push('-');
    }
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::aggregate::DEFAULT_ROLLING_WINDOW;
    use crate::aggregate::tests::day;

    fn dataset() -> Dataset {
        Dataset::from_records(
            vec![
                day(2023, 1, 1, 1_000),
                day(2023, 7, 1, 3_000),
                day(2024, 1, 1, 2_500_000),
                day(2024, 1, 2, 500),
            ],
            "Subways",
        )
        .unwrap()
    }

    #[test]
    fn test_format_count() {
        assert_eq!(format_count(0), "0");
        assert_eq!(format_count(999), "999");
        assert_eq!(format_count(1_000), "1,000");
        assert_eq!(format_count(2_500_000), "2,500,000");
        assert_eq!(format_count(-12_345), "-12,345");
    }

    #[test]
    fn test_trend_view_defaults_to_first_year() {
        let view = trend_view(&dataset(), None).unwrap();
        assert_eq!(view.years, vec![2023, 2024]);
        assert_eq!(view.selected_year, Some(2023));
        assert_eq!(view.months.len(), 2);
        assert_eq!(view.season_bars.len(), 2);
        assert_eq!(view.trend_title, "Subways Ridership Trend (2023)");
        assert_eq!(view.summary.unwrap().busiest_day.count, 3_000);
    }

    #[test]
    fn test_trend_view_year_without_data() {
        let view = trend_view(&dataset(), Some(2025)).unwrap();
        assert!(view.months.is_empty());
        assert!(view.season_bars.is_empty());
        assert!(view.summary.is_none());
    }

    #[test]
    fn test_overview_view_uses_full_dataset() {
        let stations = StationInputs {
            all: vec![],
            top10: vec![RawStation {
                name: "Times Sq".to_string(),
                georeference: "POINT (-73.98 40.75)".to_string(),
                ridership: Some("100".to_string()),
            }],
        };
        let ds = dataset();
        let view = overview_view(&ds, &stations, DEFAULT_ROLLING_WINDOW).unwrap();

        assert_eq!(
            Some(view.summary.clone()),
            ds.summary(SummaryScope::All).unwrap()
        );
        assert_eq!(view.summary.busiest_day.count, 2_500_000);
        assert_eq!(view.cards[1].lines[1], "2,500,000 riders");
        assert_eq!(view.cards[0].lines[0], "1/2024");
        assert_eq!(view.rolling.len(), 4);
        assert!(view.rolling.iter().all(|p| p.value.is_none()));
        assert_eq!(view.top10_options, vec!["1. Times Sq"]);
        assert_eq!(view.map.markers.len(), 1);
        assert_eq!(view.rolling_title, "7-Day Average Subways Ridership");
    }
}
