//! The immutable, loaded ridership dataset shared by every view.

use crate::aggregate::{self, MonthlySeries, SummaryMetrics};
use crate::error::Result;
use crate::query;
use crate::source::{self, DailyRecord};
use std::path::Path;
use tracing::info;

/// Daily rows for one mode plus their monthly series. Built once, read many
/// times; nothing mutates it after construction.
#[derive(Debug, Clone)]
pub struct Dataset {
    mode: String,
    daily: Vec<DailyRecord>,
    monthly: MonthlySeries,
}

/// Which rows a summary is computed over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SummaryScope {
    All,
    Year(i32),
}

impl Dataset {
    /// Loads the ridership CSV at `path` and aggregates `mode`.
    pub fn load(path: impl AsRef<Path>, mode: &str) -> Result<Self> {
        let records = source::load(path)?;
        Self::from_records(records, mode)
    }

    /// Builds a dataset from already-parsed rows.
    ///
    /// # Errors
    ///
    /// Returns [`crate::Error::EmptyDataset`] when no row carries `mode`.
    pub fn from_records(mut daily: Vec<DailyRecord>, mode: &str) -> Result<Self> {
        daily.sort_by_key(|r| r.date);
        let monthly = aggregate::monthly_totals(&daily, mode)?;
        info!(
            mode,
            days = daily.len(),
            months = monthly.len(),
            "Dataset ready"
        );
        Ok(Self {
            mode: mode.to_string(),
            daily,
            monthly,
        })
    }

    pub fn mode(&self) -> &str {
        &self.mode
    }

    pub fn daily(&self) -> &[DailyRecord] {
        &self.daily
    }

    pub fn monthly(&self) -> &MonthlySeries {
        &self.monthly
    }

    pub fn years(&self) -> Vec<i32> {
        aggregate::available_years(&self.monthly)
    }

    /// Summary over the whole dataset or a single year. A year with no rows
    /// yields `Ok(None)`.
    pub fn summary(&self, scope: SummaryScope) -> Result<Option<SummaryMetrics>> {
        let rows = match scope {
            SummaryScope::All => self.daily(),
            SummaryScope::Year(year) => query::daily_for_year(&self.daily, year),
        };
        if rows.iter().all(|r| r.ridership(&self.mode).is_none()) {
            return match scope {
                SummaryScope::All => Err(crate::Error::empty(&self.mode)),
                SummaryScope::Year(_) => Ok(None),
            };
        }
        aggregate::summary_metrics(rows, &self.mode).map(Some)
    }
}
