//! Input locations and tuning for the dashboards.
//!
//! Layered lowest precedence first: built-in defaults, an optional JSON file,
//! environment variables, then explicit overrides from the command line.
//!
//! ```json
//! {
//!   "ridership_csv": "data/MTA_Daily_Ridership.csv",
//!   "stations_csv": "data/MTA_Subway_Stations.csv",
//!   "top10_csv": "data/top10.csv",
//!   "mode": "Subways",
//!   "rolling_window": 7
//! }
//! ```

use crate::aggregate::DEFAULT_ROLLING_WINDOW;
use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};

pub const ENV_RIDERSHIP_CSV: &str = "RIDERSHIP_CSV";
pub const ENV_STATIONS_CSV: &str = "STATIONS_CSV";
pub const ENV_TOP10_CSV: &str = "TOP10_CSV";
pub const ENV_MODE: &str = "RIDERSHIP_MODE";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DashboardConfig {
    pub ridership_csv: PathBuf,
    pub stations_csv: Option<PathBuf>,
    pub top10_csv: Option<PathBuf>,
    pub mode: String,
    pub rolling_window: NonZeroUsize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            ridership_csv: PathBuf::from("MTA_Daily_Ridership_Data__2020_-_2025_20250304.csv"),
            stations_csv: None,
            top10_csv: None,
            mode: "Subways".to_string(),
            rolling_window: DEFAULT_ROLLING_WINDOW,
        }
    }
}

/// Values given explicitly on the command line.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    pub ridership_csv: Option<PathBuf>,
    pub stations_csv: Option<PathBuf>,
    pub top10_csv: Option<PathBuf>,
    pub mode: Option<String>,
    pub rolling_window: Option<NonZeroUsize>,
}

impl DashboardConfig {
    /// Loads the config from a JSON file at `path`. Missing keys keep their
    /// defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| Error::config(path, e))?;
        serde_json::from_str(&content).map_err(|e| Error::config(path, e))
    }

    /// Full resolution: defaults, then `file`, then the process environment,
    /// then `overrides`.
    pub fn resolve(file: Option<&Path>, overrides: Overrides) -> Result<Self> {
        let base = match file {
            Some(path) => Self::load(path)?,
            None => Self::default(),
        };
        Ok(base
            .with_env(|key| std::env::var(key).ok())
            .with_overrides(overrides))
    }

    /// Applies variables looked up through `lookup`; empty values are ignored.
    pub fn with_env(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        if let Some(v) = get(ENV_RIDERSHIP_CSV) {
            self.ridership_csv = v.into();
        }
        if let Some(v) = get(ENV_STATIONS_CSV) {
            self.stations_csv = Some(v.into());
        }
        if let Some(v) = get(ENV_TOP10_CSV) {
            self.top10_csv = Some(v.into());
        }
        if let Some(v) = get(ENV_MODE) {
            self.mode = v;
        }
        self
    }

    pub fn with_overrides(mut self, o: Overrides) -> Self {
        if let Some(v) = o.ridership_csv {
            self.ridership_csv = v;
        }
        if o.stations_csv.is_some() {
            self.stations_csv = o.stations_csv;
        }
        if o.top10_csv.is_some() {
            self.top10_csv = o.top10_csv;
        }
        if let Some(v) = o.mode {
            self.mode = v;
        }
        if let Some(v) = o.rolling_window {
            self.rolling_window = v;
        }
        self
    }
}
