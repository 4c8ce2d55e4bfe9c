//! CLI entry point for the ridership dashboards.
//!
//! Loads the ridership and station CSVs once, then prints the renderable data
//! for either dashboard or exports the monthly table.

use anyhow::Result;
use clap::{Parser, Subcommand};
use ridership_dash::{
    config::{DashboardConfig, Overrides},
    dataset::Dataset,
    output::{print_pretty, to_json, write_monthly_csv},
    source,
    view::{StationInputs, overview_view, trend_view},
};
use std::ffi::OsStr;
use std::num::NonZeroUsize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};
use tracing_subscriber::{
    EnvFilter, Layer,
    fmt::{self, format::FmtSpan},
    layer::SubscriberExt,
    util::SubscriberInitExt,
};

#[derive(Parser)]
#[command(name = "ridership_dash")]
#[command(about = "Aggregate daily transit ridership into dashboard data", long_about = None)]
struct Cli {
    /// JSON config file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Daily ridership CSV (plain or .gz)
    #[arg(long, global = true)]
    ridership: Option<PathBuf>,

    /// Station list CSV with `Station/complex` and `Georeference`
    #[arg(long, global = true)]
    stations: Option<PathBuf>,

    /// Top-10 station CSV with `Ridership`, `Station/complex`, `Georeference`
    #[arg(long, global = true)]
    top10: Option<PathBuf>,

    /// Ridership mode to aggregate, e.g. "Subways" or "Buses"
    #[arg(short, long, global = true)]
    mode: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Monthly trend and season averages for one year
    Trend {
        /// Year to show (defaults to the earliest year in the data)
        #[arg(short, long)]
        year: Option<i32>,
    },
    /// Summary cards, rolling average and station map
    Overview {
        /// Rolling average window in days
        #[arg(short, long)]
        window: Option<NonZeroUsize>,
    },
    /// List the selectable years
    Years,
    /// Write the monthly totals to a CSV file
    Export {
        /// CSV file to write
        #[arg(short, long, default_value = "monthly.csv")]
        output: PathBuf,
    },
}

fn main() -> Result<()> {
    dotenvy::dotenv().ok(); // Load .env file

    // Logging setup: colored stderr + JSON rolling log file
    let log_file_path =
        std::env::var("LOG_FILE_PATH").unwrap_or_else(|_| "logs/ridership_dash.log".to_string());
    let log_dir = Path::new(&log_file_path)
        .parent()
        .unwrap_or(Path::new("logs"));
    let log_file_name = Path::new(&log_file_path)
        .file_name()
        .unwrap_or(OsStr::new("ridership_dash.log"));

    let file_appender = tracing_appender::rolling::daily(log_dir, log_file_name);
    let (non_blocking_file, _file_guard) = tracing_appender::non_blocking(file_appender);

    let stderr_layer = fmt::layer()
        .with_target(true)
        .with_span_events(FmtSpan::CLOSE)
        .with_ansi(true)
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_env("RUST_LOG").add_directive("info".parse()?));

    let json_layer = fmt::layer()
        .json()
        .with_current_span(true)
        .with_span_list(true)
        .with_writer(non_blocking_file)
        .with_filter(EnvFilter::from_env("RUST_LOG_JSON").add_directive("debug".parse()?));

    tracing_subscriber::registry()
        .with(stderr_layer)
        .with(json_layer)
        .init();

    let cli = Cli::parse();

    let window = match &cli.command {
        Commands::Overview { window } => *window,
        _ => None,
    };
    let config = DashboardConfig::resolve(
        cli.config.as_deref(),
        Overrides {
            ridership_csv: cli.ridership,
            stations_csv: cli.stations,
            top10_csv: cli.top10,
            mode: cli.mode,
            rolling_window: window,
        },
    )?;
    print_pretty(&config);

    let dataset = Dataset::load(&config.ridership_csv, &config.mode)?;

    match cli.command {
        Commands::Trend { year } => {
            let view = trend_view(&dataset, year)?;
            if view.months.is_empty() {
                warn!(year = ?view.selected_year, "No ridership for the selected year");
            }
            println!("{}", to_json(&view)?);
        }
        Commands::Overview { .. } => {
            let stations = load_station_inputs(&config)?;
            let view = overview_view(&dataset, &stations, config.rolling_window)?;
            info!(
                markers = view.map.markers.len(),
                skipped = view.map.skipped_count(),
                "Station map built"
            );
            println!("{}", to_json(&view)?);
        }
        Commands::Years => {
            for year in dataset.years() {
                println!("{year}");
            }
        }
        Commands::Export { output } => {
            write_monthly_csv(&output, dataset.monthly())?;
        }
    }

    Ok(())
}

/// Loads whichever station files are configured; missing ones yield an empty
/// map layer.
#[tracing::instrument(skip_all)]
fn load_station_inputs(config: &DashboardConfig) -> Result<StationInputs> {
    let all = match &config.stations_csv {
        Some(path) => source::load_stations(path)?,
        None => {
            info!("No stations CSV configured, map will have no regular markers");
            Vec::new()
        }
    };
    let top10 = match &config.top10_csv {
        Some(path) => source::load_top10(path)?,
        None => {
            info!("No top-10 CSV configured");
            Vec::new()
        }
    };
    Ok(StationInputs { all, top10 })
}
