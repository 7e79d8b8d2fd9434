mod app;
mod color;
mod state;
mod ui;

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use eframe::egui;

use big4_dashboard::data::filter::{filter, FilterSelection};
use big4_dashboard::data::loader::{discover_dataset, load_file};
use big4_dashboard::data::view::{DashboardView, ViewConfig, DEFAULT_FOCUS_YEAR};

use app::DashboardApp;
use state::AppState;

/// Big 4 Financial Risk & Compliance Dashboard
#[derive(Debug, Parser)]
#[command(name = "big4-dashboard", version, about)]
struct Cli {
    /// Dataset file (.csv, .json, .parquet); skips discovery
    #[arg(long, value_name = "FILE")]
    data: Option<PathBuf>,

    /// Directory searched for a CSV dataset when --data is absent
    #[arg(long, value_name = "DIR", default_value = ".")]
    dir: PathBuf,

    /// Year shown in the firm × AI workload breakdown
    #[arg(long, value_name = "YEAR", default_value_t = DEFAULT_FOCUS_YEAR)]
    focus_year: i64,

    /// Print the unfiltered dashboard figures as JSON and exit
    #[arg(long)]
    report: bool,
}

fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    let path = match cli.data {
        Some(path) => path,
        None => discover_dataset(&cli.dir)
            .with_context(|| format!("looking for a dataset in {}", cli.dir.display()))?,
    };
    let dataset = load_file(&path).with_context(|| format!("loading {}", path.display()))?;

    let config = ViewConfig {
        focus_year: cli.focus_year,
        ..ViewConfig::default()
    };

    if cli.report {
        let rows = filter(&dataset.records, &FilterSelection::all(&dataset));
        let view = DashboardView::compute(&rows, &config);
        println!("{}", serde_json::to_string_pretty(&view)?);
        return Ok(());
    }

    let mut state = AppState::new(config);
    state.set_dataset(dataset, path);

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([1400.0, 900.0])
            .with_min_inner_size([800.0, 500.0]),
        ..Default::default()
    };

    eframe::run_native(
        "Big 4 Risk & Compliance Dashboard",
        options,
        Box::new(move |_cc| Ok(Box::new(DashboardApp::new(state)))),
    )
    .map_err(|e| anyhow::anyhow!("dashboard window failed: {e}"))
}
