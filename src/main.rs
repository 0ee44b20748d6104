//! Sales Dashboard - Retail Sales CSV Cleaning, KPIs & Interactive Charts
//!
//! Loads one sales CSV, cleans it once at start-up and shows the selected view
//! in an egui window, or prints it as text with `--print`.

mod charts;
mod config;
mod data;
mod gui;
mod stats;

use anyhow::{anyhow, Context};
use charts::TextRenderer;
use clap::Parser;
use config::DashboardSettings;
use eframe::egui;
use gui::SalesDashboardApp;
use stats::{SalesReport, View};
use std::path::PathBuf;
use tracing::{error, info};

#[derive(Parser, Debug)]
#[command(name = "sales-dashboard", version, about)]
struct Cli {
    /// Sales CSV to load; falls back to the settings file, then a file dialog
    data: Option<PathBuf>,

    /// JSON settings file
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// View to show first
    #[arg(short, long, value_enum)]
    view: Option<View>,

    /// Print the selected view to stdout instead of opening a window
    #[arg(short, long)]
    print: bool,
}

fn pick_csv() -> Option<PathBuf> {
    rfd::FileDialog::new()
        .add_filter("CSV Files", &["csv"])
        .pick_file()
}

fn main() -> anyhow::Result<()> {
    // Logs go to stderr so `--print` output stays clean
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("sales_dashboard=info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let settings = match &cli.config {
        Some(path) => DashboardSettings::load(path)
            .with_context(|| format!("loading settings from {}", path.display()))?,
        None => DashboardSettings::default(),
    };
    let view = cli.view.unwrap_or(settings.default_view);
    let data_path = cli.data.clone().or_else(|| settings.data_path.clone());

    if cli.print {
        let path = data_path.context("no sales CSV given; pass a path or set data_path")?;
        let report = SalesReport::from_path(&path)?;
        print!("{}", TextRenderer::render(&report, view));
        return Ok(());
    }

    // Run the pipeline once, before the window opens
    let report = match data_path.or_else(pick_csv) {
        Some(path) => SalesReport::from_path(&path).map_err(|err| {
            error!("{err}");
            err.to_string()
        }),
        None => Err("No sales CSV selected".to_string()),
    };
    info!(view = view.label(), "starting dashboard");

    let options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_inner_size([settings.window_width, settings.window_height])
            .with_min_inner_size([900.0, 600.0])
            .with_title("Sales Dashboard"),
        ..Default::default()
    };

    eframe::run_native(
        "Sales Dashboard",
        options,
        Box::new(move |cc| Ok(Box::new(SalesDashboardApp::new(cc, report, &settings, view)))),
    )
    .map_err(|err| anyhow!("GUI error: {err}"))
}
