//! Sales Report
//! The immutable result of one pipeline run plus the per-view data selection.

use super::calculator::{GroupedSales, Kpis, SalesCalculator};
use crate::data::{CleanedTable, CleaningReport, DataLoader, LoaderError};
use polars::prelude::*;
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

/// The visualizations a user can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "snake_case")]
#[value(rename_all = "snake_case")]
pub enum View {
    #[default]
    RawTable,
    KpiSummary,
    BarByRegion,
    LineByMonth,
    PieByProduct,
}

impl View {
    pub const ALL: [View; 5] = [
        View::RawTable,
        View::KpiSummary,
        View::BarByRegion,
        View::LineByMonth,
        View::PieByProduct,
    ];

    /// Short label for the view selector.
    pub fn label(self) -> &'static str {
        match self {
            View::RawTable => "Show Dataset",
            View::KpiSummary => "KPI Metrics",
            View::BarByRegion => "Bar Chart: Sales by Region",
            View::LineByMonth => "Line Chart: Monthly Sales Trend",
            View::PieByProduct => "Pie Chart: Product Revenue Share",
        }
    }

    /// Heading shown above the rendered view.
    pub fn title(self) -> &'static str {
        match self {
            View::RawTable => "Raw Sales Data",
            View::KpiSummary => "Key Performance Indicators",
            View::BarByRegion => "Total Sales by Region",
            View::LineByMonth => "Monthly Sales Trend",
            View::PieByProduct => "Product Category Share in Total Revenue",
        }
    }
}

/// What a single view needs in order to be drawn.
#[derive(Debug, Clone, Copy)]
pub enum ViewData<'a> {
    Table(&'a DataFrame),
    Kpis(&'a Kpis),
    Bar(&'a [(String, f64)]),
    Line(&'a [(String, f64)]),
    Pie(&'a [(String, f64)]),
}

/// Cleaned table, KPIs and grouped aggregates, computed once.
#[derive(Debug, Clone)]
pub struct SalesReport {
    source: Option<PathBuf>,
    table: DataFrame,
    cleaning: CleaningReport,
    kpis: Kpis,
    region_sales: GroupedSales,
    monthly_sales: GroupedSales,
    product_sales: GroupedSales,
}

impl SalesReport {
    pub fn build(cleaned: CleanedTable, source: Option<PathBuf>) -> PolarsResult<Self> {
        let CleanedTable { frame, report } = cleaned;

        let kpis = SalesCalculator::compute_kpis(&frame)?;
        let region_sales = SalesCalculator::region_sales(&frame)?;
        let monthly_sales = SalesCalculator::monthly_sales(&frame)?;
        let product_sales = SalesCalculator::product_sales(&frame)?;

        info!(
            rows = report.rows,
            regions = region_sales.len(),
            months = monthly_sales.len(),
            products = product_sales.len(),
            total_revenue = kpis.total_revenue,
            "sales report ready"
        );

        Ok(Self {
            source,
            table: frame,
            cleaning: report,
            kpis,
            region_sales,
            monthly_sales,
            product_sales,
        })
    }

    /// Run the whole pipeline for one CSV file.
    pub fn from_path(path: &Path) -> Result<Self, LoaderError> {
        let cleaned = DataLoader::load_and_clean(path)?;
        Ok(Self::build(cleaned, Some(path.to_path_buf()))?)
    }

    pub fn view(&self, view: View) -> ViewData<'_> {
        match view {
            View::RawTable => ViewData::Table(&self.table),
            View::KpiSummary => ViewData::Kpis(&self.kpis),
            View::BarByRegion => ViewData::Bar(&self.region_sales),
            View::LineByMonth => ViewData::Line(&self.monthly_sales),
            View::PieByProduct => ViewData::Pie(&self.product_sales),
        }
    }

    pub fn source(&self) -> Option<&Path> {
        self.source.as_deref()
    }

    pub fn cleaning(&self) -> CleaningReport {
        self.cleaning
    }
}

#[cfg(test)]
pub(crate) fn example_report() -> SalesReport {
    use crate::data::processor::{raw_frame, DataProcessor};

    let raw = raw_frame(&[
        ["West", "Shoes", "2023-01-15", "$50.00", "10", "$200.00"],
        ["East", "Shoes", "2023-01-20", "$30", "5", "$50"],
        ["East", "Apparel", "2023-02-03", "$1,000", "2", "$400"],
    ]);
    SalesReport::build(DataProcessor::clean_table(&raw).unwrap(), None).unwrap()
}
