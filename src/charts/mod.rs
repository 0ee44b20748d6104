//! Charts module - Chart rendering

mod plotter;
mod renderer;

pub use plotter::ChartPlotter;
pub use renderer::{format_count, kpi_strings, TextRenderer};

use polars::prelude::*;

/// Shown for null cells in the raw table.
pub const NULL_CELL: &str = "<NA>";

/// Display text for one table cell.
pub fn cell_text(column: &Column, row: usize) -> String {
    match column.get(row) {
        Ok(AnyValue::Null) | Err(_) => NULL_CELL.to_string(),
        Ok(value) => value.to_string().trim_matches('"').to_string(),
    }
}

/// Percentage share of each group in the positive total.
/// Negative sums count as zero; an all-zero series yields all zeros.
pub fn shares(series: &[(String, f64)]) -> Vec<f64> {
    let total: f64 = series.iter().map(|(_, v)| v.max(0.0)).sum();
    series
        .iter()
        .map(|(_, v)| {
            if total > 0.0 {
                v.max(0.0) / total * 100.0
            } else {
                0.0
            }
        })
        .collect()
}
