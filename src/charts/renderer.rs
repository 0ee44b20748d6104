//! Text Renderer
//! Plain-text rendering of every view for `--print` and terminals.
//!
//! Layout per view:
//! 1. Title line and underline
//! 2. Body: table rows, KPI lines, or one line per group with a `#` bar

use super::{cell_text, shares};
use crate::stats::{Kpis, SalesReport, StatsError, View, ViewData};
use polars::prelude::*;
use std::fmt::Write;

const BAR_WIDTH: usize = 40;
const COLUMN_SEPARATOR: &str = " | ";

/// Insert `,` every three digits of an unsigned digit string.
fn group_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}

/// `1234.5` with 2 decimals -> `1,234.50`.
pub fn format_thousands(value: f64, decimals: usize) -> String {
    let formatted = format!("{:.*}", decimals, value.abs());
    let (int_part, frac_part) = match formatted.split_once('.') {
        Some((int_part, frac_part)) => (int_part, Some(frac_part)),
        None => (formatted.as_str(), None),
    };

    let mut out = String::new();
    if value < 0.0 && formatted.chars().any(|c| matches!(c, '1'..='9')) {
        out.push('-');
    }
    out.push_str(&group_digits(int_part));
    if let Some(frac_part) = frac_part {
        out.push('.');
        out.push_str(frac_part);
    }
    out
}

pub fn format_usd(value: f64, decimals: usize) -> String {
    let body = format_thousands(value, decimals);
    match body.strip_prefix('-') {
        Some(abs) => format!("-${abs}"),
        None => format!("${body}"),
    }
}

pub fn format_count(value: i64) -> String {
    let grouped = group_digits(&value.unsigned_abs().to_string());
    if value < 0 {
        format!("-{grouped}")
    } else {
        grouped
    }
}

/// Display strings for the three KPI cards: revenue, units, average order value.
pub fn kpi_strings(kpis: &Kpis) -> [(&'static str, String); 3] {
    let avg = match kpis.avg_order_value {
        Ok(avg) => format_usd(avg, 2),
        Err(StatsError::DivisionByZero) => "n/a".to_string(),
    };
    [
        ("Total Revenue", format_usd(kpis.total_revenue, 0)),
        ("Units Sold", format_count(kpis.units_sold_total)),
        ("Avg. Order Value", avg),
    ]
}

pub struct TextRenderer;

impl TextRenderer {
    pub fn render(report: &SalesReport, view: View) -> String {
        let mut out = String::new();
        let title = view.title();
        let _ = writeln!(out, "{title}");
        let _ = writeln!(out, "{}", "=".repeat(title.len()));

        match report.view(view) {
            ViewData::Table(table) => Self::render_table(&mut out, table),
            ViewData::Kpis(kpis) => Self::render_kpis(&mut out, kpis),
            ViewData::Bar(series) | ViewData::Line(series) => {
                Self::render_series(&mut out, series)
            }
            ViewData::Pie(series) => Self::render_shares(&mut out, series),
        }
        out
    }

    fn render_table(out: &mut String, table: &DataFrame) {
        let columns = table.get_columns();
        let header: Vec<&str> = columns.iter().map(|c| c.name().as_str()).collect();
        let _ = writeln!(out, "{}", header.join(COLUMN_SEPARATOR));

        for row in 0..table.height() {
            let cells: Vec<String> = columns.iter().map(|c| cell_text(c, row)).collect();
            let _ = writeln!(out, "{}", cells.join(COLUMN_SEPARATOR));
        }
        let _ = writeln!(out, "({} rows)", table.height());
    }

    fn render_kpis(out: &mut String, kpis: &Kpis) {
        for (label, value) in kpi_strings(kpis) {
            let _ = writeln!(out, "{label:<18}{value}");
        }
    }

    fn render_series(out: &mut String, series: &[(String, f64)]) {
        if series.is_empty() {
            let _ = writeln!(out, "No data");
            return;
        }

        let key_width = series.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0);
        let max = series.iter().map(|(_, v)| *v).fold(0.0_f64, f64::max);
        for (key, value) in series {
            let len = if max > 0.0 {
                ((value.max(0.0) / max) * BAR_WIDTH as f64).round() as usize
            } else {
                0
            };
            let _ = writeln!(
                out,
                "{key:<key_width$}  {:>16}  {}",
                format_usd(*value, 2),
                "#".repeat(len)
            );
        }
    }

    fn render_shares(out: &mut String, series: &[(String, f64)]) {
        if series.is_empty() {
            let _ = writeln!(out, "No data");
            return;
        }

        let key_width = series.iter().map(|(k, _)| k.chars().count()).max().unwrap_or(0);
        for ((key, value), share) in series.iter().zip(shares(series)) {
            let _ = writeln!(
                out,
                "{key:<key_width$}  {share:>5.1}%  {}",
                format_usd(*value, 2)
            );
        }
    }
}
