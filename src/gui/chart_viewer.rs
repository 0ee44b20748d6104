//! Chart Viewer Widget
//! Central panel that renders the selected view from the precomputed report.

use crate::charts::ChartPlotter;
use crate::stats::{SalesReport, View, ViewData};
use egui::{Color32, RichText};

/// Renders one view at a time; holds no data of its own.
pub struct ChartViewer {
    row_height: f32,
}

impl ChartViewer {
    pub fn new(row_height: f32) -> Self {
        Self { row_height }
    }

    /// Draw the selected view
    pub fn show(&self, ui: &mut egui::Ui, report: &SalesReport, view: View) {
        ui.label(RichText::new(view.title()).size(20.0).strong());
        ui.add_space(10.0);

        match report.view(view) {
            ViewData::Table(table) => ChartPlotter::draw_table(ui, table, self.row_height),
            ViewData::Kpis(kpis) => ChartPlotter::draw_kpi_cards(ui, kpis),
            ViewData::Bar(series) if !series.is_empty() => {
                ChartPlotter::draw_bar_chart(ui, series, "Region")
            }
            ViewData::Line(series) if !series.is_empty() => {
                ChartPlotter::draw_line_chart(ui, series, "Month")
            }
            ViewData::Pie(series) if !series.is_empty() => ChartPlotter::draw_pie_chart(ui, series),
            ViewData::Bar(_) | ViewData::Line(_) | ViewData::Pie(_) => Self::show_no_data(ui),
        }
    }

    fn show_no_data(ui: &mut egui::Ui) {
        ui.centered_and_justified(|ui| {
            ui.label(RichText::new("No Data").size(20.0));
        });
    }

    /// Shown instead of any view when the pipeline failed to build.
    pub fn show_error(ui: &mut egui::Ui, message: &str) {
        ui.centered_and_justified(|ui| {
            ui.label(
                RichText::new(format!("⚠ Could not load sales data\n\n{message}"))
                    .size(16.0)
                    .color(Color32::from_rgb(220, 53, 69)),
            );
        });
    }
}
