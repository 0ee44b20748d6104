//! Chart Plotter Module
//! Draws the dashboard views with egui, egui_plot and the egui painter.

use super::{cell_text, kpi_strings, shares};
use crate::stats::Kpis;
use egui::{Align2, Color32, FontId, Pos2, RichText, ScrollArea, Sense, Stroke};
use egui_plot::{Bar, BarChart, Line, Plot, PlotPoints, Points};
use polars::prelude::*;
use std::f64::consts::TAU;

pub const BAR_COLOR: Color32 = Color32::from_rgb(60, 179, 113); // Medium sea green
pub const LINE_COLOR: Color32 = Color32::from_rgb(0, 100, 0); // Dark green

/// Pie wedge palette, light to dark greens.
pub const GREENS: [Color32; 7] = [
    Color32::from_rgb(199, 233, 192),
    Color32::from_rgb(161, 217, 155),
    Color32::from_rgb(116, 196, 118),
    Color32::from_rgb(65, 171, 93),
    Color32::from_rgb(35, 139, 69),
    Color32::from_rgb(0, 109, 44),
    Color32::from_rgb(0, 68, 27),
];

const CHART_HEIGHT: f32 = 420.0;
/// First wedge starts at 140 degrees, counter-clockwise.
const PIE_START_ANGLE: f64 = 140.0 * TAU / 360.0;
/// Largest angle covered by one fan triangle when filling a wedge.
const PIE_STEP: f64 = 0.05;

/// Creates the dashboard visualizations.
pub struct ChartPlotter;

impl ChartPlotter {
    /// Colour for the n-th pie wedge.
    pub fn wedge_color(index: usize) -> Color32 {
        GREENS[index % GREENS.len()]
    }

    /// Category label for an integer x-axis mark.
    fn category_label(labels: &[String], value: f64) -> String {
        if (value - value.round()).abs() > 1e-6 || value < 0.0 {
            return String::new();
        }
        labels.get(value.round() as usize).cloned().unwrap_or_default()
    }

    /// Draw the cleaned table; only visible rows are materialised.
    pub fn draw_table(ui: &mut egui::Ui, table: &DataFrame, row_height: f32) {
        let columns = table.get_columns();
        ui.label(
            RichText::new(format!("{} rows x {} columns", table.height(), table.width()))
                .size(11.0)
                .color(Color32::GRAY),
        );
        ui.add_space(5.0);

        ScrollArea::both()
            .auto_shrink([false, false])
            .show_rows(ui, row_height, table.height(), |ui, row_range| {
                egui::Grid::new("raw_table")
                    .striped(true)
                    .min_col_width(70.0)
                    .spacing([12.0, 4.0])
                    .show(ui, |ui| {
                        for column in columns {
                            ui.label(RichText::new(column.name().as_str()).strong().size(12.0));
                        }
                        ui.end_row();

                        for row in row_range {
                            for column in columns {
                                ui.label(RichText::new(cell_text(column, row)).size(12.0));
                            }
                            ui.end_row();
                        }
                    });
            });
    }

    /// Draw the three KPI cards side by side.
    pub fn draw_kpi_cards(ui: &mut egui::Ui, kpis: &Kpis) {
        ui.horizontal(|ui| {
            for (title, value) in kpi_strings(kpis) {
                egui::Frame::none()
                    .fill(ui.visuals().widgets.noninteractive.bg_fill)
                    .rounding(8.0)
                    .stroke(Stroke::new(1.5, BAR_COLOR))
                    .inner_margin(16.0)
                    .show(ui, |ui| {
                        ui.set_min_width(220.0);
                        ui.vertical(|ui| {
                            ui.label(RichText::new(title).size(14.0).color(Color32::GRAY));
                            ui.add_space(4.0);
                            ui.label(RichText::new(value).size(28.0).strong());
                        });
                    });
                ui.add_space(15.0);
            }
        });

        if let Err(err) = kpis.avg_order_value {
            ui.add_space(8.0);
            ui.label(RichText::new(err.to_string()).size(11.0).color(Color32::GRAY));
        }
    }

    /// Bar chart of summed sales, one bar per group in series order.
    pub fn draw_bar_chart(ui: &mut egui::Ui, series: &[(String, f64)], x_label: &str) {
        let labels: Vec<String> = series.iter().map(|(k, _)| k.clone()).collect();
        let bars: Vec<Bar> = series
            .iter()
            .enumerate()
            .map(|(i, (name, value))| {
                Bar::new(i as f64, *value)
                    .name(name)
                    .width(0.6)
                    .fill(BAR_COLOR)
            })
            .collect();

        Plot::new("sales_bar_chart")
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .x_axis_label(x_label)
            .y_axis_label("Total Sales (USD)")
            .x_axis_formatter(move |mark, _range| Self::category_label(&labels, mark.value))
            .show(ui, |plot_ui| {
                plot_ui.bar_chart(BarChart::new(bars).color(BAR_COLOR));
            });
    }

    /// Line chart with point markers; x positions are the series indices.
    pub fn draw_line_chart(ui: &mut egui::Ui, series: &[(String, f64)], x_label: &str) {
        let labels: Vec<String> = series.iter().map(|(k, _)| k.clone()).collect();
        let points_vec: Vec<[f64; 2]> = series
            .iter()
            .enumerate()
            .map(|(i, (_, value))| [i as f64, *value])
            .collect();

        Plot::new("sales_line_chart")
            .height(CHART_HEIGHT)
            .allow_scroll(false)
            .x_axis_label(x_label)
            .y_axis_label("Total Sales (USD)")
            .x_axis_formatter(move |mark, _range| Self::category_label(&labels, mark.value))
            .show(ui, |plot_ui| {
                plot_ui.line(
                    Line::new(PlotPoints::from_iter(points_vec.iter().copied()))
                        .color(LINE_COLOR)
                        .width(2.0)
                        .name("Total Sales"),
                );
                plot_ui.points(
                    Points::new(PlotPoints::from_iter(points_vec.iter().copied()))
                        .radius(4.0)
                        .color(LINE_COLOR),
                );
            });
    }

    fn point_on_circle(center: Pos2, radius: f32, angle: f64) -> Pos2 {
        // Screen y grows downward, so counter-clockwise means subtracting sin.
        center + egui::vec2(radius * angle.cos() as f32, -radius * angle.sin() as f32)
    }

    /// Pie chart of group shares with percentage labels and a legend.
    pub fn draw_pie_chart(ui: &mut egui::Ui, series: &[(String, f64)]) {
        let shares = shares(series);
        if shares.iter().all(|s| *s <= 0.0) {
            ui.label(RichText::new("No positive sales to chart").size(14.0));
            return;
        }

        let size = ui
            .available_width()
            .min(ui.available_height())
            .clamp(220.0, 520.0);

        ui.horizontal(|ui| {
            let (rect, _) = ui.allocate_exact_size(egui::vec2(size, size), Sense::hover());
            let painter = ui.painter_at(rect);
            let center = rect.center();
            let radius = size * 0.45;

            let mut start = PIE_START_ANGLE;
            for (idx, share) in shares.iter().enumerate() {
                if *share <= 0.0 {
                    continue;
                }
                let sweep = share / 100.0 * TAU;
                let color = Self::wedge_color(idx);

                // Fill as a fan of thin triangles; a wedge over 180 degrees is not convex.
                let steps = ((sweep / PIE_STEP).ceil() as usize).max(1);
                for step in 0..steps {
                    let a0 = start + sweep * step as f64 / steps as f64;
                    let a1 = start + sweep * (step + 1) as f64 / steps as f64;
                    painter.add(egui::Shape::convex_polygon(
                        vec![
                            center,
                            Self::point_on_circle(center, radius, a0),
                            Self::point_on_circle(center, radius, a1),
                        ],
                        color,
                        Stroke::NONE,
                    ));
                }
                start += sweep;
            }

            // White wedge edges and labels on top of the fills.
            let mut start = PIE_START_ANGLE;
            for (idx, share) in shares.iter().enumerate() {
                if *share <= 0.0 {
                    continue;
                }
                let sweep = share / 100.0 * TAU;
                painter.line_segment(
                    [center, Self::point_on_circle(center, radius, start)],
                    Stroke::new(2.0, Color32::WHITE),
                );

                let text_color = if idx % GREENS.len() >= 3 {
                    Color32::WHITE
                } else {
                    Color32::BLACK
                };
                painter.text(
                    Self::point_on_circle(center, radius * 0.65, start + sweep / 2.0),
                    Align2::CENTER_CENTER,
                    format!("{share:.1}%"),
                    FontId::proportional(13.0),
                    text_color,
                );
                start += sweep;
            }

            ui.add_space(20.0);

            // Legend
            ui.vertical(|ui| {
                for (idx, (name, _)) in series.iter().enumerate() {
                    ui.horizontal(|ui| {
                        let (rect, _) =
                            ui.allocate_exact_size(egui::vec2(16.0, 16.0), Sense::hover());
                        ui.painter().rect_filled(rect, 3.0, Self::wedge_color(idx));
                        ui.label(RichText::new(name).size(13.0));
                    });
                }
            });
        });
    }
}
