//! Control Panel Widget
//! Left side panel with the view selector and a summary of the loaded dataset.

use crate::charts::format_count;
use crate::stats::{SalesReport, View};
use egui::{Color32, RichText};

/// Left side control panel.
pub struct ControlPanel {
    pub selected: View,
}

impl ControlPanel {
    pub fn new(selected: View) -> Self {
        Self { selected }
    }

    /// Draw the control panel
    pub fn show(
        &mut self,
        ui: &mut egui::Ui,
        report: Result<&SalesReport, &str>,
    ) -> ControlPanelAction {
        let mut action = ControlPanelAction::None;

        // Title
        ui.vertical_centered(|ui| {
            ui.add_space(5.0);
            ui.label(
                RichText::new("🛍 Sales Dashboard")
                    .size(22.0)
                    .color(Color32::from_rgb(60, 179, 113)),
            );
        });
        ui.add_space(10.0);
        ui.separator();
        ui.add_space(5.0);

        // ===== View Selection =====
        ui.label(RichText::new("📊 Select Visualization").size(14.0).strong());
        ui.add_space(5.0);

        for view in View::ALL {
            if ui
                .radio_value(&mut self.selected, view, view.label())
                .changed()
            {
                action = ControlPanelAction::ViewChanged(view);
            }
        }

        ui.add_space(15.0);
        ui.separator();
        ui.add_space(10.0);

        // ===== Dataset Section =====
        ui.label(RichText::new("📁 Data Source").size(14.0).strong());
        ui.add_space(5.0);

        egui::Frame::none()
            .fill(ui.visuals().widgets.noninteractive.bg_fill)
            .rounding(5.0)
            .inner_margin(8.0)
            .show(ui, |ui| match report {
                Ok(report) => {
                    let file_name = report
                        .source()
                        .and_then(|p| p.file_name())
                        .map(|n| n.to_string_lossy().to_string())
                        .unwrap_or_else(|| "In-memory data".to_string());
                    let cleaning = report.cleaning();

                    ui.label(RichText::new(file_name).size(12.0));
                    ui.label(
                        RichText::new(format!("{} rows", format_count(cleaning.rows as i64)))
                            .size(11.0)
                            .color(Color32::GRAY),
                    );

                    let nulls = cleaning.price_nulls + cleaning.profit_nulls;
                    let null_color = if nulls > 0 {
                        Color32::from_rgb(243, 156, 18)
                    } else {
                        Color32::GRAY
                    };
                    ui.label(
                        RichText::new(format!(
                            "Unparseable prices: {}, profits: {}",
                            cleaning.price_nulls, cleaning.profit_nulls
                        ))
                        .size(11.0)
                        .color(null_color),
                    );
                }
                Err(message) => {
                    ui.label(
                        RichText::new(format!("Error: {message}"))
                            .size(11.0)
                            .color(Color32::from_rgb(220, 53, 69)),
                    );
                }
            });

        action
    }
}

/// Actions triggered by control panel
#[derive(Debug, Clone, PartialEq)]
pub enum ControlPanelAction {
    None,
    ViewChanged(View),
}
