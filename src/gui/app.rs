//! Sales Dashboard Main Application
//! Main window with control panel and chart viewer.

use crate::config::DashboardSettings;
use crate::gui::{ChartViewer, ControlPanel, ControlPanelAction};
use crate::stats::{SalesReport, View};
use egui::SidePanel;
use tracing::info;

/// Main application window.
///
/// The report is built once before the window opens and only read afterwards.
pub struct SalesDashboardApp {
    report: Result<SalesReport, String>,
    control_panel: ControlPanel,
    chart_viewer: ChartViewer,
}

impl SalesDashboardApp {
    pub fn new(
        _cc: &eframe::CreationContext<'_>,
        report: Result<SalesReport, String>,
        settings: &DashboardSettings,
        initial_view: View,
    ) -> Self {
        Self {
            report,
            control_panel: ControlPanel::new(initial_view),
            chart_viewer: ChartViewer::new(settings.table_row_height),
        }
    }
}

impl eframe::App for SalesDashboardApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        // Left panel - Control Panel
        SidePanel::left("control_panel")
            .min_width(260.0)
            .max_width(320.0)
            .show(ctx, |ui| {
                egui::ScrollArea::vertical().show(ui, |ui| {
                    let report = self.report.as_ref().map_err(String::as_str);
                    match self.control_panel.show(ui, report) {
                        ControlPanelAction::ViewChanged(view) => {
                            info!(view = view.label(), "view selected");
                        }
                        ControlPanelAction::None => {}
                    }
                });
            });

        // Central panel - Chart Viewer
        egui::CentralPanel::default().show(ctx, |ui| match &self.report {
            Ok(report) => self
                .chart_viewer
                .show(ui, report, self.control_panel.selected),
            Err(message) => ChartViewer::show_error(ui, message),
        });
    }
}
