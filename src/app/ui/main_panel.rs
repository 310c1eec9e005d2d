use eframe::egui;

use crate::app::app_core::MotionViewApp;
use crate::telemetry::TelemetrySnapshot;
use super::orientation_view::render_orientation_view;

pub fn render_main_panel(app: &MotionViewApp, ctx: &egui::Context, snapshot: &TelemetrySnapshot) {
    let plot = &app.config.get_config().plot;

    egui::CentralPanel::default().show(ctx, |ui| {
        render_orientation_view(ui, &app.state.model, snapshot, plot);
        ui.add_space(10.0);

        egui::ScrollArea::vertical().show(ui, |ui| {
            ui.columns(2, |columns| {
                for chart in &app.state.angle_charts {
                    chart.ui(&mut columns[0], &snapshot.samples);
                }
                for chart in &app.state.acceleration_charts {
                    chart.ui(&mut columns[1], &snapshot.samples);
                }
            });
        });
    });
}
