use eframe::egui;

use crate::app::app_core::MotionViewApp;
use crate::telemetry::TelemetrySnapshot;
use crate::ws::ConnectionPhase;

pub fn render_control_bar(app: &mut MotionViewApp, ctx: &egui::Context, snapshot: &TelemetrySnapshot) {
    let phase = app.connections.phase();

    egui::TopBottomPanel::top("control_bar")
        .min_height(48.0)
        .show(ctx, |ui| {
            ui.add_space(6.0);
            ui.horizontal(|ui| {
                ui.label("Server:");
                ui.add_enabled(
                    phase == ConnectionPhase::Disconnected,
                    egui::TextEdit::singleline(&mut app.state.control.endpoint_input)
                        .desired_width(220.0)
                        .hint_text("ws://localhost:8080"),
                );

                ui.separator();

                let (label, fill) = match phase {
                    ConnectionPhase::Disconnected => ("Connect", egui::Color32::from_rgb(0, 122, 255)),
                    ConnectionPhase::Connecting => ("Cancel", egui::Color32::from_rgb(255, 165, 0)),
                    ConnectionPhase::Connected => ("Disconnect", egui::Color32::from_rgb(52, 199, 89)),
                    ConnectionPhase::Closing => ("Disconnecting", egui::Color32::GRAY),
                };
                let button = egui::Button::new(
                    egui::RichText::new(label).size(18.0).color(egui::Color32::WHITE),
                )
                .fill(fill);
                if ui.add_enabled(phase != ConnectionPhase::Closing, button).clicked() {
                    app.toggle_connection();
                }

                let record = egui::Button::new(
                    egui::RichText::new(" Record ").size(18.0).color(egui::Color32::WHITE),
                )
                .fill(egui::Color32::GRAY);
                ui.add_enabled(false, record)
                    .on_disabled_hover_text("Recording is not available yet");

                ui.separator();

                ui.label(format!("Window: {}/{}", snapshot.samples.len(), snapshot.capacity));

                let (indicator, color) = if snapshot.connected {
                    ("● Live", egui::Color32::from_rgb(0, 150, 0))
                } else {
                    ("● Offline", egui::Color32::from_rgb(150, 0, 0))
                };
                ui.colored_label(color, indicator);

                ui.separator();

                let control = &app.state.control;
                if control.status_is_error {
                    ui.colored_label(egui::Color32::from_rgb(200, 0, 0), &control.status);
                } else {
                    ui.label(&control.status);
                }
            });
            ui.add_space(6.0);
        });
}
