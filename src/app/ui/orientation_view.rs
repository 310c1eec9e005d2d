use egui::{Align2, Color32, FontId, Pos2, Stroke};

use crate::config::PlotConfig;
use crate::orientation::EulerTransform;
use crate::telemetry::TelemetrySnapshot;
use crate::types::SampleField;

/// Arrow pointing along +X with a fin on +Y marking "up".
const ARROW: [([f64; 3], [f64; 3]); 7] = [
    ([-1.0, 0.0, 0.0], [0.55, 0.0, 0.0]),
    ([1.0, 0.0, 0.0], [0.55, 0.2, 0.0]),
    ([1.0, 0.0, 0.0], [0.55, -0.2, 0.0]),
    ([1.0, 0.0, 0.0], [0.55, 0.0, 0.2]),
    ([1.0, 0.0, 0.0], [0.55, 0.0, -0.2]),
    ([-1.0, 0.0, 0.0], [-1.0, 0.35, 0.0]),
    ([-1.0, 0.35, 0.0], [-0.6, 0.0, 0.0]),
];

/// Fixed three-quarter camera.
const CAMERA: EulerTransform = EulerTransform { x: 0.35, y: -0.55, z: 0.0 };

fn project(point: [f64; 3], center: Pos2, scale: f32) -> Pos2 {
    let [x, y, _] = CAMERA.rotate(point);
    Pos2::new(center.x + x as f32 * scale, center.y - y as f32 * scale)
}

pub fn render_orientation_view(
    ui: &mut egui::Ui,
    model: &EulerTransform,
    snapshot: &TelemetrySnapshot,
    config: &PlotConfig,
) {
    let [r, g, b] = config.colors.model;
    let model_color = Color32::from_rgb(r, g, b);

    egui::Frame::canvas(ui.style()).show(ui, |ui| {
        let size = egui::vec2(ui.available_width(), config.orientation_height);
        let (rect, _response) = ui.allocate_exact_size(size, egui::Sense::hover());
        let painter = ui.painter_at(rect);
        let center = rect.center();
        let scale = rect.height().min(rect.width()) * 0.35;

        let axes = [
            ([1.2, 0.0, 0.0], Color32::from_rgb(200, 80, 80)),
            ([0.0, 1.2, 0.0], Color32::from_rgb(80, 160, 80)),
            ([0.0, 0.0, 1.2], Color32::from_rgb(80, 80, 200)),
        ];
        for (tip, color) in axes {
            painter.line_segment(
                [project([0.0, 0.0, 0.0], center, scale), project(tip, center, scale)],
                Stroke::new(1.0, color.gamma_multiply(0.5)),
            );
        }

        for (from, to) in ARROW {
            painter.line_segment(
                [
                    project(model.rotate(from), center, scale),
                    project(model.rotate(to), center, scale),
                ],
                Stroke::new(3.0, model_color),
            );
        }

        let orientation = snapshot.orientation;
        let readout = [
            (SampleField::Roll, orientation.roll),
            (SampleField::Pitch, orientation.pitch),
            (SampleField::Yaw, orientation.yaw),
        ]
        .iter()
        .map(|(field, value)| format!("{} {}", field.label(), field.format_value(*value)))
        .collect::<Vec<_>>()
        .join("   ");
        painter.text(
            rect.left_top() + egui::vec2(8.0, 8.0),
            Align2::LEFT_TOP,
            readout,
            FontId::monospace(13.0),
            ui.visuals().text_color(),
        );

        if !snapshot.connected && !snapshot.samples.is_empty() {
            painter.text(
                rect.right_top() + egui::vec2(-8.0, 8.0),
                Align2::RIGHT_TOP,
                "stale",
                FontId::proportional(13.0),
                Color32::from_rgb(150, 0, 0),
            );
        }
    });
}
