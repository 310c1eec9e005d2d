use crossbeam_channel::Receiver;
use eframe::{egui, Frame};
use log::info;
use tokio::runtime::Handle;

use crate::config::ConfigManager;
use crate::orientation::OrientationSink;
use crate::telemetry::TelemetryState;
use crate::ws::{ConnectionEvent, ConnectionManager};
use super::state::AppState;

pub struct MotionViewApp {
    pub state: AppState,
    pub config: ConfigManager,
    pub connections: ConnectionManager,
    pub events: Receiver<ConnectionEvent>,
}

impl MotionViewApp {
    pub fn new(
        cc: &eframe::CreationContext<'_>,
        runtime: &Handle,
        config: ConfigManager,
        telemetry: TelemetryState,
        connections: ConnectionManager,
        events: Receiver<ConnectionEvent>,
    ) -> Self {
        spawn_repaint_notifier(runtime, &telemetry, &connections, cc.egui_ctx.clone());

        let state = AppState::new(telemetry, config.get_config());
        info!("UI ready, endpoint {}", state.control.endpoint_input);

        Self {
            state,
            config,
            connections,
            events,
        }
    }
}

/// Repaints whenever telemetry or the connection phase changes, so the UI
/// does not have to poll.
fn spawn_repaint_notifier(
    runtime: &Handle,
    telemetry: &TelemetryState,
    connections: &ConnectionManager,
    ctx: egui::Context,
) {
    let mut updates = telemetry.subscribe();
    let mut phases = connections.subscribe_phase();
    runtime.spawn(async move {
        loop {
            let alive = tokio::select! {
                changed = updates.changed() => changed.is_ok(),
                changed = phases.changed() => changed.is_ok(),
            };
            if !alive {
                break;
            }
            ctx.request_repaint();
        }
    });
}

impl eframe::App for MotionViewApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut Frame) {
        ctx.set_visuals(egui::Visuals::light());

        self.handle_connection_events();

        let snapshot = self.state.telemetry.read();
        self.state.model.apply_orientation(snapshot.orientation);

        crate::app::ui::render_control_bar(self, ctx, &snapshot);
        crate::app::ui::render_main_panel(self, ctx, &snapshot);
    }
}
