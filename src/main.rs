use std::time::Duration;

use crossbeam_channel::bounded;
use eframe::egui;
use log::{error, info, warn};

use motion_x_view::app::MotionViewApp;
use motion_x_view::config::ConfigManager;
use motion_x_view::logger;
use motion_x_view::telemetry::TelemetryState;
use motion_x_view::ws::ConnectionManager;

const CONFIG_PATH: &str = "config.toml";
const SHUTDOWN_TIMEOUT: Duration = Duration::from_secs(3);

fn main() {
    logger::init_logger();
    info!("Application starting");

    let config = ConfigManager::load_or_default(CONFIG_PATH);
    let settings = config.get_config().clone();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .worker_threads(2)
        .thread_name("telemetry")
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            error!("Failed to start telemetry runtime: {}", e);
            std::process::exit(1);
        }
    };

    let telemetry = TelemetryState::new(settings.buffer.capacity);
    let (event_sender, event_receiver) = bounded(settings.connection.event_channel_capacity);
    let connections = ConnectionManager::new(runtime.handle().clone(), telemetry.clone(), event_sender);

    let options = eframe::NativeOptions {
        vsync: settings.window.vsync,
        hardware_acceleration: if settings.window.hardware_acceleration {
            eframe::HardwareAcceleration::Preferred
        } else {
            eframe::HardwareAcceleration::Off
        },
        renderer: eframe::Renderer::Glow,
        viewport: egui::ViewportBuilder::default()
            .with_title(settings.window.title.clone())
            .with_inner_size([settings.window.width, settings.window.height])
            .with_resizable(settings.window.resizable),
        ..Default::default()
    };

    let app_connections = connections.clone();
    let handle = runtime.handle().clone();
    if let Err(e) = eframe::run_native(
        &settings.window.title,
        options,
        Box::new(move |cc| {
            Ok(Box::new(MotionViewApp::new(
                cc,
                &handle,
                config,
                telemetry,
                app_connections,
                event_receiver,
            )))
        }),
    ) {
        error!("GUI failed: {}", e);
        std::process::exit(1);
    }

    info!("GUI closed, shutting down telemetry connection");
    if let Some(task) = connections.disconnect() {
        match runtime.block_on(async { tokio::time::timeout(SHUTDOWN_TIMEOUT, task).await }) {
            Ok(Ok(())) => info!("Telemetry connection closed"),
            Ok(Err(e)) => error!("Telemetry task failed: {}", e),
            Err(_) => warn!("Telemetry connection did not close within {:?}", SHUTDOWN_TIMEOUT),
        }
    }
    runtime.shutdown_timeout(SHUTDOWN_TIMEOUT);
}
