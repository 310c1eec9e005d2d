use log::warn;

use super::app_core::MotionViewApp;
use crate::ws::{ConnectionEvent, ConnectionPhase};

impl MotionViewApp {
    pub fn handle_connection_events(&mut self) {
        while let Ok(event) = self.events.try_recv() {
            let control = &mut self.state.control;
            match event {
                ConnectionEvent::Connected { endpoint } => {
                    control.set_status(format!("Connected to {}", endpoint));
                }
                ConnectionEvent::Failed { endpoint, reason } => {
                    control.set_error(format!("Could not connect to {}: {}", endpoint, reason));
                }
                ConnectionEvent::Lost { reason } => {
                    control.set_error(format!("Connection lost: {}", reason));
                }
                ConnectionEvent::Closed => control.set_status("Disconnected"),
            }
        }
    }

    /// Connect/Disconnect button handler.
    pub fn toggle_connection(&mut self) {
        match self.connections.phase() {
            ConnectionPhase::Disconnected => self.connect(),
            ConnectionPhase::Connecting | ConnectionPhase::Connected => {
                // the task finishes on the runtime; its handle is not needed here
                let _ = self.connections.disconnect();
                self.state.control.set_status("Disconnecting...");
            }
            ConnectionPhase::Closing => {}
        }
    }

    fn connect(&mut self) {
        let endpoint = self.state.control.endpoint_input.trim().to_string();
        match self.connections.connect(&endpoint) {
            Ok(()) => {
                self.state.control.set_status(format!("Connecting to {}...", endpoint));
                if self.config.get_config().connection.endpoint != endpoint {
                    self.config.get_config_mut().connection.endpoint = endpoint;
                    if let Err(e) = self.config.save() {
                        warn!("Failed to save configuration: {}", e);
                    }
                }
            }
            Err(e) => self.state.control.set_error(e.to_string()),
        }
    }
}
