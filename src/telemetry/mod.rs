pub mod state;

pub use state::{SessionWriter, TelemetrySnapshot, TelemetryState};
