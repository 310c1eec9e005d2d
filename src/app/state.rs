use crate::config::AppConfig;
use crate::orientation::EulerTransform;
use crate::plotter::ChartView;
use crate::telemetry::TelemetryState;
use crate::types::SampleField;

/// Control bar state: the editable endpoint and the last status line.
#[derive(Debug, Clone)]
pub struct ControlState {
    pub endpoint_input: String,
    pub status: String,
    pub status_is_error: bool,
}

impl ControlState {
    pub fn set_status(&mut self, status: impl Into<String>) {
        self.status = status.into();
        self.status_is_error = false;
    }

    pub fn set_error(&mut self, status: impl Into<String>) {
        self.status = status.into();
        self.status_is_error = true;
    }
}

/// UI-side state. Telemetry itself lives in [`TelemetryState`] and is only
/// read here, once per frame.
#[derive(Debug)]
pub struct AppState {
    pub control: ControlState,
    pub telemetry: TelemetryState,
    pub model: EulerTransform,
    pub angle_charts: Vec<ChartView>,
    pub acceleration_charts: Vec<ChartView>,
}

impl AppState {
    pub fn new(telemetry: TelemetryState, config: &AppConfig) -> Self {
        Self {
            control: ControlState {
                endpoint_input: config.connection.endpoint.clone(),
                status: "Not connected".to_string(),
                status_is_error: false,
            },
            telemetry,
            model: EulerTransform::default(),
            angle_charts: SampleField::ANGLES
                .iter()
                .map(|&field| ChartView::new(field, &config.plot))
                .collect(),
            acceleration_charts: SampleField::ACCELERATIONS
                .iter()
                .map(|&field| ChartView::new(field, &config.plot))
                .collect(),
        }
    }
}
