use std::sync::Arc;

use chrono::{Local, NaiveDateTime};
use egui::Color32;
use egui_plot::{Line, Plot, PlotBounds, PlotPoints};

use crate::config::PlotConfig;
use crate::types::{Sample, SampleField};

/// Formats a y axis label to a fixed width so neighbouring charts line up.
fn format_fixed_width_y_label(value: f64) -> String {
    let abs_value = value.abs();
    if abs_value >= 1000.0 {
        format!("{:-6.1e}", value)
    } else if abs_value >= 100.0 {
        format!("{:-6.0}", value)
    } else if abs_value >= 10.0 {
        format!("{:-6.1}", value)
    } else {
        format!("{:-6.2}", value)
    }
}

/// Time-series points for one field, x in seconds since the oldest sample.
///
/// Samples whose timestamp could not be parsed are placed at `now`.
pub fn series_points(samples: &[Arc<Sample>], field: SampleField, now: NaiveDateTime) -> Vec<[f64; 2]> {
    let Some(first) = samples.first() else {
        return Vec::new();
    };
    let origin = first.recorded_at().unwrap_or(now);

    samples
        .iter()
        .map(|sample| {
            let at = sample.recorded_at().unwrap_or(now);
            let seconds = (at - origin).num_microseconds().unwrap_or(0) as f64 / 1_000_000.0;
            [seconds, field.value(sample)]
        })
        .collect()
}

/// `"<Field>: <value>"` for the most recent sample, zero when there is none.
pub fn caption(samples: &[Arc<Sample>], field: SampleField) -> String {
    let value = samples.last().map(|sample| field.value(sample)).unwrap_or(0.0);
    format!("{}: {}", field.label(), field.format_value(value))
}

/// One time-series chart bound to a [`SampleField`].
#[derive(Debug, Clone)]
pub struct ChartView {
    field: SampleField,
    color: Color32,
    height: f32,
}

impl ChartView {
    pub fn new(field: SampleField, config: &PlotConfig) -> Self {
        let [r, g, b] = config.colors.for_field(field);
        Self {
            field,
            color: Color32::from_rgb(r, g, b),
            height: config.chart_height,
        }
    }

    pub fn ui(&self, ui: &mut egui::Ui, samples: &[Arc<Sample>]) {
        let points = series_points(samples, self.field, Local::now().naive_local());
        let title = self.field.label();

        let (y_min, y_max) = points.iter().fold(
            (f64::INFINITY, f64::NEG_INFINITY),
            |(min, max), &[_, y]| (min.min(y), max.max(y)),
        );
        let (y_min, y_max) = if points.is_empty() { (-1.0, 1.0) } else { (y_min, y_max) };
        let range = (y_max - y_min).max(0.1);
        let x_max = points.last().map(|[x, _]| *x).unwrap_or(0.0).max(1.0);

        Plot::new(title)
            .height(self.height)
            .x_axis_formatter(|v, _| format!("{:.1}s", v.value))
            .y_axis_formatter(|v, _| format_fixed_width_y_label(v.value))
            .allow_drag(false)
            .allow_zoom(false)
            .allow_scroll(false)
            .show(ui, |plot_ui| {
                plot_ui.set_plot_bounds(PlotBounds::from_min_max(
                    [0.0, y_min - range * 0.05],
                    [x_max, y_max + range * 0.05],
                ));
                if !points.is_empty() {
                    plot_ui.line(Line::new(title, PlotPoints::from(points)).color(self.color).width(1.5));
                }
            });

        ui.label(caption(samples, self.field));
        ui.add_space(20.0);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Acceleration, Orientation};

    fn sample(roll: f64, timestamp: &str) -> Arc<Sample> {
        Arc::new(Sample::new(
            Orientation::new(roll, 0.0, 0.0),
            Acceleration::new(0.0, 0.0, 9.81),
            timestamp,
        ))
    }

    fn now() -> NaiveDateTime {
        NaiveDateTime::parse_from_str("2024-01-01 00:00:10.0000", "%Y-%m-%d %H:%M:%S%.f").unwrap()
    }

    #[test]
    fn points_are_relative_to_oldest_sample() {
        let samples = vec![
            sample(0.1, "2024-01-01 00:00:00.0000"),
            sample(0.2, "2024-01-01 00:00:00.5000"),
            sample(0.3, "2024-01-01 00:00:02.0000"),
        ];
        let points = series_points(&samples, SampleField::Roll, now());
        assert_eq!(points, vec![[0.0, 0.1], [0.5, 0.2], [2.0, 0.3]]);
    }

    #[test]
    fn unparseable_timestamp_falls_back_to_now() {
        let samples = vec![sample(0.1, "2024-01-01 00:00:00.0000"), sample(0.2, "garbage")];
        let points = series_points(&samples, SampleField::Roll, now());
        assert_eq!(points[1], [10.0, 0.2]);
    }

    #[test]
    fn empty_window_has_no_points() {
        assert!(series_points(&[], SampleField::Yaw, now()).is_empty());
    }

    #[test]
    fn caption_uses_latest_sample_or_zero() {
        assert_eq!(caption(&[], SampleField::Pitch), "Pitch: 0.00°");
        let samples = vec![sample(0.0, "2024-01-01 00:00:00.0000")];
        assert_eq!(caption(&samples, SampleField::UserAccelerationZ), "UserAccelerationZ: 9.810m/s²");
    }
}
