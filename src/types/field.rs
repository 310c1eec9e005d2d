use std::f64::consts::PI;

use super::Sample;

/// Selects one scalar channel of a [`Sample`] for a time-series display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SampleField {
    Roll,
    Pitch,
    Yaw,
    UserAccelerationX,
    UserAccelerationY,
    UserAccelerationZ,
}

impl SampleField {
    pub const ANGLES: [SampleField; 3] = [SampleField::Roll, SampleField::Pitch, SampleField::Yaw];
    pub const ACCELERATIONS: [SampleField; 3] = [
        SampleField::UserAccelerationX,
        SampleField::UserAccelerationY,
        SampleField::UserAccelerationZ,
    ];

    pub fn label(self) -> &'static str {
        match self {
            SampleField::Roll => "Roll",
            SampleField::Pitch => "Pitch",
            SampleField::Yaw => "Yaw",
            SampleField::UserAccelerationX => "UserAccelerationX",
            SampleField::UserAccelerationY => "UserAccelerationY",
            SampleField::UserAccelerationZ => "UserAccelerationZ",
        }
    }

    pub fn is_angle(self) -> bool {
        matches!(self, SampleField::Roll | SampleField::Pitch | SampleField::Yaw)
    }

    /// Raw value in radians or m/s².
    pub fn value(self, sample: &Sample) -> f64 {
        let orientation = sample.orientation();
        let acceleration = sample.acceleration();
        match self {
            SampleField::Roll => orientation.roll,
            SampleField::Pitch => orientation.pitch,
            SampleField::Yaw => orientation.yaw,
            SampleField::UserAccelerationX => acceleration.x,
            SampleField::UserAccelerationY => acceleration.y,
            SampleField::UserAccelerationZ => acceleration.z,
        }
    }

    /// Display string: degrees for angles, m/s² for accelerations.
    pub fn format_value(self, value: f64) -> String {
        if self.is_angle() {
            format!("{:.2}°", value * 180.0 / PI)
        } else {
            format!("{:.3}m/s²", value)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{Acceleration, Orientation};

    #[test]
    fn angles_are_shown_in_degrees() {
        assert_eq!(SampleField::Roll.format_value(PI / 2.0), "90.00°");
        assert_eq!(SampleField::Yaw.format_value(-PI), "-180.00°");
    }

    #[test]
    fn accelerations_keep_si_units() {
        assert_eq!(SampleField::UserAccelerationZ.format_value(0.12345), "0.123m/s²");
        assert_eq!(SampleField::UserAccelerationX.format_value(0.0), "0.000m/s²");
    }

    #[test]
    fn value_selects_matching_channel() {
        let sample = Sample::new(
            Orientation::new(1.0, 2.0, 3.0),
            Acceleration::new(4.0, 5.0, 6.0),
            "2024-01-01 00:00:00.0000",
        );
        let values: Vec<f64> = SampleField::ANGLES
            .iter()
            .chain(SampleField::ACCELERATIONS.iter())
            .map(|field| field.value(&sample))
            .collect();
        assert_eq!(values, vec![1.0, 2.0, 3.0, 4.0, 5.0, 6.0]);
    }
}
