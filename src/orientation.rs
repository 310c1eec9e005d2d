use crate::types::Orientation;

/// Receives the latest orientation triple, in radians.
pub trait OrientationSink {
    fn apply_orientation(&mut self, orientation: Orientation);
}

/// Euler angles as applied to the displayed model. Yaw is negated to match
/// the renderer's handedness: `x = roll`, `y = pitch`, `z = -yaw`.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct EulerTransform {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl EulerTransform {
    pub fn from_orientation(orientation: Orientation) -> Self {
        Self {
            x: orientation.roll,
            y: orientation.pitch,
            z: -orientation.yaw,
        }
    }

    /// Rotates a model-space point, applying X first, then Y, then Z.
    pub fn rotate(&self, [px, py, pz]: [f64; 3]) -> [f64; 3] {
        let (sx, cx) = self.x.sin_cos();
        let (sy, cy) = self.y.sin_cos();
        let (sz, cz) = self.z.sin_cos();

        let (py, pz) = (py * cx - pz * sx, py * sx + pz * cx);
        let (px, pz) = (px * cy + pz * sy, -px * sy + pz * cy);
        let (px, py) = (px * cz - py * sz, px * sz + py * cz);

        [px, py, pz]
    }
}

impl OrientationSink for EulerTransform {
    fn apply_orientation(&mut self, orientation: Orientation) {
        *self = Self::from_orientation(orientation);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f64::consts::FRAC_PI_2;

    fn assert_close(a: [f64; 3], b: [f64; 3]) {
        for (x, y) in a.iter().zip(b.iter()) {
            assert!((x - y).abs() < 1e-9, "{:?} != {:?}", a, b);
        }
    }

    #[test]
    fn yaw_is_negated() {
        let transform = EulerTransform::from_orientation(Orientation::new(0.1, 0.2, 0.3));
        assert_eq!(transform, EulerTransform { x: 0.1, y: 0.2, z: -0.3 });
    }

    #[test]
    fn sink_replaces_previous_orientation() {
        let mut transform = EulerTransform::default();
        transform.apply_orientation(Orientation::new(1.0, 0.0, 0.0));
        transform.apply_orientation(Orientation::new(0.0, 0.0, 0.5));
        assert_eq!(transform, EulerTransform { x: 0.0, y: 0.0, z: -0.5 });
    }

    #[test]
    fn zero_orientation_is_identity() {
        let transform = EulerTransform::default();
        assert_close(transform.rotate([1.0, 2.0, 3.0]), [1.0, 2.0, 3.0]);
    }

    #[test]
    fn positive_yaw_turns_clockwise_about_z() {
        let transform = EulerTransform::from_orientation(Orientation::new(0.0, 0.0, FRAC_PI_2));
        assert_close(transform.rotate([1.0, 0.0, 0.0]), [0.0, -1.0, 0.0]);
    }

    #[test]
    fn roll_turns_about_x() {
        let transform = EulerTransform::from_orientation(Orientation::new(FRAC_PI_2, 0.0, 0.0));
        assert_close(transform.rotate([0.0, 1.0, 0.0]), [0.0, 0.0, 1.0]);
    }
}
