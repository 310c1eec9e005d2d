use chrono::NaiveDateTime;
use uuid::Uuid;

/// Wire format of the `timestamp` field, e.g. `2024-01-01 00:00:00.0500`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S%.f";

/// Roll, pitch and yaw in radians.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Orientation {
    pub roll: f64,
    pub pitch: f64,
    pub yaw: f64,
}

impl Orientation {
    pub fn new(roll: f64, pitch: f64, yaw: f64) -> Self {
        Self { roll, pitch, yaw }
    }
}

/// User acceleration in m/s².
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Acceleration {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl Acceleration {
    pub fn new(x: f64, y: f64, z: f64) -> Self {
        Self { x, y, z }
    }
}

/// One decoded telemetry reading.
///
/// Samples are immutable: fields are only reachable through getters and the
/// identifier is minted on construction, so two readings with identical
/// payloads still get distinct keys in list views.
#[derive(Debug, Clone, PartialEq)]
pub struct Sample {
    id: Uuid,
    orientation: Orientation,
    acceleration: Acceleration,
    timestamp: String,
    recorded_at: Option<NaiveDateTime>,
}

impl Sample {
    pub fn new(orientation: Orientation, acceleration: Acceleration, timestamp: impl Into<String>) -> Self {
        let timestamp = timestamp.into();
        let recorded_at = parse_timestamp(&timestamp);
        Self {
            id: Uuid::new_v4(),
            orientation,
            acceleration,
            timestamp,
            recorded_at,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn orientation(&self) -> Orientation {
        self.orientation
    }

    pub fn acceleration(&self) -> Acceleration {
        self.acceleration
    }

    /// Timestamp exactly as received.
    pub fn timestamp(&self) -> &str {
        &self.timestamp
    }

    /// Parsed timestamp, `None` when the sender's string did not match
    /// [`TIMESTAMP_FORMAT`].
    pub fn recorded_at(&self) -> Option<NaiveDateTime> {
        self.recorded_at
    }
}

fn parse_timestamp(timestamp: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(timestamp, TIMESTAMP_FORMAT).ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn sample(timestamp: &str) -> Sample {
        Sample::new(Orientation::new(0.1, 0.2, 0.3), Acceleration::new(1.0, 2.0, 3.0), timestamp)
    }

    #[test]
    fn parses_four_digit_fraction() {
        let s = sample("2024-01-01 00:00:00.0500");
        let at = s.recorded_at().expect("timestamp should parse");
        assert_eq!(at.nanosecond(), 50_000_000);
        assert_eq!(s.timestamp(), "2024-01-01 00:00:00.0500");
    }

    #[test]
    fn malformed_timestamp_keeps_sample() {
        let s = sample("yesterday-ish");
        assert!(s.recorded_at().is_none());
        assert_eq!(s.orientation(), Orientation::new(0.1, 0.2, 0.3));
    }

    #[test]
    fn identical_payloads_get_distinct_ids() {
        let a = sample("2024-01-01 00:00:00.0000");
        let b = sample("2024-01-01 00:00:00.0000");
        assert_ne!(a.id(), b.id());
    }
}
