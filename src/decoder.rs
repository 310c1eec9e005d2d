use serde::{Deserialize, Serialize};

use crate::types::{Acceleration, Orientation, Sample};

/// One inbound message as delivered by the transport.
#[derive(Debug, Clone, Copy)]
pub enum Frame<'a> {
    Text(&'a str),
    Binary(&'a [u8]),
}

#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("Invalid UTF-8: {0}")]
    Encoding(#[from] std::str::Utf8Error),
    #[error("JSON parsing error: {0}")]
    Decode(#[from] serde_json::Error),
}

/// JSON shape of a telemetry frame. Unknown keys (including any `id`) are ignored.
#[derive(Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
struct WireSample {
    roll: f64,
    pitch: f64,
    yaw: f64,
    user_acceleration_x: f64,
    user_acceleration_y: f64,
    user_acceleration_z: f64,
    timestamp: String,
}

impl From<WireSample> for Sample {
    fn from(wire: WireSample) -> Self {
        Sample::new(
            Orientation::new(wire.roll, wire.pitch, wire.yaw),
            Acceleration::new(
                wire.user_acceleration_x,
                wire.user_acceleration_y,
                wire.user_acceleration_z,
            ),
            wire.timestamp,
        )
    }
}

pub fn decode_frame(frame: Frame<'_>) -> Result<Sample, FrameError> {
    match frame {
        Frame::Text(text) => decode_text(text),
        Frame::Binary(bytes) => decode_bytes(bytes),
    }
}

pub fn decode_text(payload: &str) -> Result<Sample, FrameError> {
    let wire = serde_json::from_str::<WireSample>(payload)?;
    Ok(wire.into())
}

pub fn decode_bytes(payload: &[u8]) -> Result<Sample, FrameError> {
    let payload_str = std::str::from_utf8(payload)?;
    decode_text(payload_str)
}

/// Serializes a sample back into the wire format. The identifier is not
/// part of the wire format and is dropped.
pub fn encode_sample(sample: &Sample) -> Result<String, FrameError> {
    let orientation = sample.orientation();
    let acceleration = sample.acceleration();
    let wire = WireSample {
        roll: orientation.roll,
        pitch: orientation.pitch,
        yaw: orientation.yaw,
        user_acceleration_x: acceleration.x,
        user_acceleration_y: acceleration.y,
        user_acceleration_z: acceleration.z,
        timestamp: sample.timestamp().to_string(),
    };
    Ok(serde_json::to_string(&wire)?)
}
