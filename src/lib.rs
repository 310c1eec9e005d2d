//! Live viewer for orientation/acceleration telemetry streamed as JSON over
//! a WebSocket.
//!
//! Pipeline: [`ws::ConnectionManager`] receives frames, [`decoder`] turns them
//! into [`types::Sample`]s, and [`telemetry::TelemetryState`] keeps the latest
//! orientation plus a [`window::SlidingWindow`] of recent samples for the UI.

pub mod app;
pub mod config;
pub mod decoder;
pub mod logger;
pub mod orientation;
pub mod plotter;
pub mod telemetry;
pub mod types;
pub mod window;
pub mod ws;
