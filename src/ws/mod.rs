pub mod client;

pub use client::{ConnectionError, ConnectionEvent, ConnectionManager, ConnectionPhase};
