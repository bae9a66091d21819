//! Data structures for node state.
//!
//! Thresholds, the peer sample a receiver accumulates, and the telemetry
//! record schema.

pub mod peer;
pub mod telemetry;
pub mod thresholds;

pub use peer::{PeerField, PeerSample};
pub use telemetry::{Column, TelemetryRecord};
pub use thresholds::{BreachKind, LocalThresholds, Thresholds};
