//! # twin-thermo
//!
//! Firmware logic for a pair of radio-linked temperature monitors.
//!
//! Each node boots undecided and the operator picks its role with a button:
//! **A** makes it a sender, **B** a receiver. A sender samples its sensor,
//! shows the reading and warns (glyph plus five beeps) when the reading
//! leaves its thresholds. A receiver collects the peer's temperature and
//! limits over the radio, checks its own reading against the peer's limits
//! and shows the average of both readings. Every hour both remind the
//! operator and log a snapshot.
//!
//! ## Features
//!
//! - **Mode selection**: set once per session, race-free
//! - **Threshold alerts**: arrow glyph and buzzer on a breach
//! - **Radio sync**: framed, CRC-checked named values on a shared group
//! - **Telemetry**: ten-column rows, in memory or as CSV
//! - **Hourly reminder**: atomic, or yielding the display to radio and buttons
//!
//! Hardware is reached through the [`Sensor`], [`Actuator`],
//! [`TelemetrySink`] and [`WirelessChannel`] traits. The [`device`] and
//! [`radio`] modules provide host implementations of each.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use std::sync::Arc;
//! use twin_thermo::{
//!     Airwaves, Button, FixedSensor, MemoryTelemetry, Node, NodeConfig, Peripherals,
//!     TracingActuator,
//! };
//!
//! #[tokio::main]
//! async fn main() -> twin_thermo::Result<()> {
//!     let air = Airwaves::new();
//!     let config = NodeConfig::default().with_radio_serial(1);
//!
//!     let peripherals = Peripherals::new(
//!         Arc::new(FixedSensor(21.5)),
//!         Arc::new(TracingActuator::new("node")),
//!         Arc::new(MemoryTelemetry::new()),
//!         Arc::new(air.endpoint(config.radio_group, config.radio_serial)),
//!     );
//!
//!     let node = Node::start(config, peripherals)?;
//!     node.press(Button::A).await;
//!
//!     tokio::time::sleep(std::time::Duration::from_secs(10)).await;
//!     node.shutdown().await;
//!     Ok(())
//! }
//! ```
//!
//! ## Feature Flags
//!
//! - `serde`: Enable serialization/deserialization for data types

// Public modules
pub mod alert;
pub mod config;
pub mod data;
pub mod device;
pub mod error;
pub mod mode;
pub mod node;
pub mod radio;
pub mod receiver;
pub mod reminder;
pub mod sampler;
pub mod state;

// Re-exports for convenience
pub use alert::{AlertEngine, AlertOutcome};
pub use config::{NodeConfig, ReminderPolicy};
pub use error::{Error, ErrorKind, Result};
pub use mode::{Button, Mode, ModeSelector};
pub use node::Node;
pub use state::{NodeContext, NodeState, Peripherals};

// Re-export commonly used types from submodules
pub use data::{
    BreachKind, Column, LocalThresholds, PeerField, PeerSample, TelemetryRecord, Thresholds,
};
pub use device::{
    Actuator, ActuatorEvent, CsvTelemetry, FixedSensor, Glyph, MemoryTelemetry,
    RecordingActuator, Sensor, SharedSensor, TelemetrySink, TracingActuator,
};
pub use radio::{Airwaves, RadioEndpoint, RadioMessage, WirelessChannel};
pub use receiver::ReceiveOutcome;
pub use reminder::ReminderReport;
pub use sampler::CycleReport;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_public_exports() {
        let _ = std::any::TypeId::of::<Node>();
        let _ = std::any::TypeId::of::<NodeConfig>();
        let _ = std::any::TypeId::of::<Error>();
        let _ = std::any::TypeId::of::<PeerSample>();
        let _ = std::any::TypeId::of::<TelemetryRecord>();
        let _ = std::any::TypeId::of::<RadioMessage>();
    }
}
