//! Device capabilities.
//!
//! The node core talks to its hardware only through the traits in this
//! module. [`sim`] and [`telemetry`] provide host implementations used by
//! the tests and the demo.

pub mod glyph;
pub mod sim;
pub mod telemetry;

use async_trait::async_trait;
use std::time::Duration;

use crate::data::TelemetryRecord;
use crate::error::Result;

pub use glyph::Glyph;
pub use sim::{ActuatorEvent, FixedSensor, RecordingActuator, SharedSensor, TracingActuator};
pub use telemetry::{CsvTelemetry, MemoryTelemetry};

/// Tone used for every beep.
pub const BEEP_FREQUENCY_HZ: u32 = 200;

/// One whole beat at the default 120 bpm.
pub const BEEP_DURATION: Duration = Duration::from_millis(500);

/// Ambient temperature sensor.
#[cfg_attr(test, mockall::automock)]
pub trait Sensor: Send + Sync {
    /// Read the current temperature in Celsius. Never cached.
    fn read(&self) -> f64;
}

/// LED matrix and buzzer.
///
/// Each call blocks the issuing task until the effect is over.
#[async_trait]
pub trait Actuator: Send + Sync {
    /// Show a glyph, optionally holding it for `duration`.
    async fn show_glyph(&self, glyph: Glyph, duration: Option<Duration>);

    /// Scroll a line of text.
    async fn show_text(&self, text: &str);

    /// Turn every LED off.
    async fn clear(&self);

    /// Play one beep.
    async fn beep(&self);
}

/// Append-only telemetry log.
pub trait TelemetrySink: Send + Sync {
    /// Append one row.
    fn log(&self, record: TelemetryRecord) -> Result<()>;
}
