//! Host implementations of the sensor and actuator capabilities.

use async_trait::async_trait;
use parking_lot::{Mutex, RwLock};
use std::sync::Arc;
use std::time::Duration;
use tracing::info;

use super::{Actuator, Glyph, Sensor, BEEP_DURATION, BEEP_FREQUENCY_HZ};

/// A sensor that always reports the same temperature.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FixedSensor(pub f64);

impl Sensor for FixedSensor {
    fn read(&self) -> f64 {
        self.0
    }
}

/// A sensor whose reading can be changed while the node runs.
#[derive(Debug, Clone)]
pub struct SharedSensor {
    reading: Arc<RwLock<f64>>,
}

impl SharedSensor {
    /// Create a sensor with an initial reading.
    pub fn new(reading: f64) -> Self {
        Self {
            reading: Arc::new(RwLock::new(reading)),
        }
    }

    /// Change the reading. Clones of this sensor see the change.
    pub fn set(&self, reading: f64) {
        *self.reading.write() = reading;
    }
}

impl Sensor for SharedSensor {
    fn read(&self) -> f64 {
        *self.reading.read()
    }
}

/// One call made on an actuator.
#[derive(Debug, Clone, PartialEq)]
pub enum ActuatorEvent {
    /// A glyph was shown.
    Glyph(Glyph, Option<Duration>),
    /// Text was scrolled.
    Text(String),
    /// The display was cleared.
    Clear,
    /// A beep was played.
    Beep,
}

/// An actuator that records every call.
///
/// By default glyph durations and beeps take their real time (via
/// `tokio::time::sleep`), so interleaving between tasks matches the device.
#[derive(Debug, Clone)]
pub struct RecordingActuator {
    events: Arc<Mutex<Vec<ActuatorEvent>>>,
    timed: bool,
}

impl RecordingActuator {
    /// Create an actuator that takes real time for each effect.
    pub fn new() -> Self {
        Self {
            events: Arc::new(Mutex::new(Vec::new())),
            timed: true,
        }
    }

    /// Create an actuator whose effects complete immediately.
    pub fn instant() -> Self {
        Self {
            timed: false,
            ..Self::new()
        }
    }

    /// Every call so far, oldest first.
    pub fn events(&self) -> Vec<ActuatorEvent> {
        self.events.lock().clone()
    }

    /// Number of beeps played.
    pub fn beep_count(&self) -> usize {
        self.count(|e| matches!(e, ActuatorEvent::Beep))
    }

    /// Number of times `glyph` was shown.
    pub fn glyph_count(&self, glyph: Glyph) -> usize {
        self.count(|e| matches!(e, ActuatorEvent::Glyph(g, _) if *g == glyph))
    }

    /// Every scrolled text, oldest first.
    pub fn texts(&self) -> Vec<String> {
        self.events
            .lock()
            .iter()
            .filter_map(|e| match e {
                ActuatorEvent::Text(t) => Some(t.clone()),
                _ => None,
            })
            .collect()
    }

    fn count(&self, predicate: impl Fn(&ActuatorEvent) -> bool) -> usize {
        self.events.lock().iter().filter(|e| predicate(e)).count()
    }

    fn record(&self, event: ActuatorEvent) {
        self.events.lock().push(event);
    }

    async fn hold(&self, duration: Duration) {
        if self.timed {
            tokio::time::sleep(duration).await;
        }
    }
}

impl Default for RecordingActuator {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Actuator for RecordingActuator {
    async fn show_glyph(&self, glyph: Glyph, duration: Option<Duration>) {
        self.record(ActuatorEvent::Glyph(glyph, duration));
        if let Some(duration) = duration {
            self.hold(duration).await;
        }
    }

    async fn show_text(&self, text: &str) {
        self.record(ActuatorEvent::Text(text.to_string()));
    }

    async fn clear(&self) {
        self.record(ActuatorEvent::Clear);
    }

    async fn beep(&self) {
        self.record(ActuatorEvent::Beep);
        self.hold(BEEP_DURATION).await;
    }
}

/// An actuator that writes every effect to the `tracing` log.
#[derive(Debug, Clone, Default)]
pub struct TracingActuator {
    label: String,
}

impl TracingActuator {
    /// Create an actuator whose log lines are tagged with `label`.
    pub fn new(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
        }
    }
}

#[async_trait]
impl Actuator for TracingActuator {
    async fn show_glyph(&self, glyph: Glyph, duration: Option<Duration>) {
        info!("[{}] glyph {:?}\n{}", self.label, glyph, glyph.to_pattern());
        if let Some(duration) = duration {
            tokio::time::sleep(duration).await;
        }
    }

    async fn show_text(&self, text: &str) {
        info!("[{}] text \"{}\"", self.label, text);
    }

    async fn clear(&self) {
        info!("[{}] clear", self.label);
    }

    async fn beep(&self) {
        info!("[{}] beep {} Hz", self.label, BEEP_FREQUENCY_HZ);
        tokio::time::sleep(BEEP_DURATION).await;
    }
}
