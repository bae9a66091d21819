//! Shared node state.
//!
//! One [`NodeContext`] exists per node. Every task receives it by `Arc` and
//! touches only the fields it owns: the receive path writes the peer sample
//! and fused value, everything else only reads. Locks are never held across
//! an `.await`.

use parking_lot::RwLock;
use std::sync::Arc;
use tokio::sync::Notify;
use tracing::warn;

use crate::alert::AlertEngine;
use crate::config::NodeConfig;
use crate::data::{LocalThresholds, PeerSample, TelemetryRecord};
use crate::device::{Actuator, Sensor, TelemetrySink};
use crate::mode::ModeSelector;
use crate::radio::WirelessChannel;

/// The hardware a node drives.
#[derive(Clone)]
pub struct Peripherals {
    /// Temperature sensor.
    pub sensor: Arc<dyn Sensor>,
    /// LED matrix and buzzer.
    pub actuator: Arc<dyn Actuator>,
    /// Data logger.
    pub telemetry: Arc<dyn TelemetrySink>,
    /// Radio.
    pub radio: Arc<dyn WirelessChannel>,
}

impl Peripherals {
    /// Bundle the four capabilities.
    pub fn new(
        sensor: Arc<dyn Sensor>,
        actuator: Arc<dyn Actuator>,
        telemetry: Arc<dyn TelemetrySink>,
        radio: Arc<dyn WirelessChannel>,
    ) -> Self {
        Self {
            sensor,
            actuator,
            telemetry,
            radio,
        }
    }
}

impl std::fmt::Debug for Peripherals {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Peripherals")
            .field("radio_group", &self.radio.group())
            .finish_non_exhaustive()
    }
}

/// Mutable values shared between tasks.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct NodeState {
    /// Operator bounds.
    pub thresholds: LocalThresholds,
    /// Values heard from the peer.
    pub peer: PeerSample,
    /// Last fused temperature.
    pub fused: Option<f64>,
}

impl NodeState {
    /// Fresh boot state with the given bounds.
    pub fn new(thresholds: LocalThresholds) -> Self {
        Self {
            thresholds,
            peer: PeerSample::new(),
            fused: None,
        }
    }
}

/// Everything a node task needs.
pub struct NodeContext {
    /// Configuration, fixed at boot.
    pub config: NodeConfig,
    /// Session mode.
    pub mode: ModeSelector,
    /// Shared mutable values.
    pub state: RwLock<NodeState>,
    /// Hardware.
    pub peripherals: Peripherals,
    /// Alert engine over the same hardware.
    pub alerts: AlertEngine,
    /// Woken by radio and button events. An interruptible reminder hands the
    /// display over when woken.
    pub interrupts: Notify,
}

impl NodeContext {
    /// Build a context in boot state.
    pub fn new(config: NodeConfig, peripherals: Peripherals) -> Self {
        let alerts = AlertEngine::new(
            peripherals.actuator.clone(),
            peripherals.telemetry.clone(),
        );

        Self {
            state: RwLock::new(NodeState::new(config.thresholds)),
            config,
            mode: ModeSelector::new(),
            peripherals,
            alerts,
            interrupts: Notify::new(),
        }
    }

    /// Read the sensor.
    pub fn read_temperature(&self) -> f64 {
        self.peripherals.sensor.read()
    }

    /// Copy of the shared state.
    pub fn snapshot(&self) -> NodeState {
        self.state.read().clone()
    }

    /// Append a row stamped with the current time. Sink failures are logged
    /// and otherwise ignored.
    pub fn log(&self, record: TelemetryRecord) {
        let record = record.at(chrono::Utc::now());
        if let Err(e) = self.peripherals.telemetry.log(record) {
            warn!("Failed to write telemetry row: {}", e);
        }
    }

    /// Wake any task waiting on an interrupt.
    pub fn interrupt(&self) {
        self.interrupts.notify_waiters();
    }
}

impl std::fmt::Debug for NodeContext {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("NodeContext")
            .field("mode", &self.mode.current())
            .field("state", &*self.state.read())
            .finish_non_exhaustive()
    }
}


#[cfg(test)]
mod tests {
    use super::testing::*;
    use super::*;
    use crate::device::MockSensor;

    #[test]
    fn test_boot_state() {
        let h = harness(NodeConfig::default(), fixed(20.0));
        let state = h.ctx.snapshot();

        assert_eq!(state.thresholds, LocalThresholds::default());
        assert_eq!(state.peer, PeerSample::new());
        assert_eq!(state.fused, None);
        assert!(!h.ctx.mode.is_resolved());
    }

    #[test]
    fn test_sensor_is_read_on_demand() {
        let mut sensor = MockSensor::new();
        sensor.expect_read().times(2).return_const(19.0);

        let h = harness(NodeConfig::default(), Arc::new(sensor));
        assert_eq!(h.ctx.read_temperature(), 19.0);
        assert_eq!(h.ctx.read_temperature(), 19.0);
    }

    #[test]
    fn test_log_stamps_time() {
        let h = harness(NodeConfig::default(), fixed(20.0));
        h.ctx.log(TelemetryRecord::local_snapshot(20.0, None, None));

        let record = h.telemetry.last().unwrap();
        assert!(record.timestamp.is_some());
        assert_eq!(record.temperature_input, Some(20.0));
    }
}
