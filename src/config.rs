//! Node configuration.
//!
//! Every value defaults to the constant the device firmware uses, so
//! `NodeConfig::default()` boots a node that behaves exactly like the
//! hardware unit.

use std::time::Duration;

use crate::data::LocalThresholds;
use crate::error::{Error, Result};

/// Radio group shared by the paired nodes.
pub const DEFAULT_RADIO_GROUP: u8 = 25;

/// Pause between two sampling cycles.
pub const DEFAULT_SAMPLE_INTERVAL: Duration = Duration::from_millis(2500);

/// Period of the hydration reminder.
pub const DEFAULT_REMINDER_PERIOD: Duration = Duration::from_millis(3_600_000);

/// Pause after each reminder repetition.
pub const DEFAULT_REMINDER_PAUSE: Duration = Duration::from_millis(5000);

/// How long the invalid-message glyph stays on screen.
pub const DEFAULT_ERROR_GLYPH_DURATION: Duration = Duration::from_millis(3000);

/// How the reminder reacts to events arriving during its pauses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ReminderPolicy {
    /// Every repetition clears, beeps, shows the glyph and pauses.
    #[default]
    Atomic,
    /// A radio message or button press during a pause hands the display to
    /// that event. Later repetitions still beep and pause but leave the
    /// display alone.
    Interruptible,
}

/// Configuration for a single node.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct NodeConfig {
    /// Radio group id.
    pub radio_group: u8,
    /// Serial number stamped on outgoing frames.
    pub radio_serial: u32,
    /// Operator thresholds.
    pub thresholds: LocalThresholds,
    /// Pause between sampling cycles.
    pub sample_interval: Duration,
    /// Whether the sender actually transmits its readings.
    pub broadcast_enabled: bool,
    /// Period of the reminder.
    pub reminder_period: Duration,
    /// Pause after each reminder repetition.
    pub reminder_pause: Duration,
    /// Number of reminder repetitions per firing.
    pub reminder_repetitions: u32,
    /// Interrupt behaviour of the reminder.
    pub reminder_policy: ReminderPolicy,
    /// How long the invalid-message glyph is shown.
    pub error_glyph_duration: Duration,
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            radio_group: DEFAULT_RADIO_GROUP,
            radio_serial: 0,
            thresholds: LocalThresholds::default(),
            sample_interval: DEFAULT_SAMPLE_INTERVAL,
            broadcast_enabled: false,
            reminder_period: DEFAULT_REMINDER_PERIOD,
            reminder_pause: DEFAULT_REMINDER_PAUSE,
            reminder_repetitions: 3,
            reminder_policy: ReminderPolicy::default(),
            error_glyph_duration: DEFAULT_ERROR_GLYPH_DURATION,
        }
    }
}

impl NodeConfig {
    /// Create a configuration with device defaults.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the radio group.
    pub fn with_radio_group(mut self, group: u8) -> Self {
        self.radio_group = group;
        self
    }

    /// Set the serial number used on outgoing frames.
    pub fn with_radio_serial(mut self, serial: u32) -> Self {
        self.radio_serial = serial;
        self
    }

    /// Set the operator thresholds.
    pub fn with_thresholds(mut self, thresholds: LocalThresholds) -> Self {
        self.thresholds = thresholds;
        self
    }

    /// Set the sampling interval.
    pub fn with_sample_interval(mut self, interval: Duration) -> Self {
        self.sample_interval = interval;
        self
    }

    /// Enable or disable sender broadcasting.
    ///
    /// Disabled by default: the firmware this node replicates never calls its
    /// transmit routine.
    pub fn with_broadcast(mut self, enabled: bool) -> Self {
        self.broadcast_enabled = enabled;
        self
    }

    /// Set the reminder period.
    pub fn with_reminder_period(mut self, period: Duration) -> Self {
        self.reminder_period = period;
        self
    }

    /// Set the reminder interrupt policy.
    pub fn with_reminder_policy(mut self, policy: ReminderPolicy) -> Self {
        self.reminder_policy = policy;
        self
    }

    /// Check the configuration for values the runtime cannot work with.
    ///
    /// # Returns
    ///
    /// `Ok(())`, or [`Error::InvalidParameter`] naming the first offending
    /// field.
    pub fn validate(&self) -> Result<()> {
        if self.sample_interval.is_zero() {
            return Err(Error::InvalidParameter {
                name: "sample_interval".to_string(),
                value: format!("{:?}", self.sample_interval),
            });
        }

        if self.reminder_period.is_zero() {
            return Err(Error::InvalidParameter {
                name: "reminder_period".to_string(),
                value: format!("{:?}", self.reminder_period),
            });
        }

        for (name, bound) in [
            ("thresholds.upper", self.thresholds.upper),
            ("thresholds.lower", self.thresholds.lower),
        ] {
            if bound.is_some_and(|b| !b.is_finite()) {
                return Err(Error::InvalidParameter {
                    name: name.to_string(),
                    value: format!("{:?}", bound),
                });
            }
        }

        Ok(())
    }
}
