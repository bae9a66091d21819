//! Threshold alert engine.
//!
//! Shows a breach arrow and sounds the buzzer. Deciding *whether* a reading
//! is a breach is the caller's job; the engine only warns.

use std::sync::Arc;
use tracing::{debug, warn};

use crate::data::{BreachKind, TelemetryRecord};
use crate::device::{Actuator, Glyph, TelemetrySink};
use crate::error::ErrorKind;

/// Beeps per alert: one, then four more.
pub const ALERT_BEEPS: usize = 5;

/// Message returned after a successful warning.
pub const WARNED_MESSAGE: &str = "Warned user of temperature";

/// Result of one alert request.
#[derive(Debug, Clone, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct AlertOutcome {
    /// Set when the operator was warned.
    pub message: Option<String>,
    /// Set when the request was rejected.
    pub error: Option<ErrorKind>,
}

impl AlertOutcome {
    /// The operator was warned.
    pub fn warned() -> Self {
        Self {
            message: Some(WARNED_MESSAGE.to_string()),
            error: None,
        }
    }

    /// The request was rejected.
    pub fn failed(kind: ErrorKind) -> Self {
        Self {
            message: None,
            error: Some(kind),
        }
    }

    /// Check if the operator was warned.
    pub fn is_warned(&self) -> bool {
        self.error.is_none() && self.message.is_some()
    }
}

impl BreachKind {
    /// The glyph shown for this breach.
    pub fn glyph(&self) -> Glyph {
        match self {
            Self::UpperBreach => Glyph::UpArrow,
            Self::LowerBreach => Glyph::DownArrow,
        }
    }
}

/// Drives the display and buzzer for temperature warnings.
#[derive(Clone)]
pub struct AlertEngine {
    actuator: Arc<dyn Actuator>,
    telemetry: Arc<dyn TelemetrySink>,
}

impl AlertEngine {
    /// Create an engine over the given actuator and log.
    pub fn new(actuator: Arc<dyn Actuator>, telemetry: Arc<dyn TelemetrySink>) -> Self {
        Self {
            actuator,
            telemetry,
        }
    }

    /// Warn the operator about a breach.
    pub async fn evaluate(&self, kind: BreachKind) -> AlertOutcome {
        debug!("Alerting {} temperature", kind);

        self.actuator.clear().await;
        self.actuator.show_glyph(kind.glyph(), None).await;

        self.actuator.beep().await;
        for _ in 0..ALERT_BEEPS - 1 {
            self.actuator.beep().await;
        }

        AlertOutcome::warned()
    }

    /// Warn the operator about a breach named by its firmware identifier.
    ///
    /// An unknown identifier is logged as [`ErrorKind::FuncInvalidInput`] and
    /// nothing is shown.
    pub async fn evaluate_named(&self, identifier: &str) -> AlertOutcome {
        match BreachKind::from_identifier(identifier) {
            Some(kind) => self.evaluate(kind).await,
            None => {
                debug!("Rejecting alert for unknown breach '{}'", identifier);
                if let Err(e) = self
                    .telemetry
                    .log(TelemetryRecord::error(ErrorKind::FuncInvalidInput))
                {
                    warn!("Failed to log alert error: {}", e);
                }
                AlertOutcome::failed(ErrorKind::FuncInvalidInput)
            }
        }
    }
}

impl std::fmt::Debug for AlertEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AlertEngine").finish_non_exhaustive()
    }
}
