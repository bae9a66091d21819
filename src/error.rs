//! Error types for the twin-thermo crate.
//!
//! Two kinds of failure exist here. [`Error`] covers infrastructure faults
//! (radio framing, sink I/O, configuration) and is returned through
//! [`Result`]. [`ErrorKind`] is the device's own error taxonomy: it is data
//! that gets logged and sometimes shown to the operator, and never unwinds a
//! task.

use thiserror::Error;

/// The main error type for this crate.
#[derive(Error, Debug)]
pub enum Error {
    /// Invalid data was received over the radio.
    #[error("Invalid data received: {context}")]
    InvalidData {
        /// Description of what was invalid about the data.
        context: String,
    },

    /// CRC check failed for a radio frame.
    #[error("CRC mismatch: expected {expected:#06x}, got {actual:#06x}")]
    CrcMismatch {
        /// The expected CRC value.
        expected: u16,
        /// The actual CRC value received.
        actual: u16,
    },

    /// An invalid parameter was provided.
    #[error("Invalid parameter: {name} = {value}")]
    InvalidParameter {
        /// The name of the parameter.
        name: String,
        /// The invalid value that was provided.
        value: String,
    },

    /// Writing a telemetry row failed.
    #[error("Telemetry sink error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized Result type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

/// Device-level error taxonomy.
///
/// None of these halt the node. Each is handled where it is detected: logged
/// to the telemetry sink and, for some kinds, shown on the display.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ErrorKind {
    /// Reserved. Not raised by the core.
    GenericUnknownFatal,
    /// Reserved. Would be logged only.
    GenericUnknownRecoverable,
    /// A radio value arrived while the node was not in receiver mode.
    ModeReceivedWhileSending,
    /// A radio value had an unknown name and a zero or missing value.
    InvalidReceivedValues,
    /// Peer data is still incomplete when it is evaluated.
    DataNotYetReceived,
    /// The alert engine was called with an unknown breach identifier.
    FuncInvalidInput,
}

impl ErrorKind {
    /// Every error kind, in declaration order.
    pub const ALL: [ErrorKind; 6] = [
        Self::GenericUnknownFatal,
        Self::GenericUnknownRecoverable,
        Self::ModeReceivedWhileSending,
        Self::InvalidReceivedValues,
        Self::DataNotYetReceived,
        Self::FuncInvalidInput,
    ];

    /// The operator-facing message, also written to the `Error` log column.
    pub fn message(&self) -> &'static str {
        match self {
            Self::GenericUnknownFatal => "Unknown error occurred - please reset this Micro:bit",
            Self::GenericUnknownRecoverable => {
                "Unknown error occurred - error is recoverable, continuing execution"
            }
            Self::ModeReceivedWhileSending => {
                "Value was received but mode was incorrect to perform operation (Mode 0)"
            }
            Self::InvalidReceivedValues => "Invalid values were received (Mode 1)",
            Self::DataNotYetReceived => "Data has not been received - please wait",
            Self::FuncInvalidInput => "Invalid values were received",
        }
    }

    /// Whether the operator sees this error on the display.
    pub fn is_operator_visible(&self) -> bool {
        matches!(self, Self::InvalidReceivedValues | Self::DataNotYetReceived)
    }
}

impl std::fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.message())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_messages_are_distinct() {
        let mut messages: Vec<_> = ErrorKind::ALL.iter().map(|k| k.message()).collect();
        messages.sort_unstable();
        messages.dedup();
        assert_eq!(messages.len(), ErrorKind::ALL.len());
    }

    #[test]
    fn test_operator_visibility() {
        assert!(ErrorKind::InvalidReceivedValues.is_operator_visible());
        assert!(ErrorKind::DataNotYetReceived.is_operator_visible());
        assert!(!ErrorKind::ModeReceivedWhileSending.is_operator_visible());
        assert!(!ErrorKind::FuncInvalidInput.is_operator_visible());
    }

    #[test]
    fn test_crc_error_display() {
        let err = Error::CrcMismatch {
            expected: 0x1234,
            actual: 0xBEEF,
        };
        assert_eq!(err.to_string(), "CRC mismatch: expected 0x1234, got 0xbeef");
    }
}
