//! Telemetry record data structures.
//!
//! Every row the node logs has the same ten columns. A row only fills the
//! columns relevant to the event that produced it; the rest stay blank.

use chrono::{DateTime, Utc};

use crate::error::ErrorKind;

/// One column of the telemetry schema, in stable order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Column {
    /// Local temperature reading.
    TemperatureInput,
    /// Temperature received from the peer.
    TemperatureReceived,
    /// Local upper bound.
    UpperLimitInput,
    /// Upper bound received from the peer.
    UpperLimitReceived,
    /// Local lower bound.
    LowerLimitInput,
    /// Lower bound received from the peer.
    LowerLimitReceived,
    /// Local average temperature (never filled by the core).
    AvgTempInput,
    /// Fused local/peer average.
    AvgTempReceived,
    /// Whether the row records an error.
    IsError,
    /// Error message.
    Error,
}

impl Column {
    /// Number of columns in the schema.
    pub const COUNT: usize = 10;

    /// All columns, in schema order.
    pub const ALL: [Column; Self::COUNT] = [
        Self::TemperatureInput,
        Self::TemperatureReceived,
        Self::UpperLimitInput,
        Self::UpperLimitReceived,
        Self::LowerLimitInput,
        Self::LowerLimitReceived,
        Self::AvgTempInput,
        Self::AvgTempReceived,
        Self::IsError,
        Self::Error,
    ];

    /// Column heading as written by the data logger.
    pub fn title(&self) -> &'static str {
        match self {
            Self::TemperatureInput => "Temperature (°C) - Input",
            Self::TemperatureReceived => "Temperature (°C) - Received",
            Self::UpperLimitInput => "Upper Limit - Input",
            Self::UpperLimitReceived => "Upper Limit - Received",
            Self::LowerLimitInput => "Lower Limit - Input",
            Self::LowerLimitReceived => "Lower Limit - Received",
            Self::AvgTempInput => "Avg. Temperature (°C) - Input",
            Self::AvgTempReceived => "Avg. Temperature (°C) - Received",
            Self::IsError => "isError",
            Self::Error => "Error",
        }
    }
}

/// A single logged row.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct TelemetryRecord {
    /// Capture time, if stamped.
    pub timestamp: Option<DateTime<Utc>>,
    /// Local temperature reading.
    pub temperature_input: Option<f64>,
    /// Temperature received from the peer.
    pub temperature_received: Option<f64>,
    /// Local upper bound.
    pub upper_limit_input: Option<f64>,
    /// Upper bound received from the peer.
    pub upper_limit_received: Option<f64>,
    /// Local lower bound.
    pub lower_limit_input: Option<f64>,
    /// Lower bound received from the peer.
    pub lower_limit_received: Option<f64>,
    /// Local average temperature.
    pub avg_temp_input: Option<f64>,
    /// Fused local/peer average.
    pub avg_temp_received: Option<f64>,
    /// Error flag. `None` leaves the column blank.
    pub is_error: Option<bool>,
    /// Error recorded by this row.
    pub error: Option<ErrorKind>,
}

impl TelemetryRecord {
    /// A row recording a device error.
    pub fn error(kind: ErrorKind) -> Self {
        Self {
            is_error: Some(true),
            error: Some(kind),
            ..Self::default()
        }
    }

    /// A sender snapshot: local reading and local bounds.
    pub fn local_snapshot(reading: f64, upper: Option<f64>, lower: Option<f64>) -> Self {
        Self {
            temperature_input: Some(reading),
            upper_limit_input: upper,
            lower_limit_input: lower,
            ..Self::default()
        }
    }

    /// A receiver snapshot: peer values and the fused average.
    pub fn received_snapshot(
        temperature: Option<f64>,
        fused: Option<f64>,
        upper: Option<f64>,
        lower: Option<f64>,
    ) -> Self {
        Self {
            temperature_received: temperature,
            avg_temp_received: fused,
            upper_limit_received: upper,
            lower_limit_received: lower,
            ..Self::default()
        }
    }

    /// Stamp the row with a capture time.
    pub fn at(mut self, timestamp: DateTime<Utc>) -> Self {
        self.timestamp = Some(timestamp);
        self
    }

    /// Check if this row records an error.
    pub fn is_error(&self) -> bool {
        self.is_error.unwrap_or(false)
    }

    /// Render one column as text. Blank columns render as an empty string.
    pub fn cell(&self, column: Column) -> String {
        let number = |v: Option<f64>| v.map(|n| n.to_string()).unwrap_or_default();

        match column {
            Column::TemperatureInput => number(self.temperature_input),
            Column::TemperatureReceived => number(self.temperature_received),
            Column::UpperLimitInput => number(self.upper_limit_input),
            Column::UpperLimitReceived => number(self.upper_limit_received),
            Column::LowerLimitInput => number(self.lower_limit_input),
            Column::LowerLimitReceived => number(self.lower_limit_received),
            Column::AvgTempInput => number(self.avg_temp_input),
            Column::AvgTempReceived => number(self.avg_temp_received),
            Column::IsError => self.is_error.map(|b| b.to_string()).unwrap_or_default(),
            Column::Error => self
                .error
                .map(|e| e.message().to_string())
                .unwrap_or_default(),
        }
    }

    /// All ten cells, in schema order.
    pub fn cells(&self) -> [String; Column::COUNT] {
        Column::ALL.map(|c| self.cell(c))
    }

    /// Count the columns this row fills.
    pub fn filled_columns(&self) -> usize {
        Column::ALL
            .iter()
            .filter(|c| !self.cell(**c).is_empty())
            .count()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_column_order() {
        assert_eq!(Column::ALL.len(), 10);
        assert_eq!(Column::ALL[0].title(), "Temperature (°C) - Input");
        assert_eq!(Column::ALL[8].title(), "isError");
        assert_eq!(Column::ALL[9].title(), "Error");
    }

    #[test]
    fn test_error_row() {
        let record = TelemetryRecord::error(ErrorKind::InvalidReceivedValues);
        assert!(record.is_error());
        assert_eq!(record.filled_columns(), 2);
        assert_eq!(record.cell(Column::IsError), "true");
        assert_eq!(
            record.cell(Column::Error),
            "Invalid values were received (Mode 1)"
        );
    }

    #[test]
    fn test_received_snapshot_cells() {
        let record =
            TelemetryRecord::received_snapshot(Some(28.0), Some(24.0), Some(25.0), Some(18.0));
        assert!(!record.is_error());
        assert_eq!(
            record.cells(),
            [
                "".to_string(),
                "28".to_string(),
                "".to_string(),
                "25".to_string(),
                "".to_string(),
                "18".to_string(),
                "".to_string(),
                "24".to_string(),
                "".to_string(),
                "".to_string(),
            ]
        );
    }

    #[test]
    fn test_local_snapshot_leaves_received_blank() {
        let record = TelemetryRecord::local_snapshot(19.5, Some(25.0), None);
        assert_eq!(record.cell(Column::TemperatureInput), "19.5");
        assert_eq!(record.cell(Column::LowerLimitInput), "");
        assert_eq!(record.cell(Column::TemperatureReceived), "");
        assert_eq!(record.filled_columns(), 2);
    }
}
