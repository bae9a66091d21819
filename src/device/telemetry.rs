//! Telemetry sinks.
//!
//! [`MemoryTelemetry`] keeps rows in memory; [`CsvTelemetry`] writes them
//! out the way the device's data logger exports them.

use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;

use super::TelemetrySink;
use crate::data::{Column, TelemetryRecord};
use crate::error::{ErrorKind, Result};

/// Telemetry sink that keeps every row in memory.
#[derive(Debug, Clone, Default)]
pub struct MemoryTelemetry {
    records: Arc<Mutex<Vec<TelemetryRecord>>>,
}

impl MemoryTelemetry {
    /// Create an empty log.
    pub fn new() -> Self {
        Self::default()
    }

    /// All rows, oldest first.
    pub fn records(&self) -> Vec<TelemetryRecord> {
        self.records.lock().clone()
    }

    /// Number of rows logged.
    pub fn len(&self) -> usize {
        self.records.lock().len()
    }

    /// Check if nothing has been logged.
    pub fn is_empty(&self) -> bool {
        self.records.lock().is_empty()
    }

    /// Rows recording the given error.
    pub fn errors_of(&self, kind: ErrorKind) -> Vec<TelemetryRecord> {
        self.records
            .lock()
            .iter()
            .filter(|r| r.error == Some(kind))
            .cloned()
            .collect()
    }

    /// The most recent row.
    pub fn last(&self) -> Option<TelemetryRecord> {
        self.records.lock().last().cloned()
    }
}

impl TelemetrySink for MemoryTelemetry {
    fn log(&self, record: TelemetryRecord) -> Result<()> {
        self.records.lock().push(record);
        Ok(())
    }
}

/// Telemetry sink that writes CSV rows to any writer.
///
/// The header row is written on construction. The first column is the
/// capture time in RFC 3339, followed by the ten schema columns.
pub struct CsvTelemetry<W: Write + Send> {
    writer: Mutex<W>,
}

impl<W: Write + Send> CsvTelemetry<W> {
    /// Wrap a writer and emit the header row.
    pub fn new(mut writer: W) -> Result<Self> {
        let header: Vec<String> = std::iter::once("Time".to_string())
            .chain(Column::ALL.iter().map(|c| escape(c.title())))
            .collect();
        writeln!(writer, "{}", header.join(","))?;

        Ok(Self {
            writer: Mutex::new(writer),
        })
    }

    /// Recover the underlying writer.
    pub fn into_inner(self) -> W {
        self.writer.into_inner()
    }
}

impl<W: Write + Send> TelemetrySink for CsvTelemetry<W> {
    fn log(&self, record: TelemetryRecord) -> Result<()> {
        let time = record
            .timestamp
            .map(|t| t.to_rfc3339())
            .unwrap_or_default();

        let row: Vec<String> = std::iter::once(time)
            .chain(record.cells().iter().map(|c| escape(c)))
            .collect();

        let mut writer = self.writer.lock();
        writeln!(writer, "{}", row.join(","))?;
        writer.flush()?;
        Ok(())
    }
}

fn escape(cell: &str) -> String {
    if cell.contains([',', '"', '\n']) {
        format!("\"{}\"", cell.replace('"', "\"\""))
    } else {
        cell.to_string()
    }
}
