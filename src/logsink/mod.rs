//! Durable record sink
//!
//! Sampled temperatures and lifecycle events are persisted as structured
//! records through the [`LogSink`] trait: an append-only store with a
//! read-back query. The shipped implementation is [`RotatingCsvSink`],
//! which rotates by size and retains a bounded number of historical files.

mod rotating;

pub use rotating::RotatingCsvSink;

use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Local, NaiveDateTime, TimeZone};
use serde::{Deserialize, Serialize};

use crate::error::Result;

/// Distinguished kinds of durable records.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum RecordKind {
    /// A sampled temperature value.
    Temperature,
    /// A lifecycle event (monitoring started, stopped, interrupted).
    Event,
    /// A failure the sampler recorded before halting.
    Error,
}

impl fmt::Display for RecordKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RecordKind::Temperature => write!(f, "CPUTemperature"),
            RecordKind::Event => write!(f, "Event"),
            RecordKind::Error => write!(f, "ERROR"),
        }
    }
}

impl FromStr for RecordKind {
    type Err = ();

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "CPUTemperature" => Ok(RecordKind::Temperature),
            "Event" => Ok(RecordKind::Event),
            "ERROR" => Ok(RecordKind::Error),
            _ => Err(()),
        }
    }
}

/// One durable record: timestamp, kind, and a numeric value or message.
#[derive(Debug, Clone, PartialEq)]
pub struct LogRecord {
    pub timestamp: DateTime<Local>,
    pub kind: RecordKind,
    pub value: String,
}

impl LogRecord {
    /// A temperature record carrying the converted numeric reading.
    pub fn temperature(value: f64) -> Self {
        Self { timestamp: Local::now(), kind: RecordKind::Temperature, value: value.to_string() }
    }

    /// A lifecycle event record.
    pub fn event(message: impl Into<String>) -> Self {
        Self { timestamp: Local::now(), kind: RecordKind::Event, value: message.into() }
    }

    /// An error record, written best-effort before the loop halts.
    pub fn error(message: impl Into<String>) -> Self {
        Self { timestamp: Local::now(), kind: RecordKind::Error, value: message.into() }
    }

    /// The numeric reading, for temperature records.
    pub fn numeric_value(&self) -> Option<f64> {
        self.value.parse().ok()
    }
}

impl fmt::Display for LogRecord {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{},{},{}",
            self.timestamp.format("%Y-%m-%d %H:%M:%S"),
            self.kind,
            self.value
        )
    }
}

/// CSV row shape: at least date, level, time, value.
#[derive(Debug, Serialize, Deserialize)]
pub(crate) struct RecordRow {
    pub date: String,
    pub level: String,
    pub time: String,
    pub value: String,
}

impl RecordRow {
    pub(crate) fn from_record(record: &LogRecord) -> Self {
        Self {
            date: record.timestamp.format("%Y-%m-%d").to_string(),
            level: record.kind.to_string(),
            time: record.timestamp.format("%H:%M:%S").to_string(),
            value: record.value.clone(),
        }
    }

    pub(crate) fn into_record(self) -> Option<LogRecord> {
        let kind = self.level.parse().ok()?;
        let naive =
            NaiveDateTime::parse_from_str(&format!("{} {}", self.date, self.time), "%Y-%m-%d %H:%M:%S")
                .ok()?;
        let timestamp = Local.from_local_datetime(&naive).single()?;
        Some(LogRecord { timestamp, kind, value: self.value })
    }
}

/// Append-only durable record store with read-back.
///
/// Writes happen from the single sampling context only; implementations do
/// not need to support concurrent writers.
pub trait LogSink: Send + Sync {
    /// Appends one record durably.
    fn append(&self, record: &LogRecord) -> Result<()>;

    /// Returns all retained records, oldest first.
    fn read_back(&self) -> Result<Vec<LogRecord>>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn record_row_round_trips() {
        let record = LogRecord::temperature(47.25);
        let row = RecordRow::from_record(&record);
        assert_eq!(row.level, "CPUTemperature");
        assert_eq!(row.value, "47.25");

        let back = row.into_record().unwrap();
        assert_eq!(back.kind, RecordKind::Temperature);
        assert_eq!(back.numeric_value(), Some(47.25));
    }

    #[test]
    fn event_records_carry_messages() {
        let record = LogRecord::event("Monitoring CPU temperature.");
        assert_eq!(record.kind, RecordKind::Event);
        assert_eq!(record.numeric_value(), None);
        assert!(record.to_string().ends_with("Event,Monitoring CPU temperature."));
    }

    #[test]
    fn unknown_level_is_dropped_on_read_back() {
        let row = RecordRow {
            date: "2026-08-25".to_string(),
            level: "Bogus".to_string(),
            time: "10:00:00".to_string(),
            value: "x".to_string(),
        };
        assert!(row.into_record().is_none());
    }
}
