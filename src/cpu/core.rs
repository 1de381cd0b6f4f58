use std::sync::Arc;

use chrono::{DateTime, Local};

use super::constants::DEFAULT_CRITICAL_THRESHOLD;
use crate::error::{Error, Result};
use crate::sensor::SensorReader;
use crate::unit::TemperatureUnit;

/// One physical CPU core being independently monitored.
///
/// A core is identified by its 1-based index into the sensor group (slot 0
/// is the package reading and is not a core). Every [`Core::temperature`]
/// read appends to the core's history; the history is owned exclusively by
/// the core and grows without bound for the life of the process. Bounding
/// for display happens in the sampler's rolling window, not here.
pub struct Core {
    index: usize,
    unit: TemperatureUnit,
    reader: Arc<SensorReader>,
    history: Vec<(DateTime<Local>, f64)>,
}

impl Core {
    /// Creates a core model for the given 1-based index.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] naming both the offending index and the
    /// current core count when `index` falls outside `[1, N]`, and
    /// [`Error::SensorUnavailable`] if the count cannot be read at all.
    pub fn new(unit: TemperatureUnit, index: usize, reader: Arc<SensorReader>) -> Result<Self> {
        let max = reader.core_count()?;
        if index < 1 || index > max {
            return Err(Error::OutOfRange { index, max });
        }
        Ok(Self { index, unit, reader, history: Vec::new() })
    }

    /// The core's 1-based index.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The unit readings are converted to.
    pub fn unit(&self) -> TemperatureUnit {
        self.unit
    }

    /// Re-configures the unit from a lexical token, committing only when the
    /// token validates.
    pub fn set_unit(&mut self, token: &str) -> Result<()> {
        self.unit = token.parse()?;
        Ok(())
    }

    /// Reads this core's current temperature.
    ///
    /// The raw sample is fetched fresh from the sensor, converted to the
    /// configured unit, and appended to the history as a side effect of the
    /// read.
    pub fn temperature(&mut self) -> Result<f64> {
        let sample = self.reader.core_sample(self.index)?;
        let value = self.unit.convert(sample.current);
        self.history.push((Local::now(), value));
        Ok(value)
    }

    /// Accumulated (timestamp, converted value) readings, in insertion
    /// order.
    pub fn history(&self) -> &[(DateTime<Local>, f64)] {
        &self.history
    }

    /// Whether the core currently reads at or above its critical threshold.
    ///
    /// Uses the driver-reported critical threshold when present, falling
    /// back to [`DEFAULT_CRITICAL_THRESHOLD`]. Compared in Celsius so the
    /// configured display unit has no effect.
    pub fn is_critical(&self) -> Result<bool> {
        let sample = self.reader.core_sample(self.index)?;
        let threshold = sample.critical.unwrap_or(DEFAULT_CRITICAL_THRESHOLD);
        Ok(sample.current >= threshold)
    }
}
