//! Sensor discovery and raw sample access
//!
//! The OS sensor interface is consumed through the [`SensorSource`] trait:
//! one `query()` call returns every sensor group the host exposes, keyed by
//! group name. [`SensorReader`] selects the configured group (by default
//! `"coretemp"`, the Intel CPU package driver) and normalizes its output
//! into an ordered sequence of [`RawSensorSample`] values.
//!
//! By driver convention the first sample in the group is the package-level
//! ("overall") reading and the remaining samples are per-core. That
//! convention is sensor-driver specific, so the package slot is configurable
//! via [`SensorReader::with_package_index`] rather than hard-coded.
//!
//! # Examples
//!
//! ```no_run
//! use coretemp_metrics::sensor::{HwmonSource, SensorReader};
//!
//! fn main() -> coretemp_metrics::Result<()> {
//!     let reader = SensorReader::new(Box::new(HwmonSource::default()));
//!     println!("{} cores reported", reader.core_count()?);
//!     Ok(())
//! }
//! ```

mod hwmon;

pub use hwmon::HwmonSource;

use std::collections::HashMap;

use mockall::automock;

use crate::error::{Error, Result};

/// Sensor group the reader consumes when none is configured.
pub const DEFAULT_SENSOR_GROUP: &str = "coretemp";

/// One raw reading from a named temperature sensor.
///
/// Produced fresh on every poll; values are degrees Celsius as reported by
/// the driver. The high/critical thresholds are optional because not every
/// driver exposes them.
#[derive(Debug, Clone, PartialEq)]
pub struct RawSensorSample {
    /// Sensor label as reported by the driver (e.g. "Package id 0", "Core 0")
    pub label: String,
    /// Current reading in degrees Celsius
    pub current: f64,
    /// High threshold in degrees Celsius, if the driver reports one
    pub high: Option<f64>,
    /// Critical threshold in degrees Celsius, if the driver reports one
    pub critical: Option<f64>,
}

impl RawSensorSample {
    /// Creates a sample with no thresholds.
    pub fn new(label: impl Into<String>, current: f64) -> Self {
        Self { label: label.into(), current, high: None, critical: None }
    }

    /// Creates a sample carrying the driver's threshold values.
    pub fn with_thresholds(
        label: impl Into<String>,
        current: f64,
        high: Option<f64>,
        critical: Option<f64>,
    ) -> Self {
        Self { label: label.into(), current, high, critical }
    }
}

/// Interface to the OS sensor collaborator.
///
/// Implementations return the full set of sensor groups available on the
/// host in one call. The `automock`-generated `MockSensorSource` is what the
/// test suites feed canned readings through.
#[automock]
pub trait SensorSource: Send + Sync {
    /// Queries all temperature sensor groups, keyed by group name, each an
    /// ordered sequence of samples.
    fn query(&self) -> Result<HashMap<String, Vec<RawSensorSample>>>;
}

/// Normalizing façade over a [`SensorSource`].
///
/// Owns the group selection and the package-slot convention; everything
/// downstream (the CPU model, the sampler) reads through this type.
pub struct SensorReader {
    source: Box<dyn SensorSource>,
    group: String,
    package_index: usize,
}

impl SensorReader {
    /// Creates a reader over the default "coretemp" group with the package
    /// reading in slot 0.
    pub fn new(source: Box<dyn SensorSource>) -> Self {
        Self { source, group: DEFAULT_SENSOR_GROUP.to_string(), package_index: 0 }
    }

    /// Selects a different sensor group (e.g. "k10temp" on AMD hosts).
    pub fn with_group(mut self, group: impl Into<String>) -> Self {
        self.group = group.into();
        self
    }

    /// Overrides which slot in the group holds the package-level reading.
    /// Core indexing skips that slot, wherever it sits in the group.
    pub fn with_package_index(mut self, package_index: usize) -> Self {
        self.package_index = package_index;
        self
    }

    /// Returns the configured group name.
    pub fn group(&self) -> &str {
        &self.group
    }

    /// Returns the slot holding the package-level reading.
    pub fn package_index(&self) -> usize {
        self.package_index
    }

    /// Reads the current set of samples for the configured group.
    ///
    /// # Errors
    ///
    /// Returns [`Error::SensorUnavailable`] if the group is absent from the
    /// source's output or reports no samples. This always propagates: every
    /// downstream temperature value depends on it.
    pub fn read_all(&self) -> Result<Vec<RawSensorSample>> {
        let mut groups = self.source.query()?;
        let samples =
            groups.remove(&self.group).ok_or_else(|| Error::sensor_unavailable(&self.group))?;
        if samples.is_empty() {
            return Err(Error::sensor_unavailable(&self.group));
        }
        Ok(samples)
    }

    /// Number of countable per-core sensors: the group size minus the
    /// package reading.
    pub fn core_count(&self) -> Result<usize> {
        // read_all already rejects an empty group, so the subtraction can
        // never wrap.
        Ok(self.read_all()?.len() - 1)
    }

    /// Fresh package-level sample.
    pub fn package_sample(&self) -> Result<RawSensorSample> {
        let samples = self.read_all()?;
        samples
            .into_iter()
            .nth(self.package_index)
            .ok_or_else(|| Error::sensor_unavailable(&self.group))
    }

    /// Fresh sample for the core at the given 1-based index.
    ///
    /// Core indexes run over the non-package slots only: core 1 is the
    /// first slot that is not the configured package slot, core N the last,
    /// whichever slot the package reading occupies.
    ///
    /// # Errors
    ///
    /// Returns [`Error::OutOfRange`] when the index falls outside `[1, N]`
    /// for the current core count.
    pub fn core_sample(&self, index: usize) -> Result<RawSensorSample> {
        let mut samples = self.read_all()?;
        let max = samples.len() - 1;
        if index < 1 || index > max {
            return Err(Error::OutOfRange { index, max });
        }
        // Slots before the package slot shift down by one core index.
        let slot = if index - 1 < self.package_index { index - 1 } else { index };
        Ok(samples.swap_remove(slot))
    }
}
