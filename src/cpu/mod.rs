//! CPU and per-core temperature models
//!
//! [`Cpu`] owns the whole-package view: the configured display unit, the
//! numerical-display flag, and the lazily built, append-once list of
//! [`Core`] models. The package ("overall") temperature is computed fresh on
//! every read by re-querying the sensor through the shared
//! [`SensorReader`](crate::sensor::SensorReader) and converting per the
//! CPU's current unit.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use coretemp_metrics::cpu::Cpu;
//! use coretemp_metrics::sensor::{HwmonSource, SensorReader};
//!
//! fn main() -> coretemp_metrics::Result<()> {
//!     let reader = Arc::new(SensorReader::new(Box::new(HwmonSource::default())));
//!     let mut cpu = Cpu::new(reader, "c", false)?;
//!     println!("{}: {:.2}°C overall", cpu.core_count_display()?, cpu.overall_temperature()?);
//!     for core in cpu.build_cores_mut()? {
//!         println!("Core {}: {:.2}", core.index(), core.temperature()?);
//!     }
//!     Ok(())
//! }
//! ```

pub mod constants;

mod core;

pub use self::core::Core;


use std::sync::Arc;

use crate::error::Result;
use crate::sensor::SensorReader;
use crate::unit::TemperatureUnit;

/// Whole-CPU temperature model.
pub struct Cpu {
    reader: Arc<SensorReader>,
    unit: TemperatureUnit,
    use_numerical: bool,
    // None until build_cores runs; Some thereafter, never rebuilt.
    cores: Option<Vec<Core>>,
}

impl Cpu {
    /// Creates a CPU model from a unit token.
    ///
    /// The token is validated up front; an unknown token fails with
    /// [`Error::InvalidUnit`](crate::Error::InvalidUnit) rather than
    /// defaulting. `use_numerical` only affects how
    /// [`core_count_display`](Self::core_count_display) formats the count.
    pub fn new(reader: Arc<SensorReader>, unit: &str, use_numerical: bool) -> Result<Self> {
        Ok(Self { reader, unit: unit.parse()?, use_numerical, cores: None })
    }

    /// Creates a CPU model from an already-typed unit.
    pub fn with_unit(reader: Arc<SensorReader>, unit: TemperatureUnit, use_numerical: bool) -> Self {
        Self { reader, unit, use_numerical, cores: None }
    }

    /// The configured display unit.
    pub fn unit(&self) -> TemperatureUnit {
        self.unit
    }

    /// Re-configures the unit from a lexical token.
    ///
    /// The token is lower-cased and validated before anything is committed:
    /// a failed validation leaves the previous unit intact.
    pub fn set_unit(&mut self, token: &str) -> Result<()> {
        self.unit = token.parse()?;
        Ok(())
    }

    /// Restores the default Celsius unit unconditionally.
    pub fn reset_unit(&mut self) {
        self.unit = TemperatureUnit::Celsius;
    }

    /// Number of countable per-core sensors.
    pub fn core_count(&self) -> Result<usize> {
        self.reader.core_count()
    }

    /// The core count formatted for humans.
    ///
    /// With the numerical flag set this is just the integer; otherwise a
    /// pluralized phrase such as "4 CPU cores". Presentation only — it has
    /// no effect on indexing.
    pub fn core_count_display(&self) -> Result<String> {
        let count = self.core_count()?;
        if self.use_numerical {
            Ok(count.to_string())
        } else if count == 1 {
            Ok("1 CPU core".to_string())
        } else {
            Ok(format!("{count} CPU cores"))
        }
    }

    /// Current package-level temperature in the configured unit.
    ///
    /// Reads the sensor fresh on every call; nothing is cached.
    pub fn overall_temperature(&self) -> Result<f64> {
        let sample = self.reader.package_sample()?;
        Ok(self.unit.convert(sample.current))
    }

    /// Builds the per-core models, once.
    ///
    /// Idempotent by contract: if the list was already built it is returned
    /// unchanged — repeated calls never duplicate cores. Cores are
    /// constructed in index order 1..=N with the CPU's current unit.
    pub fn build_cores(&mut self) -> Result<&[Core]> {
        self.ensure_cores()?;
        Ok(self.cores.as_deref().unwrap_or_default())
    }

    /// Mutable access to the built cores, building them first if needed.
    ///
    /// Mutability is required for [`Core::temperature`], which appends to
    /// the core's history.
    pub fn build_cores_mut(&mut self) -> Result<&mut [Core]> {
        self.ensure_cores()?;
        Ok(self.cores.as_deref_mut().unwrap_or_default())
    }

    /// The built cores, or an empty slice if `build_cores` has not run.
    pub fn cores(&self) -> &[Core] {
        self.cores.as_deref().unwrap_or_default()
    }

    fn ensure_cores(&mut self) -> Result<()> {
        if self.cores.is_none() {
            let count = self.reader.core_count()?;
            let mut cores = Vec::with_capacity(count);
            for index in 1..=count {
                cores.push(Core::new(self.unit, index, Arc::clone(&self.reader))?);
            }
            self.cores = Some(cores);
        }
        Ok(())
    }
}
