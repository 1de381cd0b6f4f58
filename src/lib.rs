//! coretemp-metrics - A Rust library for CPU temperature telemetry on Linux
//!
//! This crate periodically samples per-core CPU temperature sensors through
//! the Linux hwmon interface, models the readings per core and for the
//! package as a whole, persists them to a rotating CSV log, and exposes a
//! bounded rolling window for live plotting.
//!
//! # Features
//!
//! - **Typed units**: Celsius, Fahrenheit, and Kelvin with validated token
//!   parsing and bit-exact 2-decimal conversions
//! - **Sensor discovery**: core count derived from the "coretemp" hwmon
//!   group, with the package-reading convention configurable
//! - **Per-core models**: unbounded insertion-ordered reading history per
//!   core, plus a fresh whole-CPU reading on every call
//! - **Sampling loop**: cancellable tokio background task with a bounded
//!   FIFO window for visualization and loud, fatal sensor-failure handling
//! - **Durable records**: append-only rotating CSV sink with read-back
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::Arc;
//! use std::time::Duration;
//!
//! use coretemp_metrics::prelude::*;
//!
//! #[tokio::main]
//! async fn main() -> coretemp_metrics::Result<()> {
//!     let reader = Arc::new(SensorReader::new(Box::new(HwmonSource::default())));
//!     let sink = Arc::new(RotatingCsvSink::new("logs/log.csv", 2_097_152, 5)?);
//!
//!     let mut sampler = Sampler::new(Arc::clone(&reader), sink);
//!     sampler.start(Duration::from_secs(3), TemperatureUnit::Celsius)?;
//!
//!     tokio::signal::ctrl_c().await?;
//!     sampler.stop().await?;
//!
//!     for (timestamp, value) in sampler.window() {
//!         println!("{} {:.2}", timestamp.format("%H:%M:%S"), value);
//!     }
//!     Ok(())
//! }
//! ```
//!
//! # Concurrency
//!
//! One background task owns all sampling-side mutation; the lifecycle flag
//! is atomic and the rolling window is snapshot-copied for readers. There is
//! no operation that blocks indefinitely other than the interval wait, which
//! is bounded and cancellable.

pub mod error;

pub use error::{Error, Result};

// Public modules
pub mod cpu;
pub mod logsink;
pub mod sampler;
pub mod sensor;
pub mod unit;
pub mod visualize;

/// Re-export common types for convenience
pub mod prelude {
    pub use crate::cpu::{Core, Cpu};
    pub use crate::error::{Error, Result};
    pub use crate::logsink::{LogRecord, LogSink, RecordKind, RotatingCsvSink};
    pub use crate::sampler::{RollingWindow, Sampler, SamplerState};
    pub use crate::sensor::{HwmonSource, RawSensorSample, SensorReader, SensorSource};
    pub use crate::unit::{celsius_to_fahrenheit, celsius_to_kelvin, TemperatureUnit};
    pub use crate::visualize::{TerminalChart, Visualizer};
}
