//! Temperature units and conversion
//!
//! This module provides the [`TemperatureUnit`] enumeration and the pure
//! conversion functions the rest of the crate builds on. Sensor drivers
//! report degrees Celsius; conversion to Fahrenheit or Kelvin is applied at
//! read time, rounded to two decimal places.
//!
//! # Examples
//!
//! ```
//! use coretemp_metrics::unit::{celsius_to_fahrenheit, TemperatureUnit};
//!
//! let unit: TemperatureUnit = "Fahrenheit".parse().unwrap();
//! assert_eq!(unit, TemperatureUnit::Fahrenheit);
//! assert_eq!(celsius_to_fahrenheit(45.5), 113.9);
//! ```

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::Error;

/// The accepted unit vocabulary, as shown in validation errors.
pub const VALID_UNITS: &str = "c, celsius, f, fahrenheit, k, kelvin";

/// Unit a temperature reading is expressed in.
///
/// Parsing accepts two lexical tokens per variant ("c"/"celsius" and so on),
/// case-insensitively. Any other token is rejected with
/// [`Error::InvalidUnit`], never silently defaulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum TemperatureUnit {
    #[default]
    Celsius,
    Fahrenheit,
    Kelvin,
}

impl TemperatureUnit {
    /// Converts a raw Celsius reading into this unit.
    ///
    /// Celsius is the identity; Fahrenheit and Kelvin go through the rounded
    /// conversion functions.
    pub fn convert(&self, celsius: f64) -> f64 {
        match self {
            TemperatureUnit::Celsius => celsius,
            TemperatureUnit::Fahrenheit => celsius_to_fahrenheit(celsius),
            TemperatureUnit::Kelvin => celsius_to_kelvin(celsius),
        }
    }

    /// Returns the display suffix for this unit (e.g. "°C").
    pub fn suffix(&self) -> &'static str {
        match self {
            TemperatureUnit::Celsius => "°C",
            TemperatureUnit::Fahrenheit => "°F",
            TemperatureUnit::Kelvin => "K",
        }
    }
}

impl FromStr for TemperatureUnit {
    type Err = Error;

    fn from_str(token: &str) -> Result<Self, Self::Err> {
        match token.to_lowercase().as_str() {
            "c" | "celsius" => Ok(TemperatureUnit::Celsius),
            "f" | "fahrenheit" => Ok(TemperatureUnit::Fahrenheit),
            "k" | "kelvin" => Ok(TemperatureUnit::Kelvin),
            _ => Err(Error::InvalidUnit { token: token.to_string(), expected: VALID_UNITS }),
        }
    }
}

impl fmt::Display for TemperatureUnit {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TemperatureUnit::Celsius => write!(f, "celsius"),
            TemperatureUnit::Fahrenheit => write!(f, "fahrenheit"),
            TemperatureUnit::Kelvin => write!(f, "kelvin"),
        }
    }
}

/// Converts degrees Celsius to degrees Fahrenheit, rounded to 2 decimal
/// places.
///
/// The rounding is a contract: log records and plot labels produced from the
/// same reading must agree bit-for-bit.
pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    round2(celsius * 9.0 / 5.0 + 32.0)
}

/// Converts degrees Celsius to Kelvin, rounded to 2 decimal places.
pub fn celsius_to_kelvin(celsius: f64) -> f64 {
    round2(celsius + 273.15)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fahrenheit_conversion_is_rounded() {
        assert_eq!(celsius_to_fahrenheit(0.0), 32.0);
        assert_eq!(celsius_to_fahrenheit(45.5), 113.9);
        assert_eq!(celsius_to_fahrenheit(36.6), 97.88);
        assert_eq!(celsius_to_fahrenheit(-40.0), -40.0);
    }

    #[test]
    fn kelvin_conversion_is_rounded() {
        assert_eq!(celsius_to_kelvin(0.0), 273.15);
        assert_eq!(celsius_to_kelvin(26.85), 300.0);
        assert_eq!(celsius_to_kelvin(-273.15), 0.0);
    }

    #[test]
    fn accepts_all_six_tokens_case_insensitively() {
        for token in ["c", "C", "celsius", "Celsius", "CELSIUS"] {
            assert_eq!(token.parse::<TemperatureUnit>().unwrap(), TemperatureUnit::Celsius);
        }
        for token in ["f", "F", "fahrenheit", "Fahrenheit"] {
            assert_eq!(token.parse::<TemperatureUnit>().unwrap(), TemperatureUnit::Fahrenheit);
        }
        for token in ["k", "K", "kelvin", "KELVIN"] {
            assert_eq!(token.parse::<TemperatureUnit>().unwrap(), TemperatureUnit::Kelvin);
        }
    }

    #[test]
    fn rejects_unknown_tokens() {
        for token in ["rankine", "", "cc", "celsiu", "°c"] {
            let err = token.parse::<TemperatureUnit>().unwrap_err();
            match err {
                Error::InvalidUnit { token: t, expected } => {
                    assert_eq!(t, token);
                    assert_eq!(expected, VALID_UNITS);
                },
                other => panic!("expected InvalidUnit, got {other:?}"),
            }
        }
    }

    #[test]
    fn convert_dispatches_per_unit() {
        assert_eq!(TemperatureUnit::Celsius.convert(41.37), 41.37);
        assert_eq!(TemperatureUnit::Fahrenheit.convert(100.0), 212.0);
        assert_eq!(TemperatureUnit::Kelvin.convert(100.0), 373.15);
    }
}
