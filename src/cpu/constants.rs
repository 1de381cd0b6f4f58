/// Critical temperature fallback in degrees Celsius, used when the sensor
/// driver does not report a per-sensor critical threshold.
pub const DEFAULT_CRITICAL_THRESHOLD: f64 = 100.0;
