//! Linux hwmon backend
//!
//! Walks `/sys/class/hwmon/hwmon*/`, reading each device's `name` file as
//! the group name and its `temp<N>_input` channels (millidegrees Celsius)
//! as samples, in channel order. Labels come from `temp<N>_label` when the
//! driver provides them; high and critical thresholds from `temp<N>_max`
//! and `temp<N>_crit`.

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use tracing::debug;

use super::{RawSensorSample, SensorSource};
use crate::error::Result;

/// Sensor source backed by the Linux hwmon sysfs tree.
#[derive(Debug, Clone)]
pub struct HwmonSource {
    root: PathBuf,
}

impl HwmonSource {
    /// Creates a source rooted at the standard `/sys/class/hwmon` path.
    pub fn new() -> Self {
        Self { root: PathBuf::from("/sys/class/hwmon") }
    }

    /// Creates a source rooted at an alternate path (used by tests that
    /// stage a fake sysfs tree).
    pub fn with_root(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    fn read_device(device: &Path) -> Vec<RawSensorSample> {
        // Channels are numbered but not necessarily contiguous; collect and
        // sort so the package sensor (lowest channel) stays first.
        let mut channels: Vec<u32> = match fs::read_dir(device) {
            Ok(entries) => entries
                .flatten()
                .filter_map(|e| {
                    let name = e.file_name().to_string_lossy().into_owned();
                    name.strip_prefix("temp")?.strip_suffix("_input")?.parse().ok()
                })
                .collect(),
            Err(_) => return Vec::new(),
        };
        channels.sort_unstable();

        let mut samples = Vec::with_capacity(channels.len());
        for channel in channels {
            let Some(current) = read_millidegrees(device, channel, "input") else {
                continue;
            };
            let label = read_trimmed(&device.join(format!("temp{channel}_label")))
                .unwrap_or_else(|| format!("temp{channel}"));
            samples.push(RawSensorSample::with_thresholds(
                label,
                current,
                read_millidegrees(device, channel, "max"),
                read_millidegrees(device, channel, "crit"),
            ));
        }
        samples
    }
}

impl Default for HwmonSource {
    fn default() -> Self {
        Self::new()
    }
}

impl SensorSource for HwmonSource {
    fn query(&self) -> Result<HashMap<String, Vec<RawSensorSample>>> {
        let mut groups: HashMap<String, Vec<RawSensorSample>> = HashMap::new();

        let entries = match fs::read_dir(&self.root) {
            Ok(entries) => entries,
            Err(e) => {
                debug!(root = %self.root.display(), error = %e, "hwmon tree not readable");
                return Ok(groups);
            },
        };

        for entry in entries.flatten() {
            let device = entry.path();
            let Some(name) = read_trimmed(&device.join("name")) else {
                continue;
            };
            let samples = Self::read_device(&device);
            if samples.is_empty() {
                continue;
            }
            debug!(group = %name, sensors = samples.len(), "discovered hwmon device");
            // A driver may expose multiple hwmon devices under one name.
            groups.entry(name).or_default().extend(samples);
        }

        Ok(groups)
    }
}

fn read_trimmed(path: &Path) -> Option<String> {
    fs::read_to_string(path).ok().map(|s| s.trim().to_string())
}

fn read_millidegrees(device: &Path, channel: u32, suffix: &str) -> Option<f64> {
    let raw = read_trimmed(&device.join(format!("temp{channel}_{suffix}")))?;
    raw.parse::<i64>().ok().map(|milli| milli as f64 / 1000.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sensor::{SensorReader, DEFAULT_SENSOR_GROUP};
    use std::fs;

    fn stage_device(root: &Path, device: &str, name: &str, temps: &[(u32, &str, i64)]) {
        let dir = root.join(device);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("name"), format!("{name}\n")).unwrap();
        for (channel, label, milli) in temps {
            fs::write(dir.join(format!("temp{channel}_input")), format!("{milli}\n")).unwrap();
            fs::write(dir.join(format!("temp{channel}_label")), format!("{label}\n")).unwrap();
        }
    }

    #[test]
    fn reads_staged_coretemp_tree() {
        let tmp = tempfile::tempdir().unwrap();
        stage_device(
            tmp.path(),
            "hwmon0",
            "coretemp",
            &[(1, "Package id 0", 48_000), (2, "Core 0", 45_500), (3, "Core 1", 46_250)],
        );
        stage_device(tmp.path(), "hwmon1", "nvme", &[(1, "Composite", 31_000)]);

        let source = HwmonSource::with_root(tmp.path());
        let groups = source.query().unwrap();
        assert_eq!(groups.len(), 2);

        let coretemp = &groups[DEFAULT_SENSOR_GROUP];
        assert_eq!(coretemp.len(), 3);
        assert_eq!(coretemp[0].label, "Package id 0");
        assert_eq!(coretemp[0].current, 48.0);
        assert_eq!(coretemp[1].current, 45.5);
        assert_eq!(coretemp[2].current, 46.25);
    }

    #[test]
    fn thresholds_are_optional() {
        let tmp = tempfile::tempdir().unwrap();
        stage_device(tmp.path(), "hwmon0", "coretemp", &[(1, "Package id 0", 40_000)]);
        let dir = tmp.path().join("hwmon0");
        fs::write(dir.join("temp1_max"), "84000\n").unwrap();
        fs::write(dir.join("temp1_crit"), "100000\n").unwrap();

        let source = HwmonSource::with_root(tmp.path());
        let groups = source.query().unwrap();
        let sample = &groups[DEFAULT_SENSOR_GROUP][0];
        assert_eq!(sample.high, Some(84.0));
        assert_eq!(sample.critical, Some(100.0));
    }

    #[test]
    fn absent_tree_yields_no_groups() {
        let source = HwmonSource::with_root("/nonexistent/hwmon");
        assert!(source.query().unwrap().is_empty());

        let reader = SensorReader::new(Box::new(source));
        assert!(reader.read_all().is_err());
    }
}
