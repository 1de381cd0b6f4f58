use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use coretemp_metrics::prelude::*;
use coretemp_metrics::sensor::{MockSensorSource, DEFAULT_SENSOR_GROUP};

fn mock_group(temps: &[f64]) -> HashMap<String, Vec<RawSensorSample>> {
    let mut samples = Vec::with_capacity(temps.len());
    for (i, temp) in temps.iter().enumerate() {
        let label = if i == 0 { "Package id 0".to_string() } else { format!("Core {}", i - 1) };
        samples.push(RawSensorSample::new(label, *temp));
    }
    let mut groups = HashMap::new();
    groups.insert(DEFAULT_SENSOR_GROUP.to_string(), samples);
    groups
}

fn fixed_reader(temps: Vec<f64>) -> Arc<SensorReader> {
    let mut source = MockSensorSource::new();
    source.expect_query().returning(move || Ok(mock_group(&temps)));
    Arc::new(SensorReader::new(Box::new(source)))
}

#[test]
fn cpu_model_over_mocked_sensors() -> Result<()> {
    let reader = fixed_reader(vec![48.0, 45.5, 46.0, 44.25, 47.0]);
    let mut cpu = Cpu::new(Arc::clone(&reader), "c", false)?;

    assert_eq!(cpu.core_count()?, 4);
    assert_eq!(cpu.core_count_display()?, "4 CPU cores");
    assert_eq!(cpu.overall_temperature()?, 48.0);

    cpu.set_unit("K")?;
    assert_eq!(cpu.overall_temperature()?, 321.15);
    cpu.reset_unit();

    let cores = cpu.build_cores_mut()?;
    assert_eq!(cores.len(), 4);
    assert_eq!(cores[0].temperature()?, 45.5);
    assert_eq!(cores[3].temperature()?, 47.0);
    assert_eq!(cores[0].history().len(), 1);
    Ok(())
}

#[tokio::test]
async fn sampler_to_csv_sink_end_to_end() -> Result<()> {
    let tmp = tempfile::tempdir().expect("tempdir");
    let sink = Arc::new(RotatingCsvSink::new(tmp.path().join("log.csv"), 2_097_152, 5)?);
    let reader = fixed_reader(vec![45.5, 44.0, 46.0]);

    let mut sampler = Sampler::new(reader, Arc::clone(&sink) as Arc<dyn LogSink>);
    sampler.start(Duration::from_millis(10), TemperatureUnit::Fahrenheit)?;
    assert_eq!(sampler.status(), SamplerState::Running);

    // Wait until a few durable temperature records exist.
    for _ in 0..200 {
        let temps = sink
            .read_back()?
            .iter()
            .filter(|r| r.kind == RecordKind::Temperature)
            .count();
        if temps >= 3 {
            break;
        }
        tokio::time::sleep(Duration::from_millis(10)).await;
    }

    sampler.stop().await?;
    assert_eq!(sampler.status(), SamplerState::Idle);

    let records = sink.read_back()?;
    assert_eq!(records[0].kind, RecordKind::Event);
    assert!(records[0].value.contains("Monitoring"));
    assert!(records.last().expect("records").value.contains("Stopped monitoring"));

    let temps: Vec<f64> =
        records.iter().filter_map(|r| r.numeric_value()).collect();
    assert!(temps.len() >= 3);
    assert!(temps.iter().all(|v| *v == 113.9));

    // The window mirrors the persisted values, bounded and oldest first.
    let window = sampler.window();
    assert!(!window.is_empty());
    assert!(window.len() <= 20);
    assert!(window.iter().all(|(_, v)| *v == 113.9));
    Ok(())
}

#[tokio::test]
async fn missing_sensor_group_halts_loudly() -> Result<()> {
    let mut source = MockSensorSource::new();
    let polls = AtomicUsize::new(0);
    source.expect_query().returning(move || {
        // Healthy for two polls, then the driver disappears.
        if polls.fetch_add(1, Ordering::SeqCst) < 2 {
            Ok(mock_group(&[48.0, 45.0]))
        } else {
            Ok(HashMap::new())
        }
    });
    let reader = Arc::new(SensorReader::new(Box::new(source)));

    let tmp = tempfile::tempdir().expect("tempdir");
    let sink = Arc::new(RotatingCsvSink::new(tmp.path().join("log.csv"), 2_097_152, 5)?);
    let mut sampler = Sampler::new(reader, Arc::clone(&sink) as Arc<dyn LogSink>);
    sampler.start(Duration::from_millis(5), TemperatureUnit::Celsius)?;

    let mut done = sampler.done_signal();
    done.changed().await.expect("done signal");

    let err = sampler.join().await.unwrap_err();
    assert!(matches!(err, Error::SensorUnavailable(_)));

    let records = sink.read_back()?;
    assert!(records.iter().any(|r| r.kind == RecordKind::Error));
    Ok(())
}
