//! CPU temperature monitor
//!
//! Samples the package temperature on a fixed interval, appending each
//! reading to a rotating CSV log, until interrupted. On Ctrl-C the
//! accumulated records are printed and the rolling window is rendered as a
//! terminal chart.

use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

use coretemp_metrics::logsink::{LogSink, LogRecord, RotatingCsvSink};
use coretemp_metrics::sampler::Sampler;
use coretemp_metrics::sensor::{HwmonSource, SensorReader};
use coretemp_metrics::unit::TemperatureUnit;
use coretemp_metrics::visualize::{TerminalChart, Visualizer};
use coretemp_metrics::Result;

/// Monitor the CPU temperature.
#[derive(Debug, Parser)]
#[command(name = "coretemp-monitor", version, about = "Monitor the CPU temperature.")]
struct Args {
    /// The interval in seconds to monitor the temperature.
    #[arg(short, long, default_value_t = 3)]
    interval: u64,

    /// Whether to monitor the temperature in fahrenheit.
    #[arg(short, long)]
    fahrenheit: bool,

    /// The maximum size of the log file in bytes.
    #[arg(long, default_value_t = 2_097_152)]
    filesize: u64,

    /// The maximum number of log files to keep.
    #[arg(long, default_value_t = 5)]
    files: usize,

    /// The log file to write to.
    #[arg(long, default_value = "logs/log.csv")]
    logfile: PathBuf,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args = Args::parse();
    let unit =
        if args.fahrenheit { TemperatureUnit::Fahrenheit } else { TemperatureUnit::Celsius };

    let sink = Arc::new(RotatingCsvSink::new(&args.logfile, args.filesize, args.files)?);
    let reader = Arc::new(SensorReader::new(Box::new(HwmonSource::new())));

    let mut sampler = Sampler::new(reader, Arc::clone(&sink) as Arc<dyn LogSink>);
    sampler.start(Duration::from_secs(args.interval), unit)?;

    let mut done = sampler.done_signal();
    tokio::select! {
        _ = tokio::signal::ctrl_c() => {
            info!("interrupt received, stopping");
            sink.append(&LogRecord::event("Received interrupt. Stopping."))?;
        },
        _ = done.changed() => {
            warn!("sampling loop halted on its own");
        },
    }

    let stop_result = sampler.stop().await;

    // Cancellation is a defined terminal transition, not an error: dump and
    // visualize whatever accumulated either way.
    println!("\nDone.");
    for record in sink.read_back()? {
        println!("{record}");
    }

    let series: Vec<(String, f64)> = sampler
        .window()
        .into_iter()
        .map(|(timestamp, value)| (timestamp.format("%H:%M:%S").to_string(), value))
        .collect();
    if !series.is_empty() {
        TerminalChart::new(unit).render(&series)?;
    }

    stop_result
}
